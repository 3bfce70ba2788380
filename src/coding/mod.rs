//! Keyword based coding of objects into governance categories.
//!
//! Identifiers are matched case-sensitively as substrings, or as a
//! case-insensitive prefix once leading/trailing underscores are removed, so
//! that both `getProposal` and `proposalCount` hit `Proposal`. Free text is
//! matched as a case-insensitive substring.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::extractor::model::{ContractObject, ContractParameter, ParsedFile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingCategory {
    pub name: String,
    pub keywords: Vec<String>,
    pub topics: Vec<String>,
}

impl CodingCategory {
    fn new(name: &str, keywords: &[&str], topics: &[&str]) -> Self {
        CodingCategory {
            name: name.to_string(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingTaxonomy {
    pub categories: Vec<CodingCategory>,
}

impl Default for CodingTaxonomy {
    fn default() -> Self {
        CodingTaxonomy {
            categories: vec![
                CodingCategory::new(
                    "proposal",
                    &["Proposal", "Propose"],
                    &["create", "modify", "execute", "extend", "cancel"],
                ),
                CodingCategory::new(
                    "membership",
                    &["Member", "Role"],
                    &["permission", "responsibility", "right", "allow", "require", "forbid", "authorize"],
                ),
                CodingCategory::new(
                    "voting",
                    &["Vote", "Voting", "Ballot"],
                    &["cast", "delegate", "change", "tally", "compute", "referendum"],
                ),
                CodingCategory::new(
                    "dispute_resolution",
                    &["Dispute", "Adjudication", "Arbitrator"],
                    &[
                        "juror", "jury", "evidence", "ruling", "appeal", "create", "compute", "execute",
                        "reward", "penalty", "sortition",
                    ],
                ),
                CodingCategory::new("reputation", &["Reputation"], &["reward", "penalty", "penalize"]),
                CodingCategory::new("election", &["Elect", "Candidate"], &[]),
            ],
        }
    }
}

impl CodingTaxonomy {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read taxonomy file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid taxonomy in {}", path.display()))
    }

    pub fn category(&self, name: &str) -> Option<&CodingCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

pub fn identifier_matches(identifier: &str, word: &str) -> bool {
    if identifier.is_empty() || word.is_empty() {
        return false;
    }
    identifier.contains(word)
        || identifier
            .trim_matches('_')
            .to_lowercase()
            .starts_with(&word.to_lowercase())
}

pub fn text_matches(text: &str, word: &str) -> bool {
    if text.is_empty() || word.is_empty() {
        return false;
    }
    text.to_lowercase().contains(&word.to_lowercase())
}

/// The names and descriptions searched for one object.
struct Haystack<'a> {
    identifiers: Vec<&'a str>,
    texts: Vec<&'a str>,
}

impl<'a> Haystack<'a> {
    fn new(object: &'a ContractObject, parameters: &[&'a ContractParameter]) -> Self {
        let mut identifiers = vec![object.object_name.as_str()];
        let mut texts = vec![object.description.as_str()];
        for param in parameters {
            identifiers.push(param.parameter_name.as_str());
            texts.push(param.description.as_str());
        }
        Haystack { identifiers, texts }
    }

    fn contains(&self, word: &str) -> bool {
        self.identifiers.iter().any(|i| identifier_matches(i, word))
            || self.texts.iter().any(|t| text_matches(t, word))
    }
}

pub struct Tagger<'a> {
    taxonomy: &'a CodingTaxonomy,
}

impl<'a> Tagger<'a> {
    pub fn new(taxonomy: &'a CodingTaxonomy) -> Self {
        Tagger { taxonomy }
    }

    /// Categories whose keywords appear on the object or its parameters, in
    /// taxonomy order.
    pub fn keywords_of(&self, object: &ContractObject, parameters: &[&ContractParameter]) -> Vec<String> {
        let haystack = Haystack::new(object, parameters);
        self.taxonomy
            .categories
            .iter()
            .filter(|c| c.keywords.iter().any(|k| haystack.contains(k)))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Topic words found for each already matched category. A word listed
    /// under two matched categories is reported once per category.
    pub fn topics_of(
        &self,
        object: &ContractObject,
        keywords: &[String],
        parameters: &[&ContractParameter],
    ) -> Vec<String> {
        let haystack = Haystack::new(object, parameters);
        let mut topics = Vec::new();
        for category in keywords.iter().filter_map(|k| self.taxonomy.category(k)) {
            topics.extend(category.topics.iter().filter(|t| haystack.contains(t)).cloned());
        }
        topics
    }

    pub fn tag(&self, tables: &mut ParsedFile) {
        let mut coded = Vec::with_capacity(tables.objects.len());
        for object in &tables.objects {
            let parameters: Vec<&ContractParameter> = tables.parameters_of(object).collect();
            let keywords = self.keywords_of(object, &parameters);
            let topics = self.topics_of(object, &keywords, &parameters);
            coded.push((keywords, topics));
        }

        for (object, (keywords, topics)) in tables.objects.iter_mut().zip(coded) {
            object.coding_keywords = keywords;
            object.coding_topics = topics;
        }
    }
}
