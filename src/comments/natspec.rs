//! Comment region cleaning and NatSpec tag parsing.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::extractor::model::NatSpec;

lazy_static! {
    static ref BULLET: Regex = Regex::new(r"^\s*\*+\s*").unwrap();
    static ref LINE_MARKER: Regex = Regex::new(r"^/{2,}").unwrap();
    static ref TAG: Regex = Regex::new(r"(?m)^@([a-z]+)").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"@[a-z]+").unwrap();
}

/// Comment recovered for an object definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectComment {
    pub full_comment: String,
    pub description: String,
    pub natspec: NatSpec,
    /// `@param` entries as (name, description), in comment order.
    pub param_docs: Vec<(String, String)>,
}

/// Comment recovered for a parameter declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterComment {
    pub full_comment: String,
    pub description: String,
    pub inline_comment: String,
}

/// Extracts the comment that ends a region of source lines: a trailing
/// `/** ... */` block, or else the run of `//` lines at the end. Anything that
/// does not fit either shape yields no lines.
pub fn clean_region(lines: &[&str]) -> Vec<String> {
    let lines: Vec<&str> = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty()).collect();
    let joined = lines.join("\n");

    let cleaned: Vec<String> = match trailing_block(&joined) {
        Some(interior) => interior
            .split('\n')
            .map(|s| BULLET.replace(s, "").trim().to_string())
            .collect(),
        None => {
            let mut run: Vec<String> = lines
                .iter()
                .rev()
                .take_while(|l| l.starts_with("//"))
                .map(|l| LINE_MARKER.replace(l, "").trim().to_string())
                .collect();
            run.reverse();
            run
        }
    };

    cleaned.into_iter().filter(|s| !s.is_empty()).collect()
}

/// Interior of a `/** ... */` block that closes the text, if any. Only the
/// last block counts: it starts at the final `/**` before the closing `*/`.
fn trailing_block(text: &str) -> Option<&str> {
    let body_end = text.strip_suffix("*/")?.len();
    let open = text[..body_end].rfind("/**")?;
    let interior = &text[open + 3..body_end];
    if interior.is_empty() {
        None
    } else {
        Some(interior)
    }
}

/// Like [`clean_region`] for all but the last line, which is the declaration
/// itself. Text after its first `//` is returned as the inline comment.
pub fn clean_region_with_inline(lines: &[&str]) -> (Vec<String>, String) {
    let (last, leading) = match lines.split_last() {
        Some(split) => split,
        None => return (Vec::new(), String::new()),
    };
    let leading = clean_region(leading);
    let inline = match last.find("//") {
        Some(pos) => last[pos..].trim_start_matches('/').trim().to_string(),
        None => String::new(),
    };
    (leading, inline)
}

/// Splits cleaned comment lines into `@tag` sections. Text before the first
/// tag is not part of any section. Repeated tags are joined with newlines.
pub fn parse_tags(comment: &str) -> BTreeMap<String, String> {
    let mut tags: BTreeMap<String, String> = BTreeMap::new();
    let marks: Vec<(usize, usize, String)> = TAG
        .captures_iter(comment)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.start(), whole.end(), caps[1].to_string()))
        })
        .collect();

    for (i, (_, value_start, tag)) in marks.iter().enumerate() {
        let value_end = marks.get(i + 1).map(|next| next.0).unwrap_or(comment.len());
        let value = comment[*value_start..value_end].replace('\n', " ").trim().to_string();

        tags.entry(tag.clone())
            .and_modify(|prev| {
                if prev.is_empty() {
                    *prev = value.clone();
                } else {
                    prev.push('\n');
                    prev.push_str(&value);
                }
            })
            .or_insert_with(|| value.clone());
    }

    tags
}

/// `name description` lines of a `@param` section.
pub fn split_params(section: &str) -> Vec<(String, String)> {
    section
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| match l.split_once(char::is_whitespace) {
            Some((name, rest)) => (name.to_string(), rest.trim().to_string()),
            None => (l.to_string(), String::new()),
        })
        .collect()
}

pub fn parse_object_comment(region: &[&str]) -> Option<ObjectComment> {
    let lines = clean_region(region);
    if lines.is_empty() {
        return None;
    }

    let full_comment = lines.join("\n");
    let mut tags = parse_tags(&full_comment);
    let param_docs = tags.remove("param").map(|p| split_params(&p)).unwrap_or_default();

    let description = ["title", "notice", "dev", "return"]
        .iter()
        .find_map(|t| tags.get(*t).cloned())
        .unwrap_or_else(|| full_comment.split('.').next().unwrap_or_default().to_string());

    let natspec = NatSpec {
        title: tags.remove("title").unwrap_or_default(),
        notice: tags.remove("notice").unwrap_or_default(),
        dev: tags.remove("dev").unwrap_or_default(),
        returns: tags.remove("return").unwrap_or_default(),
        params: param_docs.iter().map(|(name, _)| name.clone()).collect(),
        other: tags,
    };

    Some(ObjectComment {
        full_comment,
        description,
        natspec,
        param_docs,
    })
}

/// Parses the lines up to and including a declaration line.
pub fn parse_parameter_comment(region: &[&str]) -> Option<ParameterComment> {
    let (leading, inline) = clean_region_with_inline(region);

    let mut lines = leading;
    let has_inline = !inline.is_empty();
    if has_inline {
        lines.push(inline);
    }
    if lines.is_empty() {
        return None;
    }

    let full_comment = lines.join("\n");
    let untagged: Vec<String> = lines
        .iter()
        .map(|l| ANY_TAG.split(l).last().unwrap_or_default().trim().to_string())
        .collect();

    let (description, inline_comment) = match (has_inline, untagged.split_last()) {
        (true, Some((_, rest))) if rest.is_empty() => (lines[0].clone(), lines[0].clone()),
        (true, Some((last, rest))) => (rest.join(" "), last.clone()),
        _ => (untagged.join(" "), String::new()),
    };

    Some(ParameterComment {
        full_comment,
        description,
        inline_comment,
    })
}
