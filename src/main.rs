use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solcoder::coding::CodingTaxonomy;
use solcoder::config::Settings;
use solcoder::export;
use solcoder::parser::load_ast_file;
use solcoder::pipeline::parse_source;
use solcoder::pipeline::walker::{parse_repo, WalkOptions};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "solcoder=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    dotenvy::dotenv().ok();

    let list_arg = |name: &'static str, help: &'static str| {
        Arg::with_name(name)
            .long(name)
            .value_name("NAME")
            .help(help)
            .takes_value(true)
            .multiple(true)
            .number_of_values(1)
    };

    let matches = App::new("solcoder")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extracts contract objects and parameters from Solidity ASTs")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("taxonomy")
                .long("taxonomy")
                .value_name("FILE")
                .help("JSON file replacing the default keyword taxonomy")
                .takes_value(true)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("file")
                .about("Parse one Solidity file given its AST")
                .arg(Arg::with_name("AST").help("AST JSON file").required(true).index(1))
                .arg(Arg::with_name("SOURCE").help("Solidity source file").required(true).index(2))
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("format")
                        .long("format")
                        .possible_values(&["csv", "json"])
                        .default_value("csv")
                        .help("Output format"),
                ),
        )
        .subcommand(
            SubCommand::with_name("repo")
                .about("Parse every Solidity file under a directory")
                .arg(Arg::with_name("DIR").help("Contracts directory").required(true).index(1))
                .arg(
                    Arg::with_name("label")
                        .short("l")
                        .long("label")
                        .value_name("LABEL")
                        .help("Project label (defaults to the directory name)")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .value_name("DIR")
                        .help("Output directory")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("no-defaults")
                        .long("no-defaults")
                        .help("Do not apply the default directory and file exclusions"),
                )
                .arg(list_arg("exclude-dir", "Skip subdirectories with this name"))
                .arg(list_arg("include-dir", "Only descend into subdirectories with this name"))
                .arg(list_arg("exclude-file", "Skip files with this name"))
                .arg(list_arg("include-file", "Only parse files with this name")),
        )
        .get_matches();

    let mut settings = Settings::from_env();
    if let Some(path) = matches.value_of("taxonomy") {
        settings.taxonomy = CodingTaxonomy::from_file(Path::new(path))?;
    }

    match matches.subcommand() {
        ("file", Some(sub)) => run_file(sub, &settings),
        ("repo", Some(sub)) => run_repo(sub, &settings),
        _ => bail!("unknown command"),
    }
}

fn run_file(matches: &ArgMatches<'_>, settings: &Settings) -> Result<()> {
    let ast_path = Path::new(matches.value_of("AST").unwrap_or_default());
    let source_path = Path::new(matches.value_of("SOURCE").unwrap_or_default());
    let output_dir = Path::new(matches.value_of("output").unwrap_or("."));

    let ast = load_ast_file(ast_path)?;
    let source = fs::read_to_string(source_path)
        .with_context(|| format!("Failed to read source file: {}", source_path.display()))?;

    let tables = parse_source(&ast, &source, settings)
        .with_context(|| format!("Failed to extract tables from {}", source_path.display()))?;
    for diagnostic in &tables.diagnostics {
        warn!("{}: {}", source_path.display(), diagnostic.message);
    }

    let stem = source_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "contract".to_string());

    if matches.value_of("format") == Some("json") {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
        let output_file = output_dir.join(format!("{}.json", stem));
        fs::write(&output_file, export::to_json(&tables)?)
            .with_context(|| format!("Failed to write output file: {}", output_file.display()))?;
        println!("Wrote {}", output_file.display());
    } else {
        let (objects, parameters) =
            export::write_csv_pair(output_dir, &stem, [(stem.as_str(), &tables)])?;
        println!("Wrote {} and {}", objects.display(), parameters.display());
    }

    info!(
        "{}: {} objects, {} parameters, {} skipped",
        source_path.display(),
        tables.objects.len(),
        tables.parameters.len(),
        tables.diagnostics.len()
    );
    Ok(())
}

fn run_repo(matches: &ArgMatches<'_>, settings: &Settings) -> Result<()> {
    let root = Path::new(matches.value_of("DIR").unwrap_or_default());
    let output_dir = Path::new(matches.value_of("output").unwrap_or("."));
    let label = match matches.value_of("label") {
        Some(label) => label.to_string(),
        None => root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string()),
    };

    let values = |name: &str| -> Vec<String> {
        matches
            .values_of(name)
            .map(|v| v.map(String::from).collect())
            .unwrap_or_default()
    };
    let options = WalkOptions {
        use_defaults: !matches.is_present("no-defaults"),
        exclude_dirs: values("exclude-dir"),
        include_dirs: values("include-dir"),
        exclude_files: values("exclude-file"),
        include_files: values("include-file"),
    };

    let report = parse_repo(root, &label, &options, settings)?;
    if report.files.is_empty() {
        warn!("No files parsed under {}", root.display());
    } else {
        let (objects, parameters) = export::write_report(&report, output_dir)?;
        println!("Wrote {} and {}", objects.display(), parameters.display());
    }

    println!("Summary: parsed {} files", report.files.len());
    if !report.failed_files.is_empty() {
        println!("Could not parse the following files:");
        for path in &report.failed_files {
            println!("\t{}", path.display());
        }
    }
    Ok(())
}
