//! Command-line interface for archmap.

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::analyze;
use crate::config::AnalysisConfig;
use crate::model::SourceModel;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Default configuration file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["archmap.yaml", ".archmap.yaml"];

/// Starter configuration written by `archmap init`.
const CONFIG_TEMPLATE: &str = include_str!("templates/archmap.yaml");

/// Static analysis of Java source trees.
///
/// archmap inspects a tree of Java sources without compiling them and
/// reports which internal components depend on which others, which REST
/// endpoints the module offers, and which external services it declares
/// calls to.
#[derive(Parser)]
#[command(name = "archmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source tree and report components and API surface
    #[command(visible_alias = "scan")]
    Analyze(AnalyzeArgs),
    /// Create a new archmap configuration file
    Init(InitArgs),
}

/// Arguments for the analyze command.
#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Root of the source tree to analyze
    pub path: PathBuf,

    /// Path to a configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Whitelist entry COMPONENT=DEPTH; repeatable, overrides the config file
    #[arg(short, long = "whitelist", value_name = "COMPONENT=DEPTH")]
    pub whitelist: Vec<String>,

    /// Blacklisted component prefix; repeatable
    #[arg(short, long = "blacklist", value_name = "COMPONENT")]
    pub blacklist: Vec<String>,

    /// Explicit API base path, overriding descriptor files
    #[arg(long)]
    pub context_path: Option<String>,

    /// Explicit container-descriptor file (web.xml, .properties, .yml)
    #[arg(long)]
    pub descriptor_file: Option<PathBuf>,

    /// Service identity used to label the reports (group:artifact:version)
    #[arg(short, long)]
    pub service: Option<String>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Write the reports as JSON files into this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "archmap.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Discover a configuration file next to the working directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Merge CLI overrides into the loaded configuration.
fn effective_config(args: &AnalyzeArgs) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::parse_file(path)?,
        None => match discover_config() {
            Some(path) => {
                log::info!("using configuration {}", path.display());
                AnalysisConfig::parse_file(&path)?
            }
            None => AnalysisConfig::default(),
        },
    };

    if !args.whitelist.is_empty() {
        config.whitelist.clear();
        for entry in &args.whitelist {
            let (name, depth) = AnalysisConfig::parse_whitelist_entry(entry)?;
            config.whitelist.insert(name, depth);
        }
    }
    config
        .blacklist
        .extend(args.blacklist.iter().map(|b| b.trim().to_string()));
    if args.context_path.is_some() {
        config.context_path = args.context_path.clone();
    }
    if args.descriptor_file.is_some() {
        config.descriptor_file = args.descriptor_file.clone();
    }
    if args.service.is_some() {
        config.service = args.service.clone();
    }

    Ok(config)
}

/// Run the analyze command.
pub fn run_analyze(args: &AnalyzeArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match effective_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let spinner = scan_spinner(&args.path);
    let model = SourceModel::scan(&args.path);
    spinner.finish_and_clear();
    log::info!("scanned {} source file(s)", model.len());

    let graph = analyze::analyze_components(&args.path, &model, &config.whitelist, &config.blacklist);
    let tables = analyze::DialectTables::default();
    let offers = analyze::extract_offers(&args.path, &model, &config.offer_config(), &tables);
    let consumes = analyze::extract_consumes(&model, &config.consume_config());

    let report = report::build(config.service_identity(), &graph, offers, consumes);

    if let Some(dir) = &args.output_dir {
        report::write_json_files(dir, &report)?;
    }

    match args.format.as_str() {
        "json" => report::write_json(&report)?,
        _ => report::write_pretty(&args.path.to_string_lossy(), &report),
    }

    Ok(EXIT_SUCCESS)
}

fn scan_spinner(path: &std::path::Path) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Scanning {}", path.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!(
            "Error: {} already exists (use --force to overwrite)",
            args.output.display()
        );
        return Ok(EXIT_ERROR);
    }

    std::fs::write(&args.output, CONFIG_TEMPLATE)?;
    println!("Created {}", args.output.display());
    Ok(EXIT_SUCCESS)
}
