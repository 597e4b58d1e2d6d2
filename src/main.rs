//! mpd-inherit CLI
//!
//! Entry point for the `mpd-inherit` command-line tool.

use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use mpd_inherit::config::{default_host_config_path, EffectiveConfig, PROJECT_CONFIG_FILE};
use mpd_inherit::{resolve_dir, resolve_file, SchemaNode, SchemaSpec};
use mpd_schema::{family_by_name, FAMILY_NAMES};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "MPD_INHERIT_LOG";

#[derive(Parser)]
#[command(name = "mpd-inherit")]
#[command(about = "Resolve inherited DASH manifest properties", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one JSON instance document and print the resolved tree
    Resolve {
        /// JSON instance document
        file: PathBuf,

        #[command(flatten)]
        opts: ResolveArgs,

        /// Exit with status 2 if any duplicate declaration was tolerated
        #[arg(long)]
        deny_warnings: bool,
    },

    /// Resolve every *.json document beneath a directory
    Batch {
        dir: PathBuf,

        #[command(flatten)]
        opts: ResolveArgs,
    },

    /// List the built-in hierarchy families
    Families {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config {
        /// Path to project config file (default: .mpd-inherit.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Path to project config file (default: .mpd-inherit.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Fail on shared properties declared on more than one level
    #[arg(long)]
    strict: bool,

    /// Maximum instance tree depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Family to apply (repeatable, in order)
    #[arg(long = "family", value_parser = PossibleValuesParser::new(FAMILY_NAMES.iter().copied()))]
    families: Vec<String>,

    /// Apply a single family loaded from a TOML or JSON schema file instead
    #[arg(long, conflicts_with = "families")]
    schema: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            file,
            opts,
            deny_warnings,
        } => run_resolve(&file, &opts, deny_warnings),
        Commands::Batch { dir, opts } => run_batch(&dir, &opts),
        Commands::Families { json } => run_families(json),
        Commands::Config { config } => run_config(config),
    }
}

fn run_resolve(file: &Path, opts: &ResolveArgs, deny_warnings: bool) {
    let config = load_config(opts);
    let custom = load_custom_schema(opts);
    let families = select_families(&config, custom.as_ref());

    let resolution = match resolve_file(file, &families, config.resolver_options()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for warning in &resolution.warnings {
        eprintln!("warning: {}", warning.diagnostic.to_code());
    }

    match serde_json::to_string_pretty(&resolution.root) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }

    if deny_warnings && !resolution.warnings.is_empty() {
        process::exit(2);
    }
}

fn run_batch(dir: &Path, opts: &ResolveArgs) {
    let config = load_config(opts);
    let custom = load_custom_schema(opts);
    let families = select_families(&config, custom.as_ref());

    let outcomes = match resolve_dir(dir, &families, config.resolver_options()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&outcomes) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }

    if outcomes.iter().any(|o| !o.ok) {
        process::exit(1);
    }
}

fn run_families(json_output: bool) {
    let families: Vec<(&str, &SchemaNode)> = FAMILY_NAMES
        .iter()
        .filter_map(|name| family_by_name(name).map(|f| (*name, f)))
        .collect();

    if json_output {
        let output: Vec<serde_json::Value> = families
            .iter()
            .map(|(name, family)| {
                serde_json::json!({
                    "name": name,
                    "tags": family.tags(),
                    "shared": family.sorted_shared_properties(),
                })
            })
            .collect();

        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    for (name, family) in families {
        println!("{}", name);
        println!("  Chain: {}", family.tags().join(" > "));
        println!("  Shared: {}", family.sorted_shared_properties().join(", "));
        println!();
    }
}

fn run_config(config_path: Option<PathBuf>) {
    let project = config_path.unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    let host = default_host_config_path();

    let config = match EffectiveConfig::build(host.as_deref(), Some(&project), None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    match config.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn load_config(opts: &ResolveArgs) -> EffectiveConfig {
    let project = opts
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    let host = default_host_config_path();

    let mut resolver = serde_json::Map::new();
    if opts.strict {
        resolver.insert("conflict_policy".to_string(), "strict".into());
    }
    if let Some(depth) = opts.max_depth {
        resolver.insert("max_depth".to_string(), depth.into());
    }
    let mut overrides = serde_json::Map::new();
    if !resolver.is_empty() {
        overrides.insert("resolver".to_string(), resolver.into());
    }
    if !opts.families.is_empty() {
        overrides.insert("families".to_string(), opts.families.clone().into());
    }
    let cli = (!overrides.is_empty()).then(|| serde_json::Value::Object(overrides));

    match EffectiveConfig::build(host.as_deref(), Some(&project), cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn load_custom_schema(opts: &ResolveArgs) -> Option<SchemaNode> {
    let path = opts.schema.as_ref()?;

    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading schema {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    let spec = if path.extension().map_or(false, |ext| ext == "json") {
        SchemaSpec::from_json_str(&contents)
    } else {
        SchemaSpec::from_toml_str(&contents)
    };

    match spec.and_then(SchemaNode::try_from) {
        Ok(node) => Some(node),
        Err(e) => {
            eprintln!("Schema error in {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn select_families<'a>(
    config: &EffectiveConfig,
    custom: Option<&'a SchemaNode>,
) -> Vec<&'a SchemaNode> {
    match custom {
        Some(node) => vec![node],
        None => config.families(),
    }
}
