use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use option_schema_core::{Map, Resolver, ResolverConfig, Schema, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "optschema")]
#[command(about = "Resolve options against a declarative option schema")]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve options from arguments and the environment.
    Resolve(ResolveArgs),
    /// Validate a schema document.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Schema document (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    schema: PathBuf,
    /// Argument document; any JSON/YAML value, scalars go to the schema root.
    #[arg(long, conflicts_with = "arg_json")]
    args: Option<PathBuf>,
    /// Inline JSON argument value.
    #[arg(long)]
    arg_json: Option<String>,
    /// Extra environment entries (JSON/YAML object), applied over the
    /// process environment.
    #[arg(long)]
    env_file: Option<PathBuf>,
    /// Do not read the process environment.
    #[arg(long)]
    no_process_env: bool,
    /// Resolver configuration (YAML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema document (JSON, or YAML with a .yaml/.yml extension).
    #[arg(long)]
    schema: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ResolverConfig::default(),
    };

    let arg = match (&args.args, &args.arg_json) {
        (Some(path), _) => Some(load_value(path)?),
        (None, Some(raw)) => Some(parse_inline_json(raw)?),
        (None, None) => None,
    };

    let mut env = if args.no_process_env {
        Map::new()
    } else {
        process_env()
    };
    if let Some(path) = &args.env_file {
        let extra = load_env_file(path)?;
        debug!(entries = extra.len(), path = %path.display(), "Loaded environment file");
        for (key, value) in extra {
            env.insert(key, value);
        }
    }

    let resolution = Resolver::from_config(&config)
        .resolve(&schema, arg.as_ref(), &env, None)
        .map_err(|err| format!("{} ({})", err, err.code()))?;

    let output = format_value(&resolution.into_value(), args.format)?;
    println!("{output}");
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let schema = load_schema(&args.schema)?;
    println!(
        "Schema '{}' declares {} option(s){}.",
        args.schema.display(),
        schema.len(),
        schema
            .root_key()
            .map(|root| format!(" with root '{root}'"))
            .unwrap_or_default()
    );
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}

/// Reads a JSON or YAML document into a raw JSON value.
fn load_document(path: &Path) -> Result<serde_json::Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse YAML '{}': {err}", path.display()))
    } else {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse JSON '{}': {err}", path.display()))
    }
}

fn load_schema(path: &Path) -> Result<Schema, String> {
    let document = load_document(path)?;
    Schema::from_json(&document)
        .map_err(|err| format!("Invalid schema '{}': {err}", path.display()))
}

fn load_value(path: &Path) -> Result<Value, String> {
    load_document(path).map(Value::from)
}

fn load_env_file(path: &Path) -> Result<Map, String> {
    match load_value(path)? {
        Value::Object(map) => Ok(map),
        other => Err(format!(
            "Environment file '{}' must contain an object, found a {}",
            path.display(),
            other.kind()
        )),
    }
}

fn load_config(path: &Path) -> Result<ResolverConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read config '{}': {err}", path.display()))?;
    serde_yaml::from_str(&raw)
        .map_err(|err| format!("Failed to parse config '{}': {err}", path.display()))
}

fn parse_inline_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .map_err(|err| format!("Failed to parse --arg-json: {err}"))
}

/// Snapshot of the process environment with upper-cased keys.
///
/// Entries whose key or value is not valid UTF-8 are skipped.
fn process_env() -> Map {
    upper_case_keys(std::env::vars_os().filter_map(|(key, value)| {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(key = ?key, "Skipping non-UTF-8 environment entry");
                None
            }
        }
    }))
}

fn upper_case_keys(vars: impl IntoIterator<Item = (String, String)>) -> Map {
    vars.into_iter()
        .map(|(key, value)| (key.to_uppercase(), Value::String(value)))
        .collect()
}

fn format_value(value: &Value, format: CliOutputFormat) -> Result<String, String> {
    match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
        CliOutputFormat::Yaml => serde_yaml::to_string(value)
            .map_err(|err| format!("Failed to serialize output: {err}")),
    }
}
