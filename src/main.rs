//! Command-line driver for the completion ranking engine
//!
//! Reads a JSON completion request (from a file or stdin), ranks it, and
//! prints the completion list as JSON:
//!
//! ```text
//! echo '{"candidates":[{"name":"console","kind":"Variable"}],"prefix":"con"}' \
//!     | rank-completions --record console --pretty
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use symbol_completion_ranker::completion::{CompletionEngine, parse_request};
use symbol_completion_ranker::config::EngineConfig;
use symbol_completion_ranker::logging::init_logger;
use symbol_completion_ranker::metrics::metrics;

#[derive(Parser, Debug)]
#[command(name = "rank-completions", version, about = "Rank code completion candidates")]
struct Args {
    /// JSON request file (reads stdin when omitted or "-")
    #[arg(long)]
    input: Option<PathBuf>,

    /// Override the request's prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Override the request's language
    #[arg(long)]
    language: Option<String>,

    /// JSON engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the maximum number of completions
    #[arg(long)]
    max_completions: Option<usize>,

    /// Override the soft latency budget in milliseconds
    #[arg(long)]
    sla_budget_ms: Option<u64>,

    /// Record a usage of NAME before ranking (repeatable)
    #[arg(long = "record", value_name = "NAME")]
    records: Vec<String>,

    /// Clear seeded usage state before applying --record
    #[arg(long)]
    no_seed: bool,

    /// Log level (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,

    /// Disable ANSI colors in log output
    #[arg(long)]
    no_color: bool,

    /// Also write DEBUG logs to the user cache directory
    #[arg(long)]
    log_file: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print usage and pipeline statistics to stderr
    #[arg(long)]
    stats: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            Ok(buffer)
        }
    }
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(max) = args.max_completions {
        config.max_completions = max;
    }
    if let Some(budget) = args.sla_budget_ms {
        config.sla_budget_ms = budget;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let _guard = init_logger(args.no_color, args.log_level.as_deref(), args.log_file)
        .context("Failed to initialize logging")?;

    let config = load_config(&args)?;
    let mut engine = CompletionEngine::with_config(config).context("Invalid engine configuration")?;

    if args.no_seed {
        engine.reset();
    }
    for name in &args.records {
        engine.record_usage(name);
    }

    let input = read_input(args.input.as_ref())?;
    let mut request = parse_request(&input).context("Failed to decode completion request")?;
    if let Some(prefix) = args.prefix {
        request.prefix = prefix;
    }
    if let Some(language) = args.language {
        request.language = language;
    }

    info!(
        "Ranking {} candidates for prefix {:?}",
        request.candidates.len(),
        request.prefix
    );
    let completions = engine.complete(&request);

    let output = if args.pretty {
        serde_json::to_string_pretty(&completions)?
    } else {
        serde_json::to_string(&completions)?
    };
    println!("{}", output);

    if args.stats {
        eprintln!("usage: {}", serde_json::to_string(&engine.stats())?);
        eprintln!("metrics: {}", serde_json::to_string(&metrics().summary())?);
        if let Some(timing) = metrics().operation_stats("generate_completions") {
            eprintln!("timing: {}", serde_json::to_string(&timing)?);
        }
    }

    Ok(())
}
