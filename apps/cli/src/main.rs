//! # tipsplit: Tip Split Command Line
//!
//! ```text
//! tipsplit split    --template shift.json --pool 100.00
//! tipsplit split    --template - --pool 87.5 --format table < shift.json
//! tipsplit validate --template shift.json --pool -5
//! tipsplit show-config
//! ```
//!
//! Results go to stdout, logs go to stderr.

mod config;
mod output;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tipsplit_core::{check_split, compute_split, CoreError, PoolAmount, SplitTemplate};

use crate::config::{CliConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "tipsplit")]
#[command(about = "Split a tip pool among a shift's participants", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "tipsplit_core=trace"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a split and print the result
    Split {
        /// Template JSON file, or "-" for stdin
        #[arg(long)]
        template: String,

        /// Pool amount in major units, e.g. 100.00
        #[arg(long, allow_hyphen_values = true)]
        pool: String,

        /// Output format (json | table)
        #[arg(long)]
        format: Option<String>,

        /// Single-line JSON output
        #[arg(long, default_value_t = false)]
        compact: bool,
    },

    /// Check a template and pool without splitting. Exits 1 on failure.
    Validate {
        /// Template JSON file, or "-" for stdin
        #[arg(long)]
        template: String,

        /// Pool amount in major units
        #[arg(long, allow_hyphen_values = true)]
        pool: String,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.validate()?;

    init_tracing(&config.logging.level);

    match cli.cmd {
        Commands::Split {
            template,
            pool,
            format,
            compact,
        } => {
            if let Some(format) = format {
                config.output.format = format.parse::<OutputFormat>()?;
            }
            if compact {
                config.output.pretty = false;
            }

            let template = read_template(&template)?;
            let pool = parse_pool(&pool)?;

            info!(
                participants = template.participants.len(),
                rule = template.rule.name(),
                pool_cents = pool.cents().cents(),
                "Computing split"
            );
            let result = compute_split(&template, pool);

            let rendered = output::render(&result, &config.output)?;
            print!("{rendered}");
            if !rendered.ends_with('\n') {
                println!();
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { template, pool } => {
            let template = read_template(&template)?;
            let pool = parse_pool(&pool)?;

            match check_split(&template, pool) {
                Ok(()) => {
                    println!("ok: {} participants, {} rule", template.participants.len(), template.rule);
                    Ok(ExitCode::SUCCESS)
                }
                Err(CoreError::Validation(err)) => {
                    println!("invalid: {err}");
                    Ok(ExitCode::from(1))
                }
                Err(err) => Err(err.into()),
            }
        }

        Commands::ShowConfig => {
            match cli.config.or_else(CliConfig::default_config_path) {
                Some(path) => println!("# {}", path.display()),
                None => println!("# no config directory available"),
            }
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_template(source: &str) -> Result<SplitTemplate> {
    let json = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read template from stdin")?;
        buf
    } else {
        let path = Path::new(source);
        debug!(?path, "Reading template");
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {}", path.display()))?
    };

    SplitTemplate::from_json(&json).context("Failed to decode template")
}

fn parse_pool(text: &str) -> Result<PoolAmount> {
    Ok(text.parse::<PoolAmount>()?)
}
