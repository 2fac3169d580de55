//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;
use verity_domain::RequestOptions;

/// Output format for verification results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every verdict with votes, factors, warnings and suggestions
    Full,
    /// Decision and confidence per verdict
    Summary,
    /// JSON output
    Json,
}

impl From<OutputFormat> for verity_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => verity_domain::OutputFormat::Full,
            OutputFormat::Summary => verity_domain::OutputFormat::Summary,
            OutputFormat::Json => verity_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for verity
#[derive(Parser, Debug)]
#[command(name = "verity")]
#[command(author, version, about = "Multi-agent content verification - claims, hallucinations and sources")]
#[command(long_about = r#"
Verity checks content with panels of independent providers and reduces
their votes to a verdict.

  info       Is the claim supported by evidence and credible sources?
  detect     Does the content contain fabricated claims? (6-provider panel)
  sources    How credible are the cited sources?
  combined   info and detect on the same content, merged conservatively
  batch      Run a JSON file of heterogeneous requests

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./verity.toml       Project-level config
3. ~/.config/verity/config.toml   Global config

Example:
  verity detect "Studies show 97% of experts agree it was built in 2031."
  verity info "The Eiffel Tower is 330 m tall" -s https://en.wikipedia.org/wiki/Eiffel_Tower
  verity batch requests.json --output json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to [output] format, then summary)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long, global = true)]
    pub show_config: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Append health and metrics snapshots to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub telemetry: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a claim against evidence
    Info(CheckArgs),
    /// Detect hallucinated content
    Detect(CheckArgs),
    /// Score the credibility of sources
    Sources(CheckArgs),
    /// Run information verification and hallucination detection together
    Combined(CheckArgs),
    /// Verify every request in a JSON batch file
    Batch(BatchArgs),
    /// Initialize the agents and report their health
    Health,
    /// Report system metrics
    Metrics,
}

/// Arguments shared by the single-request commands
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Content to verify; `-` or omitted reads stdin
    pub content: Option<String>,

    /// Read the content from a file
    #[arg(short = 'f', long, value_name = "PATH", conflicts_with = "content")]
    pub file: Option<PathBuf>,

    /// Caller context as a JSON document
    #[arg(long, value_name = "JSON")]
    pub context: Option<String>,

    /// Candidate source URI (repeatable)
    #[arg(short, long = "source", value_name = "URI")]
    pub sources: Vec<String>,

    /// Require confidence of at least 0.9 to verify
    #[arg(long)]
    pub strict: bool,

    /// Provider sensitivity in [0, 1]
    #[arg(long, value_name = "0..1")]
    pub sensitivity: Option<f64>,

    /// Overall deadline for the request
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Only run these providers (repeatable)
    #[arg(short, long = "provider", value_name = "NAME")]
    pub providers: Vec<String>,

    /// Consult and fill the result cache
    #[arg(long)]
    pub cache: bool,

    /// Requester recorded on the request
    #[arg(long, value_name = "NAME")]
    pub requester: Option<String>,
}

impl CheckArgs {
    /// Request options from the flags
    ///
    /// `disabled` providers are removed from the enabled set; when no
    /// `--provider` is given, every provider in `known` except the disabled
    /// ones is enabled.
    pub fn options(&self, known: &[&str], disabled: &[String]) -> RequestOptions {
        let mut options = RequestOptions::default();
        if self.cache {
            options = options.with_cache();
        }
        if self.strict {
            options = options.with_strict_mode();
        }
        if let Some(ms) = self.timeout_ms {
            options = options.with_timeout_ms(ms);
        }
        if let Some(sensitivity) = self.sensitivity {
            options = options.with_sensitivity(sensitivity);
        }

        if !self.providers.is_empty() {
            options = options.with_enabled_providers(self.providers.iter().cloned());
        }
        options.without_providers(known, disabled)
    }

    /// Parse `--context`
    pub fn context_value(&self) -> Result<Option<Value>, serde_json::Error> {
        self.context
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }

    /// Whether the content must be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.file.is_none() && self.content.as_deref().is_none_or(|c| c == "-")
    }
}

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// JSON file: `{"items": [{"kind": "hallucination", "content": "..."}], "options": {...}}`
    pub file: PathBuf,

    /// Override the batch's maxConcurrency
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,
}
