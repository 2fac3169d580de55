//! CLI entrypoint for verity
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use verity_application::{VerificationOrchestrator, VerificationProgress};
use verity_domain::{BatchRequest, RequestKind, VerificationRequest};
use verity_infrastructure::{ConfigLoader, EngineAssembler, KNOWN_PROVIDERS};
use verity_presentation::{
    CheckArgs, Cli, Command, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter,
    SimpleProgress,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("failed to load configuration")?
    };
    let output = OutputConfig::resolve(
        cli.output,
        file_config.output.format,
        file_config.output.color,
        cli.quiet,
    );
    output.apply_color();

    info!("Starting verity");

    // === Dependency Injection ===
    let assembly = EngineAssembler::new(file_config)
        .with_telemetry_path(cli.telemetry.clone())
        .assemble()?;
    let disabled = assembly.disabled_providers;
    let mut orchestrator = assembly.orchestrator;
    if output.show_progress {
        orchestrator = orchestrator.with_progress(progress_reporter());
    }

    let health = orchestrator.initialize().await;
    info!("System health after initialization: {}", health.status.as_str());

    let rendered = match cli.command {
        Command::Info(args) => {
            run_single(&orchestrator, RequestKind::Information, args, &disabled, output).await?
        }
        Command::Detect(args) => {
            run_single(&orchestrator, RequestKind::Hallucination, args, &disabled, output).await?
        }
        Command::Sources(args) => {
            run_single(&orchestrator, RequestKind::Sources, args, &disabled, output).await?
        }
        Command::Combined(args) => {
            run_single(&orchestrator, RequestKind::Combined, args, &disabled, output).await?
        }
        Command::Batch(args) => {
            let text = tokio::fs::read_to_string(&args.file)
                .await
                .with_context(|| format!("failed to read {}", args.file.display()))?;
            let mut batch = serde_json::from_str::<BatchRequest>(&text)
                .with_context(|| format!("invalid batch file {}", args.file.display()))?
                .without_providers(&KNOWN_PROVIDERS, &disabled);
            if let Some(max) = args.max_concurrency {
                batch = batch.with_max_concurrency(max);
            }
            let result = orchestrator.batch_verify(batch).await?;
            ConsoleFormatter::format_batch(&result, output.format)
        }
        Command::Health => {
            let health = orchestrator.check_health().await;
            ConsoleFormatter::format_health(&health, output.format)
        }
        Command::Metrics => {
            let metrics = orchestrator.get_system_metrics();
            ConsoleFormatter::format_metrics(&metrics, output.format)
        }
    };

    println!("{}", rendered);

    Ok(())
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` overrides the level chosen by `-v`. With `--log-file` the
/// returned guard must live until exit so buffered lines are flushed.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file needs a file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

fn progress_reporter() -> Arc<dyn VerificationProgress> {
    if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    }
}

async fn run_single(
    orchestrator: &VerificationOrchestrator,
    kind: RequestKind,
    args: CheckArgs,
    disabled: &[String],
    output: OutputConfig,
) -> Result<String> {
    let request = build_request(&args, disabled).await?;
    let result = orchestrator.verify(kind, request).await?;
    Ok(ConsoleFormatter.format_result(&result, output.format))
}

async fn build_request(args: &CheckArgs, disabled: &[String]) -> Result<VerificationRequest> {
    let content = if let Some(path) = &args.file {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?
    } else if args.reads_stdin() {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("failed to read content from stdin")?;
        buffer
    } else {
        args.content.clone().unwrap_or_default()
    };

    if content.trim().is_empty() {
        bail!("Content is required: pass it as an argument, with --file, or on stdin");
    }

    let mut request = VerificationRequest::new(content)?
        .with_sources(args.sources.iter().cloned())
        .with_options(args.options(&KNOWN_PROVIDERS, disabled));
    if let Some(context) = args.context_value().context("--context must be valid JSON")? {
        request = request.with_context(context);
    }
    if let Some(requester) = &args.requester {
        request = request.with_requester(requester.clone());
    }
    Ok(request)
}
