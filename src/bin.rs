//! Binary entry point for `chat-autoreply`.
//!
//! This module provides the command-line interface for chat-autoreply with options
//! for configuration file paths, logging verbosity and tracing export. It gathers
//! the run settings and starts the bot.

use clap::Parser;
use chat_autoreply::base::{
    config::Config,
    settings::{NoPrompt, Settings, TerminalPrompt},
    types::Void,
};
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Chat-autoreply – keeps a chat channel busy with replies or broadcast messages.
///
/// Secrets and settings can come from `config.toml`, a `.env` file, or environment
/// variables.  Any run setting that is not configured is asked for interactively.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the bot will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP (HTTP) in addition to logging them.
    #[arg(long)]
    otlp: bool,
    /// Fail instead of prompting when a run setting is not configured.
    #[arg(long)]
    non_interactive: bool,
}

/// Main entry point for the chat-autoreply binary.
///
/// Sets up logging based on verbosity, loads configuration, resolves the run settings, and starts the bot.
#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    // Pick up secrets from a local `.env`, if there is one.

    let _ = dotenvy::dotenv();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stdout = tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::NONE);

    // Prepare the otlp layer, if requested.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("chat-autoreply");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    let config = Config::load(args.config.as_deref())?;

    let settings = if args.non_interactive {
        Settings::resolve(&config, &mut NoPrompt)?
    } else {
        Settings::resolve(&config, &mut TerminalPrompt::stdio())?
    };

    chat_autoreply::start(config, settings).await
}
