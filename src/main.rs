//! CLI entry point for the webbook tool.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use webbook::request::DEFAULT_MAX_ATTEMPTS;
use webbook::{RequestConfig, TransportOptions, WebBookClient};

mod app_config;
mod cli;
mod commands;

use app_config::{FileConfig, VerbositySetting};
use cli::{Args, Command, RequestArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let loaded = app_config::load_config(args.config.as_deref())?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config file > default (info)
    let default_level = resolve_default_log_level(&args, loaded.config.verbosity);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, config = ?loaded.path, from_file = loaded.loaded_from_file, "CLI arguments parsed");

    let show_progress = !args.quiet && io::stderr().is_terminal();
    match &args.command {
        Command::Params => {
            commands::run_params_command();
            Ok(())
        }
        Command::Index(index_args) => {
            commands::run_index_command(index_args, loaded.config.index_path.as_deref())
        }
        network_command => {
            let client = build_client(&args.request, &loaded.config)?;
            match network_command {
                Command::Search(search_args) => {
                    commands::run_search_command(&client, search_args, show_progress).await
                }
                Command::Show(show_args) => {
                    commands::run_show_command(&client, show_args, show_progress).await
                }
                Command::Spectra(spectra_args) => {
                    commands::run_spectra_command(&client, spectra_args, show_progress).await
                }
                Command::Gc(gc_args) => commands::run_gc_command(&client, gc_args).await,
                Command::CrawlDelay(delay_args) => {
                    commands::run_crawl_delay_command(&client, delay_args).await
                }
                Command::Params | Command::Index(_) => Ok(()),
            }
        }
    }
}

fn resolve_default_log_level(args: &Args, configured: Option<VerbositySetting>) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => configured.map_or("info", VerbositySetting::log_level),
        1 => "debug",
        _ => "trace",
    }
}

/// CLI flags override config file values, which override library defaults.
fn build_request_config(args: &RequestArgs, file: &FileConfig) -> Result<RequestConfig> {
    let mut transport = TransportOptions::default();
    if let Some(secs) = args.timeout.or(file.timeout_secs) {
        transport.timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.connect_timeout_secs {
        transport.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(user_agent) = args.user_agent.as_ref().or(file.user_agent.as_ref()) {
        transport.user_agent.clone_from(user_agent);
    }
    let config = RequestConfig::new(
        args.delay.or(file.delay_secs).unwrap_or(0.0),
        args.max_attempts
            .or(file.max_attempts)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS),
        transport,
    )
    .context("Invalid request settings")?;
    Ok(config)
}

fn build_client(args: &RequestArgs, file: &FileConfig) -> Result<WebBookClient> {
    let config = build_request_config(args, file)?;
    let client = match args.base_url.as_ref().or(file.base_url.as_ref()) {
        Some(base_url) => WebBookClient::with_base_url(config, base_url)?,
        None => WebBookClient::new(config)?,
    };
    Ok(client)
}
