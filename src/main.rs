use clap::Parser;
use qlgen::cli::{compile, Args, RuntimeConfig};
use std::io::IsTerminal;
use std::process::ExitCode;

const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::WARN;

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logger(args.verbose);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = match RuntimeConfig::from_args(args) {
        Ok(config) => config,
        Err(message) => {
            println!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let report = compile(&config);
    for message in &report.messages {
        println!("{message}");
    }
    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn setup_logger(verbose: bool) {
    let mut log_level_warnings: Vec<String> = vec![];
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        let env_val = std::env::var("LOG_LEVEL").map(|s| s.trim().to_string());
        match env_val.as_deref() {
            Ok("TRACE" | "trace") => tracing::Level::TRACE,
            Ok("DEBUG" | "debug" | "VERBOSE" | "verbose") => tracing::Level::DEBUG,
            Ok("INFO" | "info") => tracing::Level::INFO,
            Ok("WARN" | "warn") => tracing::Level::WARN,
            Ok("ERROR" | "error") => tracing::Level::ERROR,
            Ok(other) => {
                log_level_warnings.push(format!(
                    "Invalid `LOG_LEVEL` environment variable value: `{other}`"
                ));
                DEFAULT_LOG_LEVEL
            }
            Err(_) => DEFAULT_LOG_LEVEL,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();
    tracing::trace!("Initial logging level set to `{log_level}`.");

    for warning in log_level_warnings.drain(..) {
        tracing::warn!("{warning}");
    }
}
