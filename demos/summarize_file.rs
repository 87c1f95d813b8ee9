//! Summarize a text or markdown file from the command line.
//!
//! Usage: `cargo run --example summarize_file -- <path> [max_sentences]`
//!
//! Settings are read from the environment (`RATE_LIMIT_REQUESTS`,
//! `MAX_CONTENT_LENGTH`, ...). Set `RUST_LOG=debug` to see admission and
//! summary logs.

use std::process::ExitCode;
use textdigest::{Settings, SummaryService};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: summarize_file <path> [max_sentences]");
        return ExitCode::FAILURE;
    };
    let max_sentences = match args.next().map(|raw| raw.parse::<usize>()) {
        None => None,
        Some(Ok(n)) => Some(n),
        Some(Err(e)) => {
            eprintln!("max_sentences: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let service = match SummaryService::builder().with_settings(settings).build() {
        Ok(service) => service,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    match service.summarize_upload("cli", &path, &bytes, max_sentences) {
        Ok(response) => {
            let result = response.value;
            println!("{}\n", result.summary);
            println!(
                "{} of {} characters, {} sentences{}",
                result.summary_length,
                result.original_length,
                result.sentences_count,
                if result.truncated { " (truncated)" } else { "" }
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", e.status_code(), e);
            ExitCode::FAILURE
        }
    }
}
