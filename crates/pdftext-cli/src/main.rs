mod cli;
mod page_range;
mod text_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout carries only the extracted text
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    tracing::debug!(file = %cli.file.display(), x_tolerance = cli.x_tolerance, "extracting");

    if let Err(code) = text_cmd::run(&cli) {
        std::process::exit(code);
    }
}
