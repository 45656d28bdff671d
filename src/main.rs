mod cli;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set and valid, `info` otherwise.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();

    // stdout carries the JSON output
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    command_line_interface.run()
}
