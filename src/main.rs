//! layergen command line entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use layergen::cli::App;

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;

    let app = App::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = if app.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    app.run()
}
