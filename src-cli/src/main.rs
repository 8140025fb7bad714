mod cli;
mod output;

use crate::cli::Cli;
use clap::Parser;
use tracing::info;

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "warn,urlrisk=debug"
    } else {
        "warn,urlrisk=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Starting urlrisk v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = cli.run().await {
        eprintln!("urlrisk error: {err:#}");
        std::process::exit(1);
    }
}
