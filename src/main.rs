use clap::Parser;
use tracing_subscriber::EnvFilter;

use diffdrive_zenoh_runtime::config::Args;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();

    if let Err(e) = diffdrive_zenoh_runtime::runtime::run(&args).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
