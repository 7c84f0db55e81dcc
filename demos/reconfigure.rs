// Retune the speed envelope of a running diff drive and print the bounds in effect
//
// Usage: cargo run --example reconfigure -- --min-speed 0.15 --max-speed 0.8
use clap::Parser;
use diffdrive_zenoh_runtime::config::KEY_RECONFIGURE;
use diffdrive_zenoh_runtime::messages::{ReconfigureRequest, ReconfigureResponse};
use tracing::{info, warn};

#[derive(Debug, Parser)]
struct Cli {
    /// Proposed minimum non-zero wheel speed
    #[arg(long)]
    min_speed: Option<f64>,

    /// Proposed maximum wheel speed
    #[arg(long)]
    max_speed: Option<f64>,

    /// Key expression the runtime answers on
    #[arg(long, default_value = KEY_RECONFIGURE)]
    key: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let request = ReconfigureRequest {
        min_speed: cli.min_speed,
        max_speed: cli.max_speed,
    };

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Sending {:?} to {}", request, cli.key);
    let replies = session
        .get(cli.key.as_str())
        .payload(serde_json::to_string(&request)?)
        .await?;

    let mut answered = false;
    while let Ok(reply) = replies.recv_async().await {
        match reply.result() {
            Ok(sample) => {
                let response: ReconfigureResponse =
                    serde_json::from_slice(&sample.payload().to_bytes())?;
                if request.min_speed.is_some_and(|v| v != response.min_speed)
                    || request.max_speed.is_some_and(|v| v != response.max_speed)
                {
                    warn!("Part of the request was rejected");
                }
                println!(
                    "min_speed={} max_speed={}",
                    response.min_speed, response.max_speed
                );
                answered = true;
            }
            Err(err) => {
                warn!("Runtime refused request: {}", String::from_utf8_lossy(&err.payload().to_bytes()));
            }
        }
    }

    if !answered {
        warn!("No diff drive runtime answered on {}", cli.key);
    }

    Ok(())
}
