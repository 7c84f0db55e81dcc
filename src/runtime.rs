// Fixed-rate loop: drain twists and reconfiguration requests, publish wheel speeds
//
// The envelope is owned by the runtime and every message is handled on this one
// task, so mixing and reconfiguration never race and bounds are never torn.

use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::config::Args;
use crate::drive::{SpeedEnvelope, mix};
use crate::messages::{ReconfigureRequest, ReconfigureResponse, TwistCommand, WheelState};

pub struct Runtime {
    envelope: SpeedEnvelope,
    commands_processed: u64,
    commands_rejected: u64,
}

impl Runtime {
    pub fn new(envelope: SpeedEnvelope) -> Self {
        Self {
            envelope,
            commands_processed: 0,
            commands_rejected: 0,
        }
    }

    pub fn envelope(&self) -> &SpeedEnvelope {
        &self.envelope
    }

    /// Number of commands that produced a wheel state
    pub fn commands_processed(&self) -> u64 {
        self.commands_processed
    }

    /// Number of commands dropped because of NaN input or output
    pub fn commands_rejected(&self) -> u64 {
        self.commands_rejected
    }

    /// Process incoming twist; `None` means nothing must be published
    pub fn on_command(&mut self, cmd: &TwistCommand) -> Option<WheelState> {
        debug!("Received command: {:?}", cmd);

        match mix(cmd.angular_z, cmd.linear_x, &self.envelope) {
            Ok(wheels) => {
                self.commands_processed += 1;
                debug!("Wheel speeds: left={}, right={}", wheels.left, wheels.right);
                Some(WheelState::from(wheels))
            }
            Err(e) => {
                self.commands_rejected += 1;
                error!("Dropping command: {}", e);
                None
            }
        }
    }

    /// Apply a reconfiguration request and return the bounds now in effect
    pub fn on_reconfigure(&mut self, req: &ReconfigureRequest) -> ReconfigureResponse {
        info!(
            "Reconfigure request: min_speed={:?}, max_speed={:?}",
            req.min_speed, req.max_speed
        );
        ReconfigureResponse::from(self.envelope.propose(req.min_speed, req.max_speed))
    }
}

pub async fn run(args: &Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let envelope = SpeedEnvelope::new(args.min_speed, args.max_speed)?;

    info!("Opening Zenoh session...");
    let config = match &args.zenoh_config {
        Some(path) => zenoh::Config::from_file(path)?,
        None => zenoh::Config::default(),
    };
    let session = zenoh::open(config).await?;

    info!("Setting up publishers, subscribers and queryable...");
    let sub_cmd = session.declare_subscriber(args.cmd_topic.as_str()).await?;
    let sub_min = session
        .declare_subscriber(args.min_speed_topic.as_str())
        .await?;
    let sub_max = session
        .declare_subscriber(args.max_speed_topic.as_str())
        .await?;
    let reconfigure = session
        .declare_queryable(args.reconfigure_key.as_str())
        .await?;
    let pub_wheels = session.declare_publisher(args.wheels_topic.as_str()).await?;

    let mut runtime = Runtime::new(envelope);
    let mut tick = interval(Duration::from_millis(1000 / args.loop_hz));

    let bounds = runtime.envelope().current();
    info!(
        "Diff drive ready: {}Hz loop, min_speed={}, max_speed={}",
        args.loop_hz, bounds.min_speed, bounds.max_speed
    );
    info!("Subscribed to: {}", args.cmd_topic);
    info!("Publishing to: {}", args.wheels_topic);
    info!(
        "Reconfigure via: {} (query), {} / {} (float)",
        args.reconfigure_key, args.min_speed_topic, args.max_speed_topic
    );

    loop {
        tick.tick().await;

        // 1. Reconfiguration first, so commands in this tick see the new bounds
        while let Ok(Some(query)) = reconfigure.try_recv() {
            let request = match query.payload() {
                Some(payload) => serde_json::from_slice::<ReconfigureRequest>(&payload.to_bytes()),
                None => Ok(ReconfigureRequest::default()),
            };

            match request {
                Ok(req) => {
                    let response = runtime.on_reconfigure(&req);
                    let response_json = serde_json::to_string(&response)?;
                    query.reply(query.key_expr().clone(), response_json).await?;
                }
                Err(e) => {
                    warn!("Failed to parse reconfigure request: {}", e);
                    query.reply_err(e.to_string()).await?;
                }
            }
        }

        while let Ok(Some(sample)) = sub_min.try_recv() {
            match serde_json::from_slice::<f64>(&sample.payload().to_bytes()) {
                Ok(min) => {
                    runtime.on_reconfigure(&ReconfigureRequest {
                        min_speed: Some(min),
                        max_speed: None,
                    });
                }
                Err(e) => warn!("Failed to parse min_speed: {}", e),
            }
        }

        while let Ok(Some(sample)) = sub_max.try_recv() {
            match serde_json::from_slice::<f64>(&sample.payload().to_bytes()) {
                Ok(max) => {
                    runtime.on_reconfigure(&ReconfigureRequest {
                        min_speed: None,
                        max_speed: Some(max),
                    });
                }
                Err(e) => warn!("Failed to parse max_speed: {}", e),
            }
        }

        // 2. Mix and publish every pending command, in arrival order
        while let Ok(Some(sample)) = sub_cmd.try_recv() {
            let payload = sample.payload().to_bytes();
            let cmd = match serde_json::from_slice::<TwistCommand>(&payload) {
                Ok(cmd) => cmd,
                Err(e) => {
                    warn!("Failed to parse command: {}", e);
                    continue;
                }
            };

            if let Some(state) = runtime.on_command(&cmd) {
                let state_json = serde_json::to_string(&state)?;
                pub_wheels.put(state_json).await?;
            }
        }
    }
}
