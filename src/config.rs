// Topics, loop rate, default speed bounds and startup parameters
use std::path::PathBuf;

use clap::Parser;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 100;

// Default speed envelope (m/s at the wheel)
pub const DEFAULT_MIN_SPEED: f64 = 0.0; // non-zero commands never go slower than this
pub const DEFAULT_MAX_SPEED: f64 = 1.0; // commands never go faster than this

// Zenoh topics
pub const TOPIC_CMD_VEL: &str = "diff_drive/cmd_vel"; // twist commands
pub const TOPIC_WHEELS: &str = "diff_drive/wheels"; // wheel state output
pub const TOPIC_MIN_SPEED: &str = "diff_drive/min_speed"; // bare float
pub const TOPIC_MAX_SPEED: &str = "diff_drive/max_speed"; // bare float
pub const KEY_RECONFIGURE: &str = "diff_drive/reconfigure"; // queryable

/// Startup parameters, read once when the runtime starts
#[derive(Debug, Clone, Parser)]
#[command(name = "diffdrive-zenoh-runtime", version, about = "Twist to differential-drive wheel speeds over Zenoh")]
pub struct Args {
    /// Initial minimum non-zero wheel speed
    #[arg(long, default_value_t = DEFAULT_MIN_SPEED)]
    pub min_speed: f64,

    /// Initial maximum wheel speed
    #[arg(long, default_value_t = DEFAULT_MAX_SPEED)]
    pub max_speed: f64,

    /// Topic carrying twist commands
    #[arg(long, default_value = TOPIC_CMD_VEL)]
    pub cmd_topic: String,

    /// Topic the wheel state is published on
    #[arg(long, default_value = TOPIC_WHEELS)]
    pub wheels_topic: String,

    /// Key expression answering reconfiguration queries
    #[arg(long, default_value = KEY_RECONFIGURE)]
    pub reconfigure_key: String,

    /// Topic for single min_speed updates
    #[arg(long, default_value = TOPIC_MIN_SPEED)]
    pub min_speed_topic: String,

    /// Topic for single max_speed updates
    #[arg(long, default_value = TOPIC_MAX_SPEED)]
    pub max_speed_topic: String,

    /// How often pending messages are drained
    #[arg(long, default_value_t = LOOP_HZ, value_parser = clap::value_parser!(u64).range(1..=1000))]
    pub loop_hz: u64,

    /// Zenoh configuration file (defaults to the built-in peer config)
    #[arg(long)]
    pub zenoh_config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let args = Args::try_parse_from(["diffdrive-zenoh-runtime"]).unwrap();
        assert_eq!(args.min_speed, 0.0);
        assert_eq!(args.max_speed, 1.0);
        assert_eq!(args.cmd_topic, TOPIC_CMD_VEL);
        assert_eq!(args.loop_hz, LOOP_HZ);
        assert!(args.zenoh_config.is_none());
    }

    #[test]
    fn test_speed_overrides() {
        let args = Args::try_parse_from([
            "diffdrive-zenoh-runtime",
            "--min-speed",
            "0.15",
            "--max-speed",
            "0.8",
            "--loop-hz",
            "50",
        ])
        .unwrap();
        assert_eq!(args.min_speed, 0.15);
        assert_eq!(args.max_speed, 0.8);
        assert_eq!(args.loop_hz, 50);
    }

    #[test]
    fn test_zero_loop_rate_rejected() {
        assert!(Args::try_parse_from(["diffdrive-zenoh-runtime", "--loop-hz", "0"]).is_err());
    }
}
