// Define message types for the runtime

use serde::{Deserialize, Serialize};

use crate::drive::{Bounds, WheelCommand};

pub const WHEEL_NAMES: [&str; 2] = ["left_wheel", "right_wheel"];

// Command from teleop/planners -> runtime
// Missing fields count as zero so partial twists are still usable
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwistCommand {
    pub linear_x: f64,
    pub angular_z: f64,
}

// Wheel targets from runtime -> motor controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelState {
    pub names: Vec<String>,
    pub velocities: Vec<f64>,
}

impl From<WheelCommand> for WheelState {
    fn from(cmd: WheelCommand) -> Self {
        Self {
            names: WHEEL_NAMES.iter().map(|n| n.to_string()).collect(),
            velocities: cmd.as_array().to_vec(),
        }
    }
}

/// Request to retune the speed envelope; absent fields are left alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconfigureRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
}

/// Effective bounds after a reconfiguration request
///
/// These are authoritative; they may differ from what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReconfigureResponse {
    pub min_speed: f64,
    pub max_speed: f64,
}

impl From<Bounds> for ReconfigureResponse {
    fn from(bounds: Bounds) -> Self {
        Self {
            min_speed: bounds.min_speed,
            max_speed: bounds.max_speed,
        }
    }
}
