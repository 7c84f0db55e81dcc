// Differential-drive velocity mixing
// Converts a twist (turn rate + forward speed) into left/right wheel speeds.

use std::f64::consts::PI;

use super::envelope::{Bounds, SpeedEnvelope};

/// Error types for velocity mixing
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MixError {
    #[error("NaN value in velocity command: angular_z={angular_z}, linear_x={linear_x}")]
    InvalidInput { angular_z: f64, linear_x: f64 },

    #[error("NaN value in mixed wheel speeds: left={left}, right={right}")]
    DegenerateMix { left: f64, right: f64 },
}

/// Signed target speeds for the two wheels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelCommand {
    pub left: f64,
    pub right: f64,
}

impl WheelCommand {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns speeds as array [left, right]
    pub fn as_array(&self) -> [f64; 2] {
        [self.left, self.right]
    }
}

/// Round to two decimals, ties to even
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Geometric mix of turn rate `x` and forward speed `y`
///
/// Inputs are bounded to `[-max_speed, max_speed]` first. The angle between
/// the command vector and the turn axis interpolates the turn coefficient from
/// -1 (pure turn) through 0 (45 degrees) to +1 (pure translation).
///
/// # Returns
/// Unclamped `(left, right)` wheel speeds. For `y >= 0` the raw pair is
/// returned swapped; downstream consumers depend on that ordering.
pub fn diffdrive(x: f64, y: f64, max_speed: f64) -> (f64, f64) {
    let x = x.clamp(-max_speed, max_speed);
    let y = y.clamp(-max_speed, max_speed);

    let z = (x * x + y * y).sqrt();
    let rad = if z == 0.0 { 0.0 } else { (x.abs() / z).acos() };
    let angle = rad * 180.0 / PI;

    let turn_coeff = -1.0 + (angle / 90.0) * 2.0;
    let turn = round2(turn_coeff * (y.abs() - x.abs()).abs());

    let mov = x.abs().max(y.abs());

    // First and third quadrant
    let (raw_left, raw_right) = if (x >= 0.0 && y >= 0.0) || (x < 0.0 && y < 0.0) {
        (mov, turn)
    } else {
        (turn, mov)
    };

    if y < 0.0 {
        return (-raw_left, -raw_right);
    }

    (raw_right, raw_left)
}

/// Clamp the magnitude of `raw` into the envelope, keeping its sign
///
/// Zero stays exactly `0.0` and is never raised to the floor.
pub fn clamp_magnitude(raw: f64, bounds: Bounds) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    raw.abs()
        .clamp(bounds.min_speed, bounds.max_speed)
        .copysign(raw)
}

/// Convert a twist into wheel speeds inside the envelope
///
/// # Arguments
/// * `angular_z` - Turn rate (sign = turn direction)
/// * `linear_x` - Forward speed (sign = direction of travel)
/// * `envelope` - Current speed bounds, read once for the whole call
///
/// # Errors
/// `MixError` if either input or either mixed value is NaN.
pub fn mix(
    angular_z: f64,
    linear_x: f64,
    envelope: &SpeedEnvelope,
) -> Result<WheelCommand, MixError> {
    if angular_z.is_nan() || linear_x.is_nan() {
        return Err(MixError::InvalidInput {
            angular_z,
            linear_x,
        });
    }

    if angular_z == 0.0 && linear_x == 0.0 {
        return Ok(WheelCommand::zero());
    }

    let bounds = envelope.current();

    // Companion controllers don't reverse the turn sense when backing up,
    // so flip it here to stay consistent with forward motion
    let angular_z = if linear_x < 0.0 { -angular_z } else { angular_z };

    let (left, right) = diffdrive(angular_z, linear_x, bounds.max_speed);

    if left.is_nan() || right.is_nan() {
        return Err(MixError::DegenerateMix { left, right });
    }

    Ok(WheelCommand {
        left: clamp_magnitude(left, bounds),
        right: clamp_magnitude(right, bounds),
    })
}
