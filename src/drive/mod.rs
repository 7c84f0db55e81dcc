// Differential-drive control for a two-wheeled base
//
// Provides:
// - Runtime-adjustable wheel speed envelope (stall floor + speed ceiling)
// - Twist to left/right wheel speed mixing

pub mod envelope;
pub mod mixing;

pub use envelope::{Bounds, EnvelopeError, SpeedEnvelope};
pub use mixing::{MixError, WheelCommand, diffdrive, mix};
