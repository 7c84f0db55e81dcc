// Runtime-adjustable wheel speed envelope
//
// Non-zero wheel commands are kept inside [min_speed, max_speed]:
// the floor prevents motor stall, the ceiling prevents over-speed.

use tracing::{info, warn};

use crate::config::{DEFAULT_MAX_SPEED, DEFAULT_MIN_SPEED};

/// Error types for envelope construction
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum EnvelopeError {
    #[error("Invalid speed bounds: min={min}, max={max} (need 0 <= min <= max)")]
    InvalidBounds { min: f64, max: f64 },
}

/// A consistent (min, max) snapshot of the envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_speed: f64,
    pub max_speed: f64,
}

/// Mutable speed bounds, only changed through `propose`
///
/// Invariant: `0 <= min_speed <= max_speed`
#[derive(Debug, Clone)]
pub struct SpeedEnvelope {
    bounds: Bounds,
}

impl Default for SpeedEnvelope {
    fn default() -> Self {
        Self {
            bounds: Bounds {
                min_speed: DEFAULT_MIN_SPEED,
                max_speed: DEFAULT_MAX_SPEED,
            },
        }
    }
}

impl SpeedEnvelope {
    /// Create an envelope from startup parameters
    ///
    /// Unlike `propose`, a zero floor is allowed here (it is the default).
    pub fn new(min_speed: f64, max_speed: f64) -> Result<Self, EnvelopeError> {
        // Written so that NaN fails the check
        if !(min_speed >= 0.0 && max_speed >= min_speed) {
            return Err(EnvelopeError::InvalidBounds {
                min: min_speed,
                max: max_speed,
            });
        }

        Ok(Self {
            bounds: Bounds {
                min_speed,
                max_speed,
            },
        })
    }

    pub fn current(&self) -> Bounds {
        self.bounds
    }

    /// Apply a reconfiguration request and return the effective bounds
    ///
    /// * `new_min` is accepted only if `0 < new_min <= max_speed`
    /// * `new_max` is accepted only if `new_max >= min_speed`, checked against
    ///   the min that results from this same call
    ///
    /// Rejected candidates are ignored and the previous value is kept.
    pub fn propose(&mut self, new_min: Option<f64>, new_max: Option<f64>) -> Bounds {
        if let Some(min) = new_min {
            if min > 0.0 && min <= self.bounds.max_speed {
                self.bounds.min_speed = min;
            } else {
                warn!(
                    "Rejected min_speed {} (max_speed is {}), keeping {}",
                    min, self.bounds.max_speed, self.bounds.min_speed
                );
            }
        }

        if let Some(max) = new_max {
            if max >= self.bounds.min_speed {
                self.bounds.max_speed = max;
            } else {
                warn!(
                    "Rejected max_speed {} (min_speed is {}), keeping {}",
                    max, self.bounds.min_speed, self.bounds.max_speed
                );
            }
        }

        info!(
            "Speed envelope: min={} max={}",
            self.bounds.min_speed, self.bounds.max_speed
        );
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(min: f64, max: f64) -> SpeedEnvelope {
        SpeedEnvelope::new(min, max).unwrap()
    }

    #[test]
    fn test_default_bounds() {
        let bounds = SpeedEnvelope::default().current();
        assert_eq!(bounds.min_speed, 0.0);
        assert_eq!(bounds.max_speed, 1.0);
    }

    #[test]
    fn test_new_rejects_invalid_bounds() {
        assert!(SpeedEnvelope::new(-0.1, 1.0).is_err());
        assert!(SpeedEnvelope::new(0.5, 0.4).is_err());
        assert!(SpeedEnvelope::new(f64::NAN, 1.0).is_err());
        assert!(SpeedEnvelope::new(0.0, f64::NAN).is_err());
        // Zero floor and a degenerate single-point envelope are fine
        assert!(SpeedEnvelope::new(0.0, 0.0).is_ok());
        assert!(SpeedEnvelope::new(0.3, 0.3).is_ok());
    }

    #[test]
    fn test_min_above_max_is_rejected() {
        let mut env = envelope(0.0, 1.0);
        let bounds = env.propose(Some(5.0), None);
        assert_eq!(bounds.min_speed, 0.0);
        assert_eq!(env.current().min_speed, 0.0);
        assert_eq!(env.current().max_speed, 1.0);
    }

    #[test]
    fn test_min_must_be_strictly_positive() {
        let mut env = envelope(0.2, 1.0);
        env.propose(Some(0.0), None);
        assert_eq!(env.current().min_speed, 0.2);
        env.propose(Some(-0.5), None);
        assert_eq!(env.current().min_speed, 0.2);
        env.propose(Some(f64::NAN), None);
        assert_eq!(env.current().min_speed, 0.2);
    }

    #[test]
    fn test_min_equal_to_max_is_accepted() {
        let mut env = envelope(0.0, 1.0);
        let bounds = env.propose(Some(1.0), None);
        assert_eq!(bounds, Bounds { min_speed: 1.0, max_speed: 1.0 });
    }

    #[test]
    fn test_max_below_min_is_rejected() {
        let mut env = envelope(0.3, 1.0);
        let bounds = env.propose(None, Some(0.2));
        assert_eq!(bounds, Bounds { min_speed: 0.3, max_speed: 1.0 });
        env.propose(None, Some(f64::NAN));
        assert_eq!(env.current().max_speed, 1.0);
    }

    #[test]
    fn test_max_checked_against_updated_min() {
        let mut env = envelope(0.1, 1.0);
        // New min 0.8 is accepted first, so max 0.5 is then below it
        let bounds = env.propose(Some(0.8), Some(0.5));
        assert_eq!(bounds, Bounds { min_speed: 0.8, max_speed: 1.0 });

        // Min is checked against the old max, so raising both at once
        // only moves the max
        let mut env = envelope(0.1, 1.0);
        let bounds = env.propose(Some(1.5), Some(2.0));
        assert_eq!(bounds, Bounds { min_speed: 0.1, max_speed: 2.0 });
    }

    #[test]
    fn test_empty_proposal_echoes_current() {
        let mut env = envelope(0.25, 0.75);
        assert_eq!(env.propose(None, None), env.current());
        assert_eq!(env.current(), Bounds { min_speed: 0.25, max_speed: 0.75 });
    }
}
