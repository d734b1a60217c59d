//! Error types for controller configuration.

use std::fmt;

/// Result type for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// A tuning value that would make the controller misbehave.
///
/// None of these are checked per tick. [`crate::ControllerConfig::validate`]
/// reports them once at startup so a bad tuning file fails fast.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Gravity must be a negative acceleration.
    NonNegativeGravity { gravity: f32 },
    /// Terminal velocity must be negative, otherwise gravity integration stalls.
    NonNegativeTerminalVelocity { terminal_velocity: f32 },
    /// A timer duration was negative.
    NegativeDuration { field: &'static str, value: f32 },
    /// Rotation smooth time outside of `[0, 0.3]`.
    RotationSmoothTimeOutOfRange { value: f32 },
    /// The pitch clamp has its bounds the wrong way round.
    InvertedPitchClamp { bottom: f32, top: f32 },
    /// A speed or rate was negative.
    NegativeSpeed { field: &'static str, value: f32 },
    /// The grounded probe radius was negative.
    NegativeRadius { radius: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonNegativeGravity { gravity } => {
                write!(f, "gravity must be negative, got {gravity}")
            }
            Self::NonNegativeTerminalVelocity { terminal_velocity } => {
                write!(
                    f,
                    "terminal velocity must be negative, got {terminal_velocity}"
                )
            }
            Self::NegativeDuration { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::RotationSmoothTimeOutOfRange { value } => {
                write!(f, "rotation smooth time must be within [0, 0.3], got {value}")
            }
            Self::InvertedPitchClamp { bottom, top } => {
                write!(f, "bottom clamp {bottom} is above top clamp {top}")
            }
            Self::NegativeSpeed { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NegativeRadius { radius } => {
                write!(f, "grounded radius must not be negative, got {radius}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
