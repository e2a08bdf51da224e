//! Error types for stacking-rail.
//!
//! Provides unified error handling across configuration, command parsing,
//! session start-up, and rail/shutter hardware. None of these are fatal: the
//! controller logs them and keeps ticking.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stacking-rail operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Inbound command could not be decoded
    Command(ParseError),
    /// Stacking session could not start
    Session(SessionError),
    /// Rail motion error
    Motion(MotionError),
    /// Camera trigger error
    Shutter(ShutterError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Travel limit must be > 0
    InvalidTravelLimit(i64),
    /// Max speed must be > 0
    InvalidMaxSpeed(f32),
    /// Acceleration must be > 0
    InvalidAcceleration(f32),
    /// A pulse length, interval, or timeout was zero
    ZeroDuration(&'static str),
    /// A builder was missing a required part
    MissingField(&'static str),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Command decoding errors.
///
/// A command that fails to parse is dropped without any state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// The 3-character opcode is not valid for this endpoint
    UnknownOpcode,
    /// The operand is not a positive step count
    InvalidOperand,
    /// The payload does not fit the command buffer
    PayloadTooLong,
}

/// Session start-up errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// A required field of the stacking command was unset or zero
    ConfigIncomplete(SessionField),
}

/// Required fields of a stacking command, named by their wire IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionField {
    /// `PRE`: wait before each shutter release
    PreShutterWait,
    /// `PST`: wait after the last release of a step
    PostShutterWait,
    /// `STP`: releases per rail position
    ShuttersPerStep,
    /// `STS`: steps per rail move
    StepSize,
    /// `DIR`: travel direction
    Direction,
    /// `NST`: number of rail moves
    TotalSteps,
    /// `RTS`: return to the start position afterwards
    ReturnToStart,
}

/// Rail motion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// STEP or DIR pin operation failed
    PinError,
    /// The rail did not reach its target within the watchdog timeout
    Stalled {
        /// Position when the watchdog fired
        position: i64,
        /// Target that was never reached
        target: i64,
    },
}

/// Camera trigger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShutterError {
    /// Trigger pin operation failed
    PinError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Session(e) => write!(f, "Session error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Shutter(e) => write!(f, "Shutter error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidTravelLimit(v) => {
                write!(f, "Invalid travel limit: {}. Must be > 0", v)
            }
            ConfigError::InvalidMaxSpeed(v) => write!(f, "Invalid max speed: {}. Must be > 0", v),
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be > 0", v)
            }
            ConfigError::ZeroDuration(key) => write!(f, "'{}' must be non-zero", key),
            ConfigError::MissingField(name) => write!(f, "{} is required", name),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnknownOpcode => write!(f, "Unknown opcode"),
            ParseError::InvalidOperand => write!(f, "Operand is not a positive step count"),
            ParseError::PayloadTooLong => write!(f, "Payload too long"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::ConfigIncomplete(field) => {
                write!(f, "Stacking command incomplete: {} unset", field.wire_id())
            }
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::PinError => write!(f, "GPIO pin operation failed"),
            MotionError::Stalled { position, target } => {
                write!(f, "Rail stalled at {} before reaching {}", position, target)
            }
        }
    }
}

impl fmt::Display for ShutterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutterError::PinError => write!(f, "Shutter pin operation failed"),
        }
    }
}

impl SessionField {
    /// The 3-character ID this field is sent under.
    pub fn wire_id(self) -> &'static str {
        match self {
            SessionField::PreShutterWait => "PRE",
            SessionField::PostShutterWait => "PST",
            SessionField::ShuttersPerStep => "STP",
            SessionField::StepSize => "STS",
            SessionField::Direction => "DIR",
            SessionField::TotalSteps => "NST",
            SessionField::ReturnToStart => "RTS",
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Command(e)
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Error::Session(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<ShutterError> for Error {
    fn from(e: ShutterError) -> Self {
        Error::Shutter(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for ShutterError {}
