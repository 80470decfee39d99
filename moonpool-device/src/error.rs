//! Error types for device configuration.
//!
//! The timing conversions on [`DeviceConfig`](crate::DeviceConfig) never fail.
//! Errors only come from turning text into configuration: strategy names,
//! byte counts, durations, and profile files.

use thiserror::Error;

use crate::units::NumBytes;

/// A strategy name matched none of the accepted synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseStrategyError {
    /// Input is not a known fsync strategy.
    #[error("unknown fsync strategy {0}")]
    UnknownFsyncStrategy(String),

    /// Input is not a known write strategy.
    #[error("unknown write strategy {0}")]
    UnknownWriteStrategy(String),
}

impl ParseStrategyError {
    /// The text that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            Self::UnknownFsyncStrategy(input) | Self::UnknownWriteStrategy(input) => input,
        }
    }
}

/// A byte count could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid byte count {input:?}: {reason}")]
pub struct ParseBytesError {
    /// The rejected text.
    pub input: String,
    /// What was wrong with it.
    pub reason: String,
}

impl ParseBytesError {
    pub(crate) fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or validating a device configuration.
#[derive(Debug, Error)]
pub enum DeviceConfigError {
    /// A throughput field is zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositiveRate {
        /// Name of the offending field.
        field: &'static str,
        /// The configured rate.
        value: NumBytes,
    },

    /// A size or duration field is negative.
    #[error("{field} must not be negative")]
    NegativeValue {
        /// Name of the offending field.
        field: &'static str,
    },

    /// No built-in profile carries this name.
    #[error("unknown device profile {0}")]
    UnknownProfile(String),

    /// A duration string could not be parsed.
    #[error("invalid duration {input:?}: {reason}")]
    InvalidDuration {
        /// The rejected text.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A strategy name could not be parsed.
    #[error(transparent)]
    Strategy(#[from] ParseStrategyError),

    /// A byte count could not be parsed.
    #[error(transparent)]
    Bytes(#[from] ParseBytesError),

    /// The profile file is not valid TOML for a device config.
    #[error("invalid device config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// The profile file could not be read.
    #[error("failed to read device config file: {0}")]
    Io(#[from] std::io::Error),
}
