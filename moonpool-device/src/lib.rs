//! # Moonpool Device Model
//!
//! Timing model of a physical storage device, for simulators that inject
//! realistic delays into read, write, fsync and allocate calls.
//!
//! The model is a plain value: a [`DeviceConfig`] holds throughput, seek and
//! reordering parameters plus the [`FsyncStrategy`] and [`WriteStrategy`]
//! that a scheduler should apply. Its methods convert byte counts into
//! simulated durations and back. Nothing here does I/O or holds mutable
//! state, so one config can be shared freely across threads.
//!
//! ## Quick Start
//!
//! ```rust
//! use moonpool_device::{Duration, FsyncStrategy, HARD_DRIVE_DEVICE_CONFIG, MEBIBYTE};
//!
//! let config = HARD_DRIVE_DEVICE_CONFIG.with_fsync_strategy("dumb".parse().unwrap());
//! assert_eq!(config.fsync_strategy, FsyncStrategy::DumbFsync);
//!
//! // 1 MiB at 100 MiB/s
//! assert_eq!(config.write_time(MEBIBYTE), Duration::milliseconds(10));
//! assert_eq!(config.fsync_time(), Some(Duration::milliseconds(100)));
//! ```
//!
//! ## Loading Profiles
//!
//! Simulation scenarios usually pick a built-in profile by name and override
//! a few fields from a TOML file, see [`profile`].
//!
//! ```rust
//! use moonpool_device::{load_device_config, WriteStrategy};
//!
//! let config = load_device_config(r#"
//!     profile = "hdd"
//!     write_strategy = "simulate"
//! "#).unwrap();
//! assert_eq!(config.write_strategy, WriteStrategy::SimulateWrite);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]

/// Device parameters and time/byte conversions.
pub mod device;

/// Error types.
pub mod error;

/// Named profiles and profile files.
pub mod profile;

/// Fsync and write strategies.
pub mod strategy;

/// Byte quantities and duration helpers.
pub mod units;

/// Signed duration used throughout the model.
pub use time::Duration;

pub use device::{DeviceConfig, DUMB_FSYNC_SEEK_MULTIPLIER, HARD_DRIVE_DEVICE_CONFIG};
pub use error::{DeviceConfigError, ParseBytesError, ParseStrategyError};
pub use profile::{
    load_device_config, load_device_config_file, profile_by_name, DeviceConfigFile, DeviceProfile,
};
pub use strategy::{
    parse_fsync_strategy, parse_write_strategy, FsyncStrategy, WriteStrategy,
    UNKNOWN_FSYNC_STRATEGY, UNKNOWN_WRITE_STRATEGY,
};
pub use units::{
    format_duration, parse_duration, NumBytes, BYTE, GIBIBYTE, KIBIBYTE, MEBIBYTE, TEBIBYTE,
};
