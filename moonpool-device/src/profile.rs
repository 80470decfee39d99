//! # Device Profiles
//!
//! Named device profiles and the TOML profile file format.
//!
//! A profile file starts from a built-in profile and overrides individual
//! fields. Every key is optional:
//!
//! ```toml
//! profile = "hdd"
//! seek_window = "8KiB"
//! seek_time = "4ms"
//! read_bytes_per_second = "200MiB"
//! write_bytes_per_second = 157286400
//! allocate_bytes_per_second = "800GiB"
//! request_reorder_max_delay = "50us"
//! fsync_strategy = "dumb"
//! write_strategy = "simulate"
//! metadata_op_time = "1ms"
//! ```
//!
//! Sizes accept an integer byte count or a binary-unit string, durations
//! accept humantime strings, and strategies accept any synonym.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use time::Duration;

use crate::device::{DeviceConfig, HARD_DRIVE_DEVICE_CONFIG};
use crate::error::DeviceConfigError;
use crate::strategy::{FsyncStrategy, WriteStrategy};
use crate::units::{duration_serde, NumBytes};

/// Built-in device profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceProfile {
    /// 7200 RPM rotational disk, see [`HARD_DRIVE_DEVICE_CONFIG`].
    #[default]
    HardDrive,
}

impl DeviceProfile {
    /// Every built-in profile.
    pub const ALL: [DeviceProfile; 1] = [DeviceProfile::HardDrive];

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            DeviceProfile::HardDrive => "hdd",
        }
    }

    /// Timing parameters of this profile.
    pub const fn config(self) -> DeviceConfig {
        match self {
            DeviceProfile::HardDrive => HARD_DRIVE_DEVICE_CONFIG,
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeviceProfile {
    type Err = DeviceConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hdd" | "harddrive" | "hard-drive" | "rotational" => Ok(DeviceProfile::HardDrive),
            _ => Err(DeviceConfigError::UnknownProfile(s.to_string())),
        }
    }
}

/// Look up a built-in profile's config by name, ignoring case.
pub fn profile_by_name(name: &str) -> Result<DeviceConfig, DeviceConfigError> {
    name.parse::<DeviceProfile>().map(DeviceProfile::config)
}

/// Contents of a device profile file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfigFile {
    /// Base profile name. Defaults to the hard drive profile.
    pub profile: Option<String>,
    /// Override for [`DeviceConfig::seek_window`].
    pub seek_window: Option<NumBytes>,
    /// Override for [`DeviceConfig::seek_time`].
    #[serde(default, deserialize_with = "duration_serde::option::deserialize")]
    pub seek_time: Option<Duration>,
    /// Override for [`DeviceConfig::read_bytes_per_second`].
    pub read_bytes_per_second: Option<NumBytes>,
    /// Override for [`DeviceConfig::write_bytes_per_second`].
    pub write_bytes_per_second: Option<NumBytes>,
    /// Override for [`DeviceConfig::allocate_bytes_per_second`].
    pub allocate_bytes_per_second: Option<NumBytes>,
    /// Override for [`DeviceConfig::request_reorder_max_delay`].
    #[serde(default, deserialize_with = "duration_serde::option::deserialize")]
    pub request_reorder_max_delay: Option<Duration>,
    /// Override for [`DeviceConfig::fsync_strategy`].
    pub fsync_strategy: Option<FsyncStrategy>,
    /// Override for [`DeviceConfig::write_strategy`].
    pub write_strategy: Option<WriteStrategy>,
    /// Override for [`DeviceConfig::metadata_op_time`].
    #[serde(default, deserialize_with = "duration_serde::option::deserialize")]
    pub metadata_op_time: Option<Duration>,
}

impl DeviceConfigFile {
    /// Parse a profile file from TOML text.
    pub fn parse(text: &str) -> Result<Self, DeviceConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply the overrides to the base profile and validate the result.
    pub fn resolve(&self) -> Result<DeviceConfig, DeviceConfigError> {
        let base = match &self.profile {
            Some(name) => name.parse::<DeviceProfile>()?,
            None => DeviceProfile::default(),
        };
        tracing::debug!(profile = %base, "resolving device config");

        let mut config = base.config();
        if let Some(value) = self.seek_window {
            tracing::debug!(%value, "override seek_window");
            config.seek_window = value;
        }
        if let Some(value) = self.seek_time {
            tracing::debug!(%value, "override seek_time");
            config.seek_time = value;
        }
        if let Some(value) = self.read_bytes_per_second {
            tracing::debug!(%value, "override read_bytes_per_second");
            config.read_bytes_per_second = value;
        }
        if let Some(value) = self.write_bytes_per_second {
            tracing::debug!(%value, "override write_bytes_per_second");
            config.write_bytes_per_second = value;
        }
        if let Some(value) = self.allocate_bytes_per_second {
            tracing::debug!(%value, "override allocate_bytes_per_second");
            config.allocate_bytes_per_second = value;
        }
        if let Some(value) = self.request_reorder_max_delay {
            tracing::debug!(%value, "override request_reorder_max_delay");
            config.request_reorder_max_delay = value;
        }
        if let Some(value) = self.fsync_strategy {
            tracing::debug!(%value, "override fsync_strategy");
            config.fsync_strategy = value;
        }
        if let Some(value) = self.write_strategy {
            tracing::debug!(%value, "override write_strategy");
            config.write_strategy = value;
        }
        if let Some(value) = self.metadata_op_time {
            tracing::debug!(%value, "override metadata_op_time");
            config.metadata_op_time = value;
        }

        if let Err(e) = config.validate() {
            tracing::warn!(profile = %base, error = %e, "device config failed validation");
            return Err(e);
        }
        Ok(config)
    }
}

/// Build a validated [`DeviceConfig`] from TOML profile text.
pub fn load_device_config(text: &str) -> Result<DeviceConfig, DeviceConfigError> {
    DeviceConfigFile::parse(text)?.resolve()
}

/// Read a TOML profile file and build a validated [`DeviceConfig`].
pub fn load_device_config_file(path: impl AsRef<Path>) -> Result<DeviceConfig, DeviceConfigError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading device config file");
    let text = std::fs::read_to_string(path)?;
    load_device_config(&text)
}
