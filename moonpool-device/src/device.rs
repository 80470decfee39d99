//! # Device Timing Model
//!
//! [`DeviceConfig`] describes how a physical medium behaves and turns byte
//! counts into simulated time (and back). Every method is a pure function of
//! the config and its arguments.
//!
//! ## Conversions
//!
//! | Method | Formula | Rate field |
//! |--------|---------|------------|
//! | [`read_time`](DeviceConfig::read_time) | `bytes / rate` seconds | `read_bytes_per_second` |
//! | [`write_time`](DeviceConfig::write_time) | `bytes / rate` seconds | `write_bytes_per_second` |
//! | [`allocate_time`](DeviceConfig::allocate_time) | `bytes / rate` seconds | `allocate_bytes_per_second` |
//! | [`readable_bytes`](DeviceConfig::readable_bytes) | `seconds * rate` bytes, 0 if `duration <= 0` | `read_bytes_per_second` |
//! | [`writable_bytes`](DeviceConfig::writable_bytes) | `seconds * rate` bytes, 0 if `duration <= 0` | `write_bytes_per_second` |
//!
//! Both directions go through `f64` and truncate toward zero: durations at
//! nanosecond granularity, byte counts at whole bytes. The `*_time` methods
//! are linear over negative byte counts; only the `*_bytes` methods clamp.
//!
//! ## Reference Profile
//!
//! [`HARD_DRIVE_DEVICE_CONFIG`] approximates a 7200 RPM rotational disk.
//!
//! ```rust
//! use moonpool_device::{Duration, HARD_DRIVE_DEVICE_CONFIG, MEBIBYTE};
//!
//! let config = HARD_DRIVE_DEVICE_CONFIG;
//! assert_eq!(config.read_time(MEBIBYTE * 100), Duration::seconds(1));
//! assert_eq!(config.readable_bytes(Duration::seconds(-1)).get(), 0);
//! ```

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::DeviceConfigError;
use crate::strategy::{FsyncStrategy, WriteStrategy};
use crate::units::{duration_serde, NumBytes, NANOS_PER_SECOND};

/// Fsync under [`FsyncStrategy::DumbFsync`] costs this many seek times.
pub const DUMB_FSYNC_SEEK_MULTIPLIER: i32 = 10;

/// Physical parameters of a simulated storage device.
///
/// Throughput fields must be strictly positive for the conversions to be
/// meaningful; see [`DeviceConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// How far ahead of the last access position an access can land and
    /// still count as sequential.
    pub seek_window: NumBytes,

    /// Average cost of a seek.
    #[serde(with = "duration_serde")]
    pub seek_time: Duration,

    /// Sustained read throughput, bytes per second.
    pub read_bytes_per_second: NumBytes,

    /// Sustained write throughput, bytes per second.
    pub write_bytes_per_second: NumBytes,

    /// Throughput of block allocation (fallocate), bytes per second.
    pub allocate_bytes_per_second: NumBytes,

    /// How much later a request may arrive after a previous one and still
    /// be reordered ahead of it.
    #[serde(with = "duration_serde")]
    pub request_reorder_max_delay: Duration,

    /// Cost model for fsync.
    pub fsync_strategy: FsyncStrategy,

    /// Cost model for writes.
    pub write_strategy: WriteStrategy,

    /// Fixed cost of metadata-only operations (chmod, chown, rename, ...).
    #[serde(with = "duration_serde")]
    pub metadata_op_time: Duration,
}

/// Basic model of a 7200 RPM hard disk.
pub const HARD_DRIVE_DEVICE_CONFIG: DeviceConfig = DeviceConfig {
    seek_window: NumBytes::kibibytes(4),
    seek_time: Duration::milliseconds(10),
    read_bytes_per_second: NumBytes::mebibytes(100),
    write_bytes_per_second: NumBytes::mebibytes(100),
    // ext4 blocks are 4 KiB, so allocating is 4096 times faster than writing.
    allocate_bytes_per_second: NumBytes::mebibytes(4096 * 100),
    request_reorder_max_delay: Duration::microseconds(100),
    fsync_strategy: FsyncStrategy::WriteBackCachedFsync,
    write_strategy: WriteStrategy::FastWrite,
    metadata_op_time: Duration::milliseconds(10),
};

impl Default for DeviceConfig {
    fn default() -> Self {
        HARD_DRIVE_DEVICE_CONFIG
    }
}

impl DeviceConfig {
    /// Time to write `num_bytes` at the write throughput.
    pub fn write_time(&self, num_bytes: NumBytes) -> Duration {
        time_from_throughput(num_bytes, self.write_bytes_per_second)
    }

    /// Time to read `num_bytes` at the read throughput.
    pub fn read_time(&self, num_bytes: NumBytes) -> Duration {
        time_from_throughput(num_bytes, self.read_bytes_per_second)
    }

    /// Time to allocate `num_bytes` at the allocate throughput.
    pub fn allocate_time(&self, num_bytes: NumBytes) -> Duration {
        time_from_throughput(num_bytes, self.allocate_bytes_per_second)
    }

    /// Bytes that can be written in `duration`. Zero when `duration <= 0`.
    pub fn writable_bytes(&self, duration: Duration) -> NumBytes {
        bytes_from_time(duration, self.write_bytes_per_second)
    }

    /// Bytes that can be read in `duration`. Zero when `duration <= 0`.
    pub fn readable_bytes(&self, duration: Duration) -> NumBytes {
        bytes_from_time(duration, self.read_bytes_per_second)
    }

    /// Cost of a fsync under [`FsyncStrategy::DumbFsync`], saturating at
    /// the [`Duration`] bounds.
    pub fn dumb_fsync_time(&self) -> Duration {
        self.seek_time.saturating_mul(DUMB_FSYNC_SEEK_MULTIPLIER)
    }

    /// Fixed fsync cost for the configured strategy.
    ///
    /// Returns `None` for [`FsyncStrategy::WriteBackCachedFsync`], whose cost
    /// depends on unflushed data tracked by the write-back simulator.
    pub fn fsync_time(&self) -> Option<Duration> {
        match self.fsync_strategy {
            FsyncStrategy::NoFsync => Some(Duration::ZERO),
            FsyncStrategy::DumbFsync => Some(self.dumb_fsync_time()),
            FsyncStrategy::WriteBackCachedFsync => None,
        }
    }

    /// Transfer cost of writing `num_bytes` under the configured write
    /// strategy. Seek cost is not included.
    pub fn write_cost(&self, num_bytes: NumBytes) -> Duration {
        match self.write_strategy {
            WriteStrategy::FastWrite => Duration::ZERO,
            WriteStrategy::SimulateWrite => self.write_time(num_bytes),
        }
    }

    /// Whether moving from `last_position` to `next_position` is a seek.
    ///
    /// Forward moves of at most `seek_window` bytes are sequential; any
    /// backward move is a seek.
    pub fn is_seek(&self, last_position: NumBytes, next_position: NumBytes) -> bool {
        match next_position.checked_sub(last_position) {
            Some(distance) => distance.is_negative() || distance > self.seek_window,
            None => true,
        }
    }

    /// Check the invariants the conversions rely on.
    ///
    /// # Errors
    ///
    /// [`DeviceConfigError::NonPositiveRate`] for a zero or negative
    /// throughput, [`DeviceConfigError::NegativeValue`] for a negative
    /// window or duration.
    pub fn validate(&self) -> Result<(), DeviceConfigError> {
        let rates = [
            ("read_bytes_per_second", self.read_bytes_per_second),
            ("write_bytes_per_second", self.write_bytes_per_second),
            ("allocate_bytes_per_second", self.allocate_bytes_per_second),
        ];
        for (field, value) in rates {
            if !value.is_positive() {
                return Err(DeviceConfigError::NonPositiveRate { field, value });
            }
        }

        if self.seek_window.is_negative() {
            return Err(DeviceConfigError::NegativeValue {
                field: "seek_window",
            });
        }

        let durations = [
            ("seek_time", self.seek_time),
            ("request_reorder_max_delay", self.request_reorder_max_delay),
            ("metadata_op_time", self.metadata_op_time),
        ];
        for (field, value) in durations {
            if value.is_negative() {
                return Err(DeviceConfigError::NegativeValue { field });
            }
        }

        Ok(())
    }

    /// Copy with a different seek window.
    pub fn with_seek_window(mut self, seek_window: NumBytes) -> Self {
        self.seek_window = seek_window;
        self
    }

    /// Copy with a different seek time.
    pub fn with_seek_time(mut self, seek_time: Duration) -> Self {
        self.seek_time = seek_time;
        self
    }

    /// Copy with a different read throughput.
    pub fn with_read_bytes_per_second(mut self, rate: NumBytes) -> Self {
        self.read_bytes_per_second = rate;
        self
    }

    /// Copy with a different write throughput.
    pub fn with_write_bytes_per_second(mut self, rate: NumBytes) -> Self {
        self.write_bytes_per_second = rate;
        self
    }

    /// Copy with a different allocate throughput.
    pub fn with_allocate_bytes_per_second(mut self, rate: NumBytes) -> Self {
        self.allocate_bytes_per_second = rate;
        self
    }

    /// Copy with a different reorder window.
    pub fn with_request_reorder_max_delay(mut self, delay: Duration) -> Self {
        self.request_reorder_max_delay = delay;
        self
    }

    /// Copy with a different fsync strategy.
    pub fn with_fsync_strategy(mut self, strategy: FsyncStrategy) -> Self {
        self.fsync_strategy = strategy;
        self
    }

    /// Copy with a different write strategy.
    pub fn with_write_strategy(mut self, strategy: WriteStrategy) -> Self {
        self.write_strategy = strategy;
        self
    }

    /// Copy with a different metadata operation cost.
    pub fn with_metadata_op_time(mut self, time: Duration) -> Self {
        self.metadata_op_time = time;
        self
    }
}

fn time_from_throughput(num_bytes: NumBytes, bytes_per_second: NumBytes) -> Duration {
    let seconds = num_bytes.as_f64() / bytes_per_second.as_f64();
    // `as` truncates toward zero and saturates.
    Duration::nanoseconds((seconds * NANOS_PER_SECOND) as i64)
}

fn bytes_from_time(duration: Duration, bytes_per_second: NumBytes) -> NumBytes {
    if duration <= Duration::ZERO {
        return NumBytes::ZERO;
    }
    let seconds = duration.whole_nanoseconds() as f64 / NANOS_PER_SECOND;
    NumBytes::from_f64_truncated(seconds * bytes_per_second.as_f64())
}
