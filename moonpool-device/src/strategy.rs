//! Fsync and write cost strategies.
//!
//! Each strategy has one canonical name and a set of case-insensitive
//! synonyms accepted when parsing configuration.
//!
//! | Strategy | Canonical name | Synonyms |
//! |----------|----------------|----------|
//! | [`FsyncStrategy::NoFsync`] | `NoFsync` | `nofsync`, `none`, `no` |
//! | [`FsyncStrategy::DumbFsync`] | `DumbFsync` | `dumbfsync`, `dumb` |
//! | [`FsyncStrategy::WriteBackCachedFsync`] | `WriteBackCachedFsync` | `writebackcachedfsync`, `writebackcache`, `wbc` |
//! | [`WriteStrategy::FastWrite`] | `FastWrite` | `fastwrite`, `fast` |
//! | [`WriteStrategy::SimulateWrite`] | `SimulateWrite` | `simulatewrite`, `simulate` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseStrategyError;

/// Shown for fsync strategy codes outside the known set.
pub const UNKNOWN_FSYNC_STRATEGY: &str = "unknown fsync strategy";

/// Shown for write strategy codes outside the known set.
pub const UNKNOWN_WRITE_STRATEGY: &str = "unknown write strategy";

/// How fsync calls are charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum FsyncStrategy {
    /// Fsync takes zero time.
    NoFsync,
    /// Fsync always takes ten seek times, regardless of pending data.
    DumbFsync,
    /// Writes land in a write-back cache that drains during idle I/O time.
    ///
    /// An fsync costs whatever is still unflushed for that file. The
    /// write-back simulator owns that computation; this variant only
    /// selects it.
    WriteBackCachedFsync,
}

impl FsyncStrategy {
    /// Every variant, in code order.
    pub const ALL: [FsyncStrategy; 3] = [
        FsyncStrategy::NoFsync,
        FsyncStrategy::DumbFsync,
        FsyncStrategy::WriteBackCachedFsync,
    ];

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            FsyncStrategy::NoFsync => "NoFsync",
            FsyncStrategy::DumbFsync => "DumbFsync",
            FsyncStrategy::WriteBackCachedFsync => "WriteBackCachedFsync",
        }
    }

    /// Numeric code, starting at 0 in declaration order.
    pub const fn code(self) -> i64 {
        match self {
            FsyncStrategy::NoFsync => 0,
            FsyncStrategy::DumbFsync => 1,
            FsyncStrategy::WriteBackCachedFsync => 2,
        }
    }

    /// Variant for a numeric code, if the code is known.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FsyncStrategy::NoFsync),
            1 => Some(FsyncStrategy::DumbFsync),
            2 => Some(FsyncStrategy::WriteBackCachedFsync),
            _ => None,
        }
    }

    /// Display name for a raw code, falling back to [`UNKNOWN_FSYNC_STRATEGY`].
    pub const fn name_for_code(code: i64) -> &'static str {
        match Self::from_code(code) {
            Some(strategy) => strategy.name(),
            None => UNKNOWN_FSYNC_STRATEGY,
        }
    }
}

impl fmt::Display for FsyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FsyncStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nofsync" | "none" | "no" => Ok(FsyncStrategy::NoFsync),
            "dumbfsync" | "dumb" => Ok(FsyncStrategy::DumbFsync),
            "writebackcachedfsync" | "writebackcache" | "wbc" => {
                Ok(FsyncStrategy::WriteBackCachedFsync)
            }
            _ => Err(ParseStrategyError::UnknownFsyncStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for FsyncStrategy {
    type Error = ParseStrategyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FsyncStrategy> for &'static str {
    fn from(strategy: FsyncStrategy) -> Self {
        strategy.name()
    }
}

/// How writes are charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum WriteStrategy {
    /// Writes take zero time, as if cached. Pairs with
    /// [`FsyncStrategy::WriteBackCachedFsync`].
    FastWrite,
    /// Writes behave like reads: seeks when non-sequential, then
    /// transfer at the write throughput.
    SimulateWrite,
}

impl WriteStrategy {
    /// Every variant, in code order.
    pub const ALL: [WriteStrategy; 2] = [WriteStrategy::FastWrite, WriteStrategy::SimulateWrite];

    /// Canonical name.
    pub const fn name(self) -> &'static str {
        match self {
            WriteStrategy::FastWrite => "FastWrite",
            WriteStrategy::SimulateWrite => "SimulateWrite",
        }
    }

    /// Numeric code, starting at 0 in declaration order.
    pub const fn code(self) -> i64 {
        match self {
            WriteStrategy::FastWrite => 0,
            WriteStrategy::SimulateWrite => 1,
        }
    }

    /// Variant for a numeric code, if the code is known.
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(WriteStrategy::FastWrite),
            1 => Some(WriteStrategy::SimulateWrite),
            _ => None,
        }
    }

    /// Display name for a raw code, falling back to [`UNKNOWN_WRITE_STRATEGY`].
    pub const fn name_for_code(code: i64) -> &'static str {
        match Self::from_code(code) {
            Some(strategy) => strategy.name(),
            None => UNKNOWN_WRITE_STRATEGY,
        }
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WriteStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fastwrite" | "fast" => Ok(WriteStrategy::FastWrite),
            "simulatewrite" | "simulate" => Ok(WriteStrategy::SimulateWrite),
            _ => Err(ParseStrategyError::UnknownWriteStrategy(s.to_string())),
        }
    }
}

impl TryFrom<String> for WriteStrategy {
    type Error = ParseStrategyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WriteStrategy> for &'static str {
    fn from(strategy: WriteStrategy) -> Self {
        strategy.name()
    }
}

/// Parse an fsync strategy from any accepted synonym, ignoring case.
pub fn parse_fsync_strategy(s: &str) -> Result<FsyncStrategy, ParseStrategyError> {
    s.parse()
}

/// Parse a write strategy from any accepted synonym, ignoring case.
pub fn parse_write_strategy(s: &str) -> Result<WriteStrategy, ParseStrategyError> {
    s.parse()
}
