//! Byte quantities and duration helpers.
//!
//! [`NumBytes`] is signed on purpose: it doubles as a magnitude and as the
//! numerator of a bytes-per-second rate, and the conversion formulas stay
//! linear over negative inputs.

use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::{DeviceConfigError, ParseBytesError};

/// Nanoseconds in one second, as a float for the proportional math.
pub(crate) const NANOS_PER_SECOND: f64 = 1_000_000_000.0;

/// A signed number of bytes.
///
/// Arithmetic saturates at the `i64` bounds instead of overflowing.
///
/// # Examples
///
/// ```
/// use moonpool_device::{NumBytes, MEBIBYTE};
///
/// let size: NumBytes = "100MiB".parse().unwrap();
/// assert_eq!(size, MEBIBYTE * 100);
/// assert_eq!(size.to_string(), "100MiB");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "RawBytes", into = "String")]
pub struct NumBytes(i64);

/// One byte.
pub const BYTE: NumBytes = NumBytes(1);
/// 1024 bytes.
pub const KIBIBYTE: NumBytes = NumBytes(1 << 10);
/// 1024 KiB.
pub const MEBIBYTE: NumBytes = NumBytes(1 << 20);
/// 1024 MiB.
pub const GIBIBYTE: NumBytes = NumBytes(1 << 30);
/// 1024 GiB.
pub const TEBIBYTE: NumBytes = NumBytes(1 << 40);

// Largest first, Display picks the first exact divisor.
const DISPLAY_UNITS: [(NumBytes, &str); 4] = [
    (TEBIBYTE, "TiB"),
    (GIBIBYTE, "GiB"),
    (MEBIBYTE, "MiB"),
    (KIBIBYTE, "KiB"),
];

impl NumBytes {
    /// Zero bytes.
    pub const ZERO: NumBytes = NumBytes(0);

    /// Wrap a raw byte count.
    pub const fn new(bytes: i64) -> Self {
        Self(bytes)
    }

    /// `n` KiB, saturating at the `i64` bounds.
    pub const fn kibibytes(n: i64) -> Self {
        Self(n.saturating_mul(KIBIBYTE.0))
    }

    /// `n` MiB, saturating at the `i64` bounds.
    pub const fn mebibytes(n: i64) -> Self {
        Self(n.saturating_mul(MEBIBYTE.0))
    }

    /// `n` GiB, saturating at the `i64` bounds.
    pub const fn gibibytes(n: i64) -> Self {
        Self(n.saturating_mul(GIBIBYTE.0))
    }

    /// The raw byte count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// The byte count as a float, for proportional math.
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Convert a float back to bytes, truncating toward zero.
    ///
    /// Out-of-range values saturate at the `i64` bounds and NaN maps to zero.
    pub fn from_f64_truncated(value: f64) -> Self {
        Self(value as i64)
    }

    /// `self - other`, or `None` on overflow.
    pub fn checked_sub(self, other: NumBytes) -> Option<NumBytes> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Returns true if the count is strictly greater than zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the count is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for NumBytes {
    fn from(bytes: i64) -> Self {
        Self(bytes)
    }
}

impl From<NumBytes> for i64 {
    fn from(bytes: NumBytes) -> Self {
        bytes.0
    }
}

impl Add for NumBytes {
    type Output = NumBytes;

    fn add(self, rhs: NumBytes) -> NumBytes {
        NumBytes(self.0.saturating_add(rhs.0))
    }
}

impl Sub for NumBytes {
    type Output = NumBytes;

    fn sub(self, rhs: NumBytes) -> NumBytes {
        NumBytes(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for NumBytes {
    type Output = NumBytes;

    fn mul(self, rhs: i64) -> NumBytes {
        NumBytes(self.0.saturating_mul(rhs))
    }
}

impl Mul<NumBytes> for i64 {
    type Output = NumBytes;

    fn mul(self, rhs: NumBytes) -> NumBytes {
        NumBytes(self.saturating_mul(rhs.0))
    }
}

impl fmt::Display for NumBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 != 0 {
            for (unit, suffix) in DISPLAY_UNITS {
                if self.0 % unit.0 == 0 {
                    return write!(f, "{}{}", self.0 / unit.0, suffix);
                }
            }
        }
        write!(f, "{}B", self.0)
    }
}

fn unit_multiplier(unit: &str) -> Option<i64> {
    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => BYTE,
        "k" | "kb" | "kib" => KIBIBYTE,
        "m" | "mb" | "mib" => MEBIBYTE,
        "g" | "gb" | "gib" => GIBIBYTE,
        "t" | "tb" | "tib" => TEBIBYTE,
        _ => return None,
    };
    Some(multiplier.0)
}

impl FromStr for NumBytes {
    type Err = ParseBytesError;

    /// Parse `"<integer>[unit]"`. All units are binary: `KB` means KiB.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '-' || c == '+'))
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let magnitude: i64 = number
            .parse()
            .map_err(|e| ParseBytesError::new(s, format!("invalid number {number:?}: {e}")))?;
        let multiplier = unit_multiplier(unit.trim())
            .ok_or_else(|| ParseBytesError::new(s, format!("unknown unit {:?}", unit.trim())))?;

        magnitude
            .checked_mul(multiplier)
            .map(NumBytes)
            .ok_or_else(|| ParseBytesError::new(s, "value overflows i64"))
    }
}

/// Wire form accepted when deserializing a [`NumBytes`].
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytes {
    Count(i64),
    Text(String),
}

impl TryFrom<RawBytes> for NumBytes {
    type Error = ParseBytesError;

    fn try_from(raw: RawBytes) -> Result<Self, Self::Error> {
        match raw {
            RawBytes::Count(bytes) => Ok(NumBytes(bytes)),
            RawBytes::Text(text) => text.parse(),
        }
    }
}

impl From<NumBytes> for String {
    fn from(bytes: NumBytes) -> Self {
        bytes.to_string()
    }
}

/// Parse a human-readable duration such as `"10ms"` or `"1m 30s"`.
///
/// A leading `-` yields a negative duration.
pub fn parse_duration(input: &str) -> Result<Duration, DeviceConfigError> {
    let invalid = |reason: String| DeviceConfigError::InvalidDuration {
        input: input.to_string(),
        reason,
    };

    let trimmed = input.trim();
    let (negative, magnitude) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, trimmed),
    };

    let std_duration = humantime::parse_duration(magnitude).map_err(|e| invalid(e.to_string()))?;
    let duration = Duration::try_from(std_duration).map_err(|e| invalid(e.to_string()))?;
    Ok(if negative { -duration } else { duration })
}

/// Format a duration the way [`parse_duration`] reads it back.
pub fn format_duration(duration: Duration) -> String {
    let formatted = humantime::format_duration(duration.unsigned_abs()).to_string();
    if duration.is_negative() {
        format!("-{formatted}")
    } else {
        formatted
    }
}

/// Serde adapter storing a [`Duration`] as a humantime string.
pub(crate) mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Duration;

    pub(crate) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_duration(*duration))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_duration(&text).map_err(serde::de::Error::custom)
    }

    /// Same as the parent module, for optional fields.
    pub(crate) mod option {
        use serde::{Deserialize, Deserializer};
        use time::Duration;

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| crate::units::parse_duration(&text).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}
