//! Codec configuration
//!
//! The codecs themselves are pure functions; the configuration only covers
//! the choices a caller may want to make once: which time zone DATE values
//! are annotated with, and how the NUMBER print buffers are pooled.

use std::fmt;
use std::str::FromStr;

use chrono::FixedOffset;

use crate::constants::number::MAX_TEXT_LENGTH;
use crate::error::{Error, Result};

/// Default initial capacity of a pooled print buffer (the longest NUMBER text)
pub const DEFAULT_SCRATCH_CAPACITY: usize = MAX_TEXT_LENGTH;

/// Default number of print buffers kept on the free-list
pub const DEFAULT_MAX_POOLED_BUFFERS: usize = 16;

/// Time zone that decoded DATE values are annotated with
///
/// The DATE format carries no zone; the setting only decides how a decoded
/// wall-clock time is turned into an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    /// Process-local time zone
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
    /// Fixed offset from UTC
    Fixed(FixedOffset),
}

impl FromStr for TimeZoneSetting {
    type Err = Error;

    /// Parse `local`, `utc`/`z`, or an offset such as `+05:30` or `-0800`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneSetting::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed.eq_ignore_ascii_case("z") {
            return Ok(TimeZoneSetting::Utc);
        }

        trimmed
            .parse::<FixedOffset>()
            .map(TimeZoneSetting::Fixed)
            .map_err(|e| {
                Error::invalid_format(
                    s,
                    format!("expected 'local', 'utc' or an offset like +05:30: {}", e),
                )
            })
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => f.write_str("local"),
            TimeZoneSetting::Utc => f.write_str("utc"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Codec configuration
///
/// # Examples
///
/// ```rust
/// use oracle_codec::{Config, TimeZoneSetting};
///
/// let config = Config::new()
///     .with_time_zone("+01:00".parse::<TimeZoneSetting>().unwrap())
///     .max_pooled_buffers(4);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Time zone for decoded DATE instants
    pub time_zone: TimeZoneSetting,
    /// Initial capacity of pooled NUMBER print buffers
    pub scratch_capacity: usize,
    /// Maximum number of print buffers kept for reuse (0 disables pooling)
    pub max_pooled_buffers: usize,
}

impl Config {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self {
            time_zone: TimeZoneSetting::default(),
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            max_pooled_buffers: DEFAULT_MAX_POOLED_BUFFERS,
        }
    }

    /// Set the time zone used when decoding DATE values
    pub fn with_time_zone(mut self, time_zone: TimeZoneSetting) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Set the initial capacity of pooled print buffers
    pub fn scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    /// Set the maximum number of pooled print buffers
    pub fn max_pooled_buffers(mut self, max: usize) -> Self {
        self.max_pooled_buffers = max;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
