//! Oracle DATE encoding and decoding
//!
//! Oracle DATE format (7 bytes):
//! - Byte 0: Century (value + 100)
//! - Byte 1: Year in century (value + 100)
//! - Byte 2: Month (1-12)
//! - Byte 3: Day (1-31)
//! - Byte 4: Hour + 1 (1-24)
//! - Byte 5: Minute + 1 (1-60)
//! - Byte 6: Second + 1 (1-60)
//!
//! Century and year use truncating division, so negative years keep both
//! bytes below 100. The all-zero buffer is the NULL date; every real date
//! has all seven bytes non-zero.

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut};
use chrono::{
    DateTime, Datelike, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone,
    Timelike, Utc,
};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::config::{Config, TimeZoneSetting};
use crate::constants::date::{CENTURY_OFFSET, LENGTH, MAX_YEAR, MIN_YEAR, TIME_OFFSET};
use crate::error::{Error, Result};

/// Canonical text layout, as accepted by chrono's formatter
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Decoded Oracle DATE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OracleDate {
    /// Year (e.g., 2024; negative for BC)
    pub year: i32,
    /// Month (1-12)
    pub month: u8,
    /// Day (1-31)
    pub day: u8,
    /// Hour (0-23)
    pub hour: u8,
    /// Minute (0-59)
    pub minute: u8,
    /// Second (0-59)
    pub second: u8,
}

impl OracleDate {
    /// Create a new Oracle date
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Create a date-only value (time set to 00:00:00)
    pub fn date(year: i32, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Encode to Oracle wire format (7 bytes)
    ///
    /// The year is clamped into -4712..=9999 first.
    pub fn to_oracle_bytes(&self) -> [u8; LENGTH] {
        let year = self.year.clamp(MIN_YEAR, MAX_YEAR);
        let century = (year / 100 + CENTURY_OFFSET) as u8;
        let year_in_century = (year % 100 + CENTURY_OFFSET) as u8;

        [
            century,
            year_in_century,
            self.month,
            self.day,
            self.hour.wrapping_add(TIME_OFFSET),
            self.minute.wrapping_add(TIME_OFFSET),
            self.second.wrapping_add(TIME_OFFSET),
        ]
    }

    /// Decode from Oracle wire format without NULL detection
    ///
    /// Fields are not range checked; malformed input yields whatever the
    /// inverse of the layout gives.
    pub fn from_oracle_bytes(data: &[u8; LENGTH]) -> Self {
        let century = i32::from(data[0]) - CENTURY_OFFSET;
        let year_in_century = i32::from(data[1]) - CENTURY_OFFSET;

        Self {
            year: century * 100 + year_in_century,
            month: data[2],
            day: data[3],
            hour: data[4].saturating_sub(TIME_OFFSET),
            minute: data[5].saturating_sub(TIME_OFFSET),
            second: data[6].saturating_sub(TIME_OFFSET),
        }
    }

    /// Convert to a chrono date-time, if the fields form a valid calendar instant
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, u32::from(self.month), u32::from(self.day))?
            .and_hms_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
            )
    }
}

impl Default for OracleDate {
    fn default() -> Self {
        Self::new(1, 1, 1, 0, 0, 0)
    }
}

impl fmt::Display for OracleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ISO 8601 pads the year digits, not the sign
        if self.year < 0 {
            f.write_str("-")?;
        }
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year.unsigned_abs(),
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second
        )
    }
}

impl From<NaiveDateTime> for OracleDate {
    /// Sub-second precision is dropped and the year is clamped
    fn from(dt: NaiveDateTime) -> Self {
        Self::new(
            dt.year().clamp(MIN_YEAR, MAX_YEAR),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
        )
    }
}

/// Decode an Oracle DATE from wire format bytes (7 bytes)
///
/// Returns `None` for the NULL date (all bytes zero).
pub fn decode_oracle_date(data: &[u8; LENGTH]) -> Option<OracleDate> {
    RawDate::from_bytes(*data).decode()
}

/// Encode an Oracle DATE to wire format (7 bytes)
///
/// `None` encodes as the NULL date.
pub fn encode_oracle_date(date: Option<&OracleDate>) -> [u8; LENGTH] {
    match date {
        Some(date) => date.to_oracle_bytes(),
        None => RawDate::NULL.0,
    }
}

/// Oracle DATE in its external 7-byte form, NULL included
///
/// Equality is byte-wise. Text and JSON forms use `YYYY-MM-DDThh:mm:ss`.
///
/// # Examples
///
/// ```rust
/// use oracle_codec::RawDate;
///
/// let date = RawDate::from_bytes([120, 107, 12, 19, 23, 36, 11]);
/// assert_eq!(date.to_string(), "2007-12-19T22:35:10");
/// assert!(RawDate::NULL.is_null());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RawDate([u8; LENGTH]);

impl RawDate {
    /// The NULL date
    pub const NULL: RawDate = RawDate([0; LENGTH]);

    /// Wrap external bytes
    pub fn from_bytes(bytes: [u8; LENGTH]) -> Self {
        Self(bytes)
    }

    /// Wrap external bytes from a slice of exactly 7 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; LENGTH] = bytes.try_into().map_err(|_| Error::InvalidLength {
            kind: "DATE",
            expected: "7",
            actual: bytes.len(),
        })?;
        Ok(Self(bytes))
    }

    /// Read 7 bytes from a buffer
    pub fn read_from(buf: &mut impl Buf) -> Result<Self> {
        if buf.remaining() < LENGTH {
            return Err(Error::InvalidLength {
                kind: "DATE",
                expected: "7",
                actual: buf.remaining(),
            });
        }
        let mut bytes = [0u8; LENGTH];
        buf.copy_to_slice(&mut bytes);
        Ok(Self(bytes))
    }

    /// Append the 7 external bytes to a buffer
    pub fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_slice(&self.0);
    }

    /// Get the external bytes
    pub fn as_bytes(&self) -> &[u8; LENGTH] {
        &self.0
    }

    /// Check if this is the NULL date
    pub fn is_null(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Decode the calendar fields; `None` for NULL
    pub fn decode(&self) -> Option<OracleDate> {
        if self.is_null() {
            None
        } else {
            Some(OracleDate::from_oracle_bytes(&self.0))
        }
    }

    /// Decode and annotate with the given time zone
    ///
    /// `None` for NULL and for fields that do not form a calendar instant.
    /// Local times that fall into a DST gap are read as UTC and converted.
    pub fn decode_in_zone<Tz: TimeZone>(&self, zone: &Tz) -> Option<DateTime<Tz>> {
        let naive = self.decode()?.to_naive_date_time()?;
        match zone.from_local_datetime(&naive) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => Some(zone.from_utc_datetime(&naive)),
        }
    }

    /// Decode and annotate with the process-local time zone
    pub fn decode_local(&self) -> Option<DateTime<Local>> {
        self.decode_in_zone(&Local)
    }

    /// Decode and annotate with the time zone chosen in the configuration
    pub fn decode_with_config(&self, config: &Config) -> Option<DateTime<FixedOffset>> {
        match config.time_zone {
            TimeZoneSetting::Local => self.decode_local().map(|dt| dt.fixed_offset()),
            TimeZoneSetting::Utc => self.decode_in_zone(&Utc).map(|dt| dt.fixed_offset()),
            TimeZoneSetting::Fixed(offset) => self.decode_in_zone(&offset),
        }
    }

    /// Serialize to JSON (`null` or the canonical string)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON
    ///
    /// Accepts `null`, `""`, or a quoted ISO date-time.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_format(json, e.to_string()))
    }

    /// Parse an ISO date-time: naive (`2007-12-19T22:35:10`, optional fraction)
    /// or RFC 3339 with an offset, whose wall-clock time is kept
    fn parse_iso(s: &str) -> Result<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(OracleDate::from(dt.naive_local()).into());
        }
        NaiveDateTime::from_str(s)
            .map(|dt| OracleDate::from(dt).into())
            .map_err(|e| Error::invalid_format(s, format!("not an ISO date-time: {}", e)))
    }
}

impl From<OracleDate> for RawDate {
    fn from(date: OracleDate) -> Self {
        Self(date.to_oracle_bytes())
    }
}

impl From<Option<OracleDate>> for RawDate {
    fn from(date: Option<OracleDate>) -> Self {
        Self(encode_oracle_date(date.as_ref()))
    }
}

impl From<NaiveDateTime> for RawDate {
    fn from(dt: NaiveDateTime) -> Self {
        OracleDate::from(dt).into()
    }
}

impl fmt::Display for RawDate {
    /// NULL prints as `0001-01-01T00:00:00`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.decode().unwrap_or_default(), f)
    }
}

impl fmt::Debug for RawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("RawDate");
        s.field("bytes", &hex::encode(self.0));
        match self.decode() {
            Some(date) => s.field("value", &date.to_string()),
            None => s.field("value", &"NULL"),
        };
        s.finish()
    }
}

impl FromStr for RawDate {
    type Err = Error;

    /// Parse the canonical text; the empty string is NULL
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(RawDate::NULL);
        }
        NaiveDateTime::parse_from_str(s, CANONICAL_FORMAT)
            .map(RawDate::from)
            .map_err(|e| Error::invalid_format(s, format!("expected YYYY-MM-DDThh:mm:ss: {}", e)))
    }
}

impl Serialize for RawDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.decode() {
            Some(date) => serializer.collect_str(&date),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for RawDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_option(RawDateVisitor)
    }
}

struct RawDateVisitor;

impl<'de> Visitor<'de> for RawDateVisitor {
    type Value = RawDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null, an empty string or an ISO date-time string")
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<RawDate, E> {
        Ok(RawDate::NULL)
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<RawDate, E> {
        Ok(RawDate::NULL)
    }

    fn visit_some<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> std::result::Result<RawDate, D::Error> {
        deserializer.deserialize_str(self)
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<RawDate, E> {
        if s.is_empty() {
            return Ok(RawDate::NULL);
        }
        RawDate::parse_iso(s).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_date() {
        // 2024-03-15 14:30:45
        let data = [
            120, // century: 20 + 100 = 120
            124, // year: 24 + 100 = 124
            3,   // month: 3
            15,  // day: 15
            15,  // hour: 14 + 1 = 15
            31,  // minute: 30 + 1 = 31
            46,  // second: 45 + 1 = 46
        ];

        let date = decode_oracle_date(&data).unwrap();
        assert_eq!(date.year, 2024);
        assert_eq!(date.month, 3);
        assert_eq!(date.day, 15);
        assert_eq!(date.hour, 14);
        assert_eq!(date.minute, 30);
        assert_eq!(date.second, 45);
    }

    #[test]
    fn test_date_roundtrip() {
        let original = OracleDate::new(1999, 12, 31, 23, 59, 59);
        let encoded = encode_oracle_date(Some(&original));
        assert_eq!(decode_oracle_date(&encoded), Some(original));
    }

    #[test]
    fn test_null_date() {
        assert_eq!(encode_oracle_date(None), [0; 7]);
        assert_eq!(decode_oracle_date(&[0; 7]), None);
        assert!(RawDate::default().is_null());
        assert_eq!(RawDate::NULL.to_string(), "0001-01-01T00:00:00");
    }

    #[test]
    fn test_negative_year() {
        // Year -100 (100 BC)
        let data = [
            99,  // century: -1 + 100 = 99
            100, // year: 0 + 100 = 100
            1, 1, 1, 1, 1,
        ];
        assert_eq!(decode_oracle_date(&data).unwrap().year, -100);

        // Truncating division keeps both year bytes below 100
        let date = OracleDate::date(-1, 1, 1);
        assert_eq!(&date.to_oracle_bytes()[..2], &[100, 99]);
        let date = OracleDate::date(-4712, 1, 1);
        assert_eq!(&date.to_oracle_bytes()[..2], &[53, 88]);
    }

    #[test]
    fn test_negative_year_text() {
        let date = OracleDate::date(-1, 1, 1);
        assert_eq!(date.to_string(), "-0001-01-01T00:00:00");
        let raw = RawDate::from(date);
        assert_eq!(raw.to_string().parse::<RawDate>().unwrap(), raw);

        let date = OracleDate::new(-4712, 1, 1, 12, 0, 0);
        assert_eq!(date.to_string(), "-4712-01-01T12:00:00");
        assert_eq!(OracleDate::date(7, 3, 4).to_string(), "0007-03-04T00:00:00");
    }

    #[test]
    fn test_year_clamped() {
        let too_late = OracleDate::new(12345, 6, 7, 8, 9, 10);
        let decoded = decode_oracle_date(&too_late.to_oracle_bytes()).unwrap();
        assert_eq!(decoded.year, MAX_YEAR);
        assert_eq!(decoded.second, 10);

        let too_early = OracleDate::date(-10000, 1, 1);
        let decoded = decode_oracle_date(&too_early.to_oracle_bytes()).unwrap();
        assert_eq!(decoded.year, MIN_YEAR);
    }

    #[test]
    fn test_malformed_decode_is_deterministic() {
        let data = [255, 1, 0, 0, 0, 0, 200];
        let first = OracleDate::from_oracle_bytes(&data);
        assert_eq!(first, OracleDate::from_oracle_bytes(&data));
        assert_eq!(first.hour, 0);
        assert_eq!(first.second, 199);
    }

    #[test]
    fn test_from_slice() {
        let date = RawDate::from_slice(&[120, 107, 12, 19, 23, 36, 11]).unwrap();
        assert_eq!(date.to_string(), "2007-12-19T22:35:10");
        assert!(RawDate::from_slice(&[120, 107]).is_err());
        assert!(RawDate::from_slice(&[1; 8]).is_err());
    }

    #[test]
    fn test_naive_date_time_conversion() {
        let naive = NaiveDate::from_ymd_opt(2007, 12, 19)
            .unwrap()
            .and_hms_milli_opt(22, 35, 10, 999)
            .unwrap();
        let date = OracleDate::from(naive);
        assert_eq!(date, OracleDate::new(2007, 12, 19, 22, 35, 10));
        assert_eq!(
            date.to_naive_date_time(),
            NaiveDate::from_ymd_opt(2007, 12, 19).unwrap().and_hms_opt(22, 35, 10)
        );
        assert_eq!(OracleDate::new(2007, 2, 30, 0, 0, 0).to_naive_date_time(), None);
    }

    #[test]
    fn test_decode_in_fixed_zone() {
        let date = RawDate::from_bytes([120, 107, 12, 19, 23, 36, 11]);
        let offset = FixedOffset::east_opt(3600).unwrap();
        let dt = date.decode_in_zone(&offset).unwrap();
        assert_eq!(dt.to_rfc3339(), "2007-12-19T22:35:10+01:00");
        assert!(RawDate::NULL.decode_in_zone(&offset).is_none());
    }

    #[test]
    fn test_decode_with_config() {
        let date = RawDate::from_bytes([120, 107, 12, 19, 23, 36, 11]);
        let config = Config::new().with_time_zone(TimeZoneSetting::Utc);
        let dt = date.decode_with_config(&config).unwrap();
        assert_eq!(dt.to_rfc3339(), "2007-12-19T22:35:10+00:00");

        // Local zone keeps the wall-clock fields whatever the zone is
        let local = date.decode_with_config(&Config::default()).unwrap();
        assert_eq!(local.naive_local().hour(), 22);
    }

    #[test]
    fn test_text_parse() {
        let date: RawDate = "2007-12-19T22:35:10".parse().unwrap();
        assert_eq!(date.as_bytes(), &[120, 107, 12, 19, 23, 36, 11]);
        assert!("".parse::<RawDate>().unwrap().is_null());
        assert!("2007-12-19 22:35:10".parse::<RawDate>().is_err());
        assert!("yesterday".parse::<RawDate>().is_err());
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", RawDate::from_bytes([120, 107, 12, 19, 23, 36, 11]));
        assert!(debug.contains("786b0c1317240b"), "{}", debug);
        assert!(format!("{:?}", RawDate::NULL).contains("NULL"));
    }

    #[test]
    fn test_buf_roundtrip() {
        let date = RawDate::from_bytes([120, 124, 3, 15, 15, 31, 46]);
        let mut out = bytes::BytesMut::new();
        date.write_to(&mut out);
        RawDate::NULL.write_to(&mut out);

        let mut input = out.freeze();
        assert_eq!(RawDate::read_from(&mut input).unwrap(), date);
        assert!(RawDate::read_from(&mut input).unwrap().is_null());
        assert!(RawDate::read_from(&mut input).is_err());
    }
}
