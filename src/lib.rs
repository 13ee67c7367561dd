#![warn(missing_docs)]

//! # oracle-codec
//!
//! Byte-exact codecs for the Oracle DATE and NUMBER external formats, as
//! exchanged through the Oracle Call Interface.
//!
//! Both codecs are pure functions over byte buffers: no connection, no global
//! state apart from an optional pool of print buffers.
//!
//! ## DATE
//!
//! A fixed 7-byte layout. The all-zero buffer is NULL.
//!
//! ```rust
//! use oracle_codec::{OracleDate, RawDate};
//!
//! let date = OracleDate::new(2007, 12, 19, 22, 35, 10);
//! let raw = RawDate::from(date);
//! assert_eq!(raw.as_bytes(), &[120, 107, 12, 19, 23, 36, 11]);
//! assert_eq!(raw.to_string(), "2007-12-19T22:35:10");
//! assert_eq!(raw.decode(), Some(date));
//!
//! assert_eq!(RawDate::NULL.to_json().unwrap(), "null");
//! ```
//!
//! ## NUMBER
//!
//! A variable-length (1 to 22 byte) base-100 format with a signed, biased
//! exponent byte. Text goes in and out in canonical decimal form.
//!
//! ```rust
//! use oracle_codec::{decode_oracle_number, encode_oracle_number, OracleNumber};
//!
//! # fn main() -> oracle_codec::Result<()> {
//! assert_eq!(encode_oracle_number("123")?, vec![194, 2, 24]);
//! assert_eq!(decode_oracle_number(&[62, 100, 102])?, "-1");
//!
//! let num: OracleNumber = "00.0120".parse()?;
//! assert_eq!(num.to_string(), "0.012");
//!
//! // Print into a buffer the caller owns
//! let mut scratch = String::new();
//! assert_eq!(num.format_into(&mut scratch), "0.012");
//! # Ok(())
//! # }
//! ```
//!
//! ## Data Types
//!
//! | Oracle Type | Rust Type |
//! |-------------|-----------|
//! | NUMBER | [`OracleNumber`], `String`, `i32`, `i64`, `u32`, `u64`, `f64` |
//! | DATE | [`RawDate`], [`OracleDate`], `chrono::NaiveDateTime`, `chrono::DateTime<Tz>` |

pub mod config;
pub mod constants;
pub mod error;
pub mod pool;
pub mod types;

// Re-export commonly used types
pub use config::{Config, TimeZoneSetting};
pub use error::{Error, Result};
pub use pool::BufferPool;
pub use types::{
    decode_oracle_date, decode_oracle_number, encode_oracle_date, encode_oracle_number,
    parse_decimal, OracleDate, OracleNumber, ParsedDecimal, RawDate, Sign,
};
