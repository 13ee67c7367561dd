//! Oracle data type encoding and decoding
//!
//! This module provides functions for encoding Rust values to Oracle's external
//! DATE and NUMBER formats and decoding those formats back to Rust values.

mod date;
mod decimal;
mod number;

pub use date::{decode_oracle_date, encode_oracle_date, OracleDate, RawDate};
pub use decimal::{parse_decimal, ParsedDecimal, Sign};
pub use number::{decode_oracle_number, encode_oracle_number, OracleNumber};
