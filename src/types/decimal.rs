//! Strict decimal literal parsing
//!
//! Accepts `sign? digit+ ('.' digit+)?` and nothing else: no whitespace, no
//! exponent suffix, no grouping separators. The result borrows the integer
//! and fractional digit runs from the input; regrouping into base-100 digits
//! is left to the NUMBER encoder.

use crate::error::{Error, Result};

/// Sign of a parsed decimal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    /// No sign or `+`
    #[default]
    Positive,
    /// `-`
    Negative,
}

impl Sign {
    /// Check if this is the negative sign
    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }
}

/// A decimal literal split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDecimal<'a> {
    /// Sign of the literal
    pub sign: Sign,
    /// Digits before the decimal point (never empty)
    pub integer: &'a str,
    /// Digits after the decimal point (empty when there is no point)
    pub fraction: &'a str,
}

impl<'a> ParsedDecimal<'a> {
    /// Check if every digit is zero
    pub fn is_zero(&self) -> bool {
        self.integer.bytes().all(|b| b == b'0') && self.fraction.bytes().all(|b| b == b'0')
    }

    /// Number of significant decimal digits, ignoring leading and trailing zeros
    pub fn significant_digits(&self) -> usize {
        let integer = self.integer.trim_start_matches('0');
        let fraction = self.fraction.trim_end_matches('0');
        if integer.is_empty() {
            fraction.trim_start_matches('0').len()
        } else if fraction.is_empty() {
            integer.trim_end_matches('0').len()
        } else {
            integer.len() + fraction.len()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Sign,
    Integer,
    Point(usize),
    Fraction(usize),
}

/// Parse a strict decimal literal
pub fn parse_decimal(input: &str) -> Result<ParsedDecimal<'_>> {
    let bytes = input.as_bytes();
    let mut state = State::Start;
    let mut sign = Sign::Positive;
    let mut integer_start = 0;

    for (pos, &b) in bytes.iter().enumerate() {
        state = match (state, b) {
            (State::Start, b'+') => {
                integer_start = pos + 1;
                State::Sign
            }
            (State::Start, b'-') => {
                sign = Sign::Negative;
                integer_start = pos + 1;
                State::Sign
            }
            (State::Start | State::Sign | State::Integer, b'0'..=b'9') => State::Integer,
            (State::Integer, b'.') => State::Point(pos),
            (State::Point(point) | State::Fraction(point), b'0'..=b'9') => State::Fraction(point),
            _ => {
                // Everything before `pos` was ASCII, so it is a char boundary
                let found = input[pos..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(Error::invalid_format(
                    input,
                    format!("unexpected character {:?} at offset {}", found, pos),
                ));
            }
        };
    }

    match state {
        State::Integer => Ok(ParsedDecimal {
            sign,
            integer: &input[integer_start..],
            fraction: "",
        }),
        State::Fraction(point) => Ok(ParsedDecimal {
            sign,
            integer: &input[integer_start..point],
            fraction: &input[point + 1..],
        }),
        State::Start => Err(Error::invalid_format(input, "empty input")),
        State::Sign => Err(Error::invalid_format(input, "sign without digits")),
        State::Point(_) => Err(Error::invalid_format(
            input,
            "decimal point without fractional digits",
        )),
    }
}
