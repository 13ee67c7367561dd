//! Oracle NUMBER encoding and decoding
//!
//! Oracle NUMBER is stored in a variable-length format:
//! - First byte: exponent (with sign encoding)
//! - Subsequent bytes: mantissa digits in base-100, most significant first
//!
//! For positive numbers: exponent byte has high bit set, mantissa bytes are value + 1
//! For negative numbers: exponent byte is inverted, mantissa bytes are 101 - value,
//!                       and a trailing 102 byte is added (if not at max digits)
//!
//! The value is `sign * sum(digit[i] * 100^(exponent - i))`. Zero is the single
//! byte 0x80 and has no other encoding.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::str::FromStr;

use bytes::{Buf, BufMut};

use super::decimal::{parse_decimal, ParsedDecimal};
use crate::constants::number::{
    EXPONENT_BIAS, EXPONENT_MASK, MAX_EXPONENT, MAX_LENGTH, MAX_MANTISSA_DIGITS, MIN_EXPONENT,
    NEGATIVE_DIGIT_BASE, NEGATIVE_TERMINATOR, POSITIVE_DIGIT_OFFSET, SIGN_BIT, ZERO,
};
use crate::error::{Error, Result};
use crate::pool::BufferPool;

/// Sign, base-100 exponent and normalized base-100 digits of a NUMBER
///
/// Normalized means no leading or trailing zero digits; zero has no digits.
#[derive(Debug, Clone, Copy)]
struct Mantissa {
    negative: bool,
    exponent: i64,
    digits: [u8; MAX_LENGTH],
    len: usize,
}

impl Mantissa {
    fn zero() -> Self {
        Self {
            negative: false,
            exponent: 0,
            digits: [0; MAX_LENGTH],
            len: 0,
        }
    }

    fn digits(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    fn is_zero(&self) -> bool {
        self.len == 0
    }

    /// Split external bytes into sign, exponent and digits
    ///
    /// Never fails: out-of-range mantissa bytes are reduced modulo 100 and
    /// stray zero digits are dropped.
    fn decode(data: &[u8]) -> Self {
        let mut mantissa = Self::zero();
        let Some((&exponent_byte, mut rest)) = data.split_first() else {
            return mantissa;
        };

        let negative = exponent_byte & SIGN_BIT == 0;
        let biased = if negative {
            !exponent_byte & EXPONENT_MASK
        } else {
            exponent_byte & EXPONENT_MASK
        };

        if negative {
            if let Some((&NEGATIVE_TERMINATOR, head)) = rest.split_last() {
                rest = head;
            }
        }

        mantissa.negative = negative;
        mantissa.exponent = i64::from(biased) - i64::from(EXPONENT_BIAS);

        for &byte in rest.iter().take(MAX_LENGTH) {
            let digit = if negative {
                NEGATIVE_DIGIT_BASE.wrapping_sub(byte)
            } else {
                byte.wrapping_sub(POSITIVE_DIGIT_OFFSET)
            } % 100;

            if mantissa.len == 0 && digit == 0 {
                mantissa.exponent -= 1;
                continue;
            }
            mantissa.digits[mantissa.len] = digit;
            mantissa.len += 1;
        }

        mantissa.trim_trailing_zeros();
        if mantissa.is_zero() {
            return Self::zero();
        }
        mantissa
    }

    /// Regroup a parsed decimal literal into base-100 digits
    ///
    /// Digit pairs are aligned at the decimal point: an odd-length integer
    /// part gets a leading zero, an odd-length tail gets a trailing zero.
    fn from_decimal(parsed: &ParsedDecimal<'_>, input: &str) -> Result<Self> {
        let integer = parsed.integer.trim_start_matches('0');
        let fraction = parsed.fraction.trim_end_matches('0');
        let mut mantissa = Self::zero();
        if integer.is_empty() && fraction.is_empty() {
            return Ok(mantissa);
        }

        let lead_pad = integer.len() % 2;
        let total = lead_pad + integer.len() + fraction.len();
        let mut stream = iter::repeat(0u8)
            .take(lead_pad)
            .chain(integer.bytes().map(|b| b - b'0'))
            .chain(fraction.bytes().map(|b| b - b'0'))
            .chain(iter::repeat(0u8).take(total % 2));

        mantissa.negative = parsed.sign.is_negative();
        mantissa.exponent = ((lead_pad + integer.len()) / 2) as i64 - 1;

        let mut significant = 0;
        while let Some(high) = stream.next() {
            let pair = high * 10 + stream.next().unwrap_or(0);

            if mantissa.len == 0 && pair == 0 {
                mantissa.exponent -= 1;
                continue;
            }
            if mantissa.len == MAX_MANTISSA_DIGITS {
                if pair != 0 {
                    return Err(Error::overflow(
                        input,
                        format!(
                            "more than {} base-100 digits ({} significant decimal digits)",
                            MAX_MANTISSA_DIGITS,
                            parsed.significant_digits()
                        ),
                    ));
                }
                continue;
            }

            mantissa.digits[mantissa.len] = pair;
            mantissa.len += 1;
            if pair != 0 {
                significant = mantissa.len;
            }
        }
        mantissa.len = significant;

        mantissa.check_exponent(input)?;
        Ok(mantissa)
    }

    fn from_integer(negative: bool, mut magnitude: u64) -> Self {
        let mut mantissa = Self::zero();
        if magnitude == 0 {
            return mantissa;
        }

        // u64::MAX has 10 base-100 digits
        let mut reversed = [0u8; 10];
        let mut count = 0;
        while magnitude > 0 {
            reversed[count] = (magnitude % 100) as u8;
            magnitude /= 100;
            count += 1;
        }

        mantissa.negative = negative;
        mantissa.exponent = count as i64 - 1;
        for (slot, &digit) in mantissa.digits.iter_mut().zip(reversed[..count].iter().rev()) {
            *slot = digit;
        }
        mantissa.len = count;
        mantissa.trim_trailing_zeros();
        mantissa
    }

    fn trim_trailing_zeros(&mut self) {
        while self.len > 0 && self.digits[self.len - 1] == 0 {
            self.len -= 1;
        }
    }

    fn check_exponent(&self, input: &str) -> Result<()> {
        let range = i64::from(MIN_EXPONENT)..=i64::from(MAX_EXPONENT);
        if self.is_zero() || range.contains(&self.exponent) {
            Ok(())
        } else {
            Err(Error::overflow(
                input,
                format!(
                    "base-100 exponent {} outside {}..={}",
                    self.exponent, MIN_EXPONENT, MAX_EXPONENT
                ),
            ))
        }
    }

    /// Build the external bytes; the exponent must already be in range
    fn to_number(&self) -> OracleNumber {
        if self.is_zero() {
            return OracleNumber::ZERO;
        }

        let mut data = [0u8; MAX_LENGTH];
        let biased = (self.exponent + i64::from(EXPONENT_BIAS)) as u8 & EXPONENT_MASK;
        data[0] = if self.negative {
            !(biased | SIGN_BIT)
        } else {
            biased | SIGN_BIT
        };

        let digits = self.digits();
        for (slot, &digit) in data[1..].iter_mut().zip(digits) {
            *slot = if self.negative {
                NEGATIVE_DIGIT_BASE - digit
            } else {
                digit + POSITIVE_DIGIT_OFFSET
            };
        }

        let mut len = 1 + digits.len();
        if self.negative && digits.len() < MAX_MANTISSA_DIGITS {
            data[len] = NEGATIVE_TERMINATOR;
            len += 1;
        }

        OracleNumber {
            data,
            len: len as u8,
        }
    }

    /// Append the canonical decimal text
    fn write_canonical(&self, out: &mut String) {
        let digits = self.digits();
        if digits.is_empty() {
            out.push('0');
            return;
        }

        if self.negative {
            out.push('-');
        }

        if self.exponent < 0 {
            out.push_str("0.");
            for _ in 0..(-self.exponent - 1) {
                out.push_str("00");
            }
            for &digit in digits {
                push_pair(out, digit);
            }
            trim_fraction_zeros(out);
            return;
        }

        let integer_pairs = self.exponent as usize + 1;
        for i in 0..integer_pairs {
            let digit = digits.get(i).copied().unwrap_or(0);
            if i == 0 && digit < 10 {
                out.push(char::from(b'0' + digit));
            } else {
                push_pair(out, digit);
            }
        }

        if digits.len() > integer_pairs {
            out.push('.');
            for &digit in &digits[integer_pairs..] {
                push_pair(out, digit);
            }
            trim_fraction_zeros(out);
        }
    }
}

fn push_pair(out: &mut String, digit: u8) {
    out.push(char::from(b'0' + digit / 10));
    out.push(char::from(b'0' + digit % 10));
}

/// The last base-100 digit is non-zero, so this stops inside the fraction
fn trim_fraction_zeros(out: &mut String) {
    while out.ends_with('0') {
        out.pop();
    }
}

/// Oracle NUMBER in its external byte form
///
/// Only the wire bytes are stored; the canonical text is produced on demand.
///
/// # Examples
///
/// ```rust
/// use oracle_codec::OracleNumber;
///
/// let num: OracleNumber = "-0.012".parse().unwrap();
/// assert_eq!(num.as_bytes(), &[63, 100, 81, 102]);
/// assert_eq!(num.to_string(), "-0.012");
/// ```
#[derive(Clone, Copy)]
pub struct OracleNumber {
    data: [u8; MAX_LENGTH],
    len: u8,
}

impl OracleNumber {
    /// The value zero (`[0x80]`)
    pub const ZERO: OracleNumber = OracleNumber {
        data: {
            let mut data = [0u8; MAX_LENGTH];
            data[0] = ZERO;
            data
        },
        len: 1,
    };

    /// Wrap external bytes (1 to 22 of them)
    ///
    /// The content is not validated; malformed buffers print deterministically.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() || bytes.len() > MAX_LENGTH {
            return Err(Error::InvalidLength {
                kind: "NUMBER",
                expected: "1 to 22",
                actual: bytes.len(),
            });
        }

        let mut data = [0u8; MAX_LENGTH];
        data[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            data,
            len: bytes.len() as u8,
        })
    }

    /// Encode a decimal literal
    ///
    /// Fails with `InvalidFormat` when the text is not a plain decimal literal
    /// and with `Overflow` when it needs more than 20 base-100 digits or an
    /// exponent the format cannot carry.
    pub fn parse(value: &str) -> Result<Self> {
        let parsed = parse_decimal(value)?;
        Ok(Mantissa::from_decimal(&parsed, value)?.to_number())
    }

    /// Read `len` bytes from a buffer
    pub fn read_from(buf: &mut impl Buf, len: usize) -> Result<Self> {
        if buf.remaining() < len {
            return Err(Error::InvalidLength {
                kind: "NUMBER",
                expected: "at least the declared",
                actual: buf.remaining(),
            });
        }

        let mut data = [0u8; MAX_LENGTH];
        let bytes = data.get_mut(..len).ok_or(Error::InvalidLength {
            kind: "NUMBER",
            expected: "1 to 22",
            actual: len,
        })?;
        buf.copy_to_slice(bytes);
        Self::from_bytes(&data[..len])
    }

    /// Append the external bytes to a buffer
    pub fn write_to(&self, buf: &mut impl BufMut) {
        buf.put_slice(self.as_bytes());
    }

    /// Get the external bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Check if this is zero
    pub fn is_zero(&self) -> bool {
        Mantissa::decode(self.as_bytes()).is_zero()
    }

    /// Check if this is a negative value
    pub fn is_negative(&self) -> bool {
        let mantissa = Mantissa::decode(self.as_bytes());
        mantissa.negative && !mantissa.is_zero()
    }

    /// Check if the value has no fractional part
    pub fn is_integer(&self) -> bool {
        let mantissa = Mantissa::decode(self.as_bytes());
        mantissa.is_zero()
            || (mantissa.exponent >= 0 && (mantissa.len as i64) <= mantissa.exponent + 1)
    }

    /// Same magnitude, opposite sign (zero stays zero)
    pub fn negate(&self) -> Self {
        let mut mantissa = Mantissa::decode(self.as_bytes());
        if mantissa.is_zero() {
            return Self::ZERO;
        }
        mantissa.negative = !mantissa.negative;
        mantissa.to_number()
    }

    /// Write the canonical text into a caller-owned buffer
    ///
    /// The buffer is cleared first; the returned view borrows it.
    pub fn format_into<'a>(&self, buf: &'a mut String) -> &'a str {
        buf.clear();
        Mantissa::decode(self.as_bytes()).write_canonical(buf);
        buf.as_str()
    }

    /// Run `f` on the canonical text, printed into a buffer from `pool`
    pub fn print_with<R>(&self, pool: &BufferPool, f: impl FnOnce(&str) -> R) -> R {
        pool.with_scratch(|buf| f(self.format_into(buf)))
    }

    /// Try to convert to i64
    pub fn to_i64(&self) -> Result<i64> {
        let mantissa = Mantissa::decode(self.as_bytes());
        if mantissa.is_zero() {
            return Ok(0);
        }
        if !self.is_integer() {
            return Err(Error::invalid_format(
                self.to_string(),
                "value has a fractional part",
            ));
        }

        let out_of_range = || Error::overflow(self.to_string(), "value does not fit in i64");
        let mut magnitude: i128 = 0;
        for i in 0..=mantissa.exponent as usize {
            let digit = mantissa.digits().get(i).copied().unwrap_or(0);
            magnitude = magnitude
                .checked_mul(100)
                .and_then(|m| m.checked_add(i128::from(digit)))
                .ok_or_else(out_of_range)?;
        }

        let value = if mantissa.negative {
            -magnitude
        } else {
            magnitude
        };
        i64::try_from(value).map_err(|_| out_of_range())
    }

    /// Try to convert to f64
    pub fn to_f64(&self) -> Result<f64> {
        self.print_with(BufferPool::global(), |text| {
            text.parse::<f64>()
                .map_err(|e| Error::invalid_format(text, format!("cannot parse as f64: {}", e)))
        })
    }
}

impl Default for OracleNumber {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for OracleNumber {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for OracleNumber {}

impl Hash for OracleNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for OracleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_with(BufferPool::global(), |text| f.write_str(text))
    }
}

impl fmt::Debug for OracleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OracleNumber")
            .field("bytes", &hex::encode(self.as_bytes()))
            .field("value", &self.to_string())
            .finish()
    }
}

impl FromStr for OracleNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<i64> for OracleNumber {
    fn from(value: i64) -> Self {
        Mantissa::from_integer(value < 0, value.unsigned_abs()).to_number()
    }
}

impl From<u64> for OracleNumber {
    fn from(value: u64) -> Self {
        Mantissa::from_integer(false, value).to_number()
    }
}

impl From<i32> for OracleNumber {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<u32> for OracleNumber {
    fn from(value: u32) -> Self {
        Self::from(u64::from(value))
    }
}

impl TryFrom<f64> for OracleNumber {
    type Error = Error;

    /// Encode the shortest decimal text that round-trips the float
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::invalid_format(
                value.to_string(),
                "only finite values can be encoded",
            ));
        }
        Self::parse(&value.to_string())
    }
}

/// Decode an Oracle NUMBER from wire format bytes into its canonical text
pub fn decode_oracle_number(data: &[u8]) -> Result<String> {
    Ok(OracleNumber::from_bytes(data)?.to_string())
}

/// Encode a decimal literal to Oracle NUMBER wire format
pub fn encode_oracle_number(value: &str) -> Result<Vec<u8>> {
    Ok(OracleNumber::parse(value)?.as_bytes().to_vec())
}
