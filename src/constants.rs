//! Oracle external format constants
//!
//! Byte layouts and biases of the DATE and NUMBER storage formats, as
//! documented for the OCI external datatypes (SQLT_DAT and SQLT_NUM).

// =============================================================================
// DATE Layout
// =============================================================================

/// Oracle DATE external format (7 bytes)
pub mod date {
    /// Length of an encoded DATE
    pub const LENGTH: usize = 7;
    /// Bias added to the century and the year within the century
    pub const CENTURY_OFFSET: i32 = 100;
    /// Bias added to hour, minute and second
    pub const TIME_OFFSET: u8 = 1;
    /// Earliest year the format carries (4712 BC)
    pub const MIN_YEAR: i32 = -4712;
    /// Latest year the format carries
    pub const MAX_YEAR: i32 = 9999;
}

// =============================================================================
// NUMBER Layout
// =============================================================================

/// Oracle NUMBER external format (1 to 22 bytes)
pub mod number {
    /// Maximum encoded length: exponent, 20 mantissa bytes and the terminator
    pub const MAX_LENGTH: usize = 22;
    /// Maximum number of base-100 mantissa digits
    pub const MAX_MANTISSA_DIGITS: usize = 20;
    /// Sign bit of the exponent byte (set for positive values)
    pub const SIGN_BIT: u8 = 0x80;
    /// Mask for the biased exponent bits
    pub const EXPONENT_MASK: u8 = 0x7F;
    /// Bias of the base-100 exponent
    pub const EXPONENT_BIAS: i32 = 65;
    /// Smallest base-100 exponent the exponent byte can carry
    pub const MIN_EXPONENT: i32 = -EXPONENT_BIAS;
    /// Largest base-100 exponent the exponent byte can carry
    pub const MAX_EXPONENT: i32 = EXPONENT_MASK as i32 - EXPONENT_BIAS;
    /// The only encoding of zero
    pub const ZERO: u8 = 0x80;
    /// Trailing byte of negative values with fewer than 20 mantissa digits
    pub const NEGATIVE_TERMINATOR: u8 = 102;
    /// Positive mantissa bytes store `digit + POSITIVE_DIGIT_OFFSET`
    pub const POSITIVE_DIGIT_OFFSET: u8 = 1;
    /// Negative mantissa bytes store `NEGATIVE_DIGIT_BASE - digit`
    pub const NEGATIVE_DIGIT_BASE: u8 = 101;
    /// Longest canonical text: sign, "0.", 64 zero pairs and 20 digit pairs
    pub const MAX_TEXT_LENGTH: usize = 1 + 2 + 2 * 64 + 2 * MAX_MANTISSA_DIGITS;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_range() {
        assert_eq!(number::MIN_EXPONENT, -65);
        assert_eq!(number::MAX_EXPONENT, 62);
    }

    #[test]
    fn test_year_range_encodes_non_zero() {
        // Century byte of the earliest year must stay above zero
        assert!(date::MIN_YEAR / 100 + date::CENTURY_OFFSET > 0);
        assert!(date::MIN_YEAR % 100 + date::CENTURY_OFFSET > 0);
        assert!(date::MAX_YEAR / 100 + date::CENTURY_OFFSET <= u8::MAX as i32);
    }
}
