//! Integration tests for the strict decimal grammar

use oracle_codec::{parse_decimal, Sign};
use proptest::prelude::*;

#[test]
fn test_accepts_grammar() {
    let cases = [
        ("0", Sign::Positive, "0", ""),
        ("+0", Sign::Positive, "0", ""),
        ("-12.50", Sign::Negative, "12", "50"),
        ("007.007", Sign::Positive, "007", "007"),
        ("123456789012345678901234567890", Sign::Positive, "123456789012345678901234567890", ""),
    ];
    for (input, sign, integer, fraction) in cases {
        let parsed = parse_decimal(input).unwrap();
        assert_eq!(parsed.sign, sign, "{}", input);
        assert_eq!(parsed.integer, integer, "{}", input);
        assert_eq!(parsed.fraction, fraction, "{}", input);
    }
}

#[test]
fn test_rejects_outside_grammar() {
    let cases = [
        "", "+", "-", ".", "1.", ".1", "+-1", "1-", "1.2.3", "1e3", "1E3", "0x1F", "\t1", "1\n",
        "1 000", "1,5", "١٢٣", "NaN", "inf",
    ];
    for input in cases {
        assert!(
            parse_decimal(input).unwrap_err().is_invalid_format(),
            "{:?} should be rejected",
            input
        );
    }
}

proptest! {
    #[test]
    fn prop_accepts_every_literal(s in "[+-]?[0-9]{1,40}(\\.[0-9]{1,40})?") {
        let parsed = parse_decimal(&s).unwrap();
        let mut rebuilt = String::new();
        if s.starts_with('+') {
            rebuilt.push('+');
        }
        if parsed.sign == Sign::Negative {
            rebuilt.push('-');
        }
        rebuilt.push_str(parsed.integer);
        if !parsed.fraction.is_empty() {
            rebuilt.push('.');
            rebuilt.push_str(parsed.fraction);
        }
        prop_assert_eq!(rebuilt, s);
    }

    #[test]
    fn prop_never_panics(s in "\\PC{0,24}") {
        let _ = parse_decimal(&s);
    }
}
