//! Cell coercion between CSV text and typed values.
//!
//! Numeric cells follow the loose numeric cast of the tool that produced
//! these files: surrounding whitespace is ignored, an empty cell is `0`,
//! `0x`/`0o`/`0b` prefixes and `Infinity` are accepted, and anything else
//! that is not a plain decimal number becomes NaN. Boolean cells are cast to
//! a number first and are true when that number is nonzero, so `"true"` reads
//! as false.

/// Text written for a NaN number and read back as NaN.
pub const NAN_SENTINEL: &str = "None";

/// Casts a cell to a number.
pub fn to_number(raw: &str) -> f64 {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_prefixed(trimmed) {
        return value;
    }

    let is_decimal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        && trimmed.chars().any(|c| c.is_ascii_digit());
    if !is_decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Casts a cell to a flag: nonzero numbers are true, zero and NaN false.
pub fn to_bool(raw: &str) -> bool {
    let number = to_number(raw);
    number != 0.0 && !number.is_nan()
}

/// Formats a number for CSV output.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        NAN_SENTINEL.to_string()
    } else if value.is_infinite() {
        if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if value == 0.0 {
        // Avoids "-0".
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Formats a flag for CSV output.
pub fn format_bool(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

fn parse_prefixed(value: &str) -> Option<f64> {
    let mut chars = value.chars();
    if chars.next() != Some('0') {
        return None;
    }
    let radix = match chars.next() {
        Some('x' | 'X') => 16,
        Some('o' | 'O') => 8,
        Some('b' | 'B') => 2,
        _ => return None,
    };
    let digits = chars.as_str();
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let parsed = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(parsed.unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_coercion_table() {
        assert!(!to_bool("0"));
        assert!(to_bool("1"));
        assert!(!to_bool(""));
        assert!(to_bool("2"));
        assert!(to_bool("-1"));
        assert!(to_bool(" 1 "));
        assert!(!to_bool("0.0"));
        assert!(!to_bool("true"));
        assert!(!to_bool("false"));
        assert!(!to_bool("yes"));
        assert!(to_bool("0x1"));
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(to_number("42"), 42.0);
        assert_eq!(to_number(" 4.5 "), 4.5);
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("1e3"), 1000.0);
        assert_eq!(to_number(".5"), 0.5);
        assert_eq!(to_number("-3"), -3.0);
        assert_eq!(to_number("0x1F"), 31.0);
        assert_eq!(to_number("0b101"), 5.0);
        assert_eq!(to_number("Infinity"), f64::INFINITY);
        assert!(to_number("None").is_nan());
        assert!(to_number("abc").is_nan());
        assert!(to_number("inf").is_nan());
        assert!(to_number("NaN").is_nan());
        assert!(to_number("1,000").is_nan());
        assert!(to_number("0x").is_nan());
        assert!(to_number("0xZZ").is_nan());
        assert!(to_number("-").is_nan());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(f64::NAN), "None");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_format_number_round_trips() {
        for value in [0.1, 123.456, -7.25, 1e21, 3.0e-7, f64::MAX] {
            assert_eq!(to_number(&format_number(value)), value);
        }
    }

    #[test]
    fn test_format_bool() {
        assert_eq!(format_bool(true), "1");
        assert_eq!(format_bool(false), "0");
    }
}
