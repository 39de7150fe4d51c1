//! Number parsing and formatting helpers for numeric cell values.
//!
//! Values are kept as strings in the model. These helpers decide whether a
//! string is a number, render it with a fixed number of decimals and count
//! the trailing zeros that a column can drop without losing precision.

use std::cmp::Ordering;

/// Parses a finite decimal number, ignoring surrounding whitespace.
pub fn parse_double(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
}

/// Returns true if `value` parses as a finite number.
pub fn is_double_value(value: &str) -> bool {
    parse_double(value).is_some()
}

/// Returns true if `value` is a plain 32-bit integer literal.
pub fn is_integer_value(value: &str) -> bool {
    !value.is_empty() && value.parse::<i32>().is_ok()
}

/// Rounds half up to `decimals` digits.
///
/// The value is returned unchanged when scaling overflows, which keeps the
/// unbounded sentinels `f64::MAX` and `-f64::MAX` intact.
pub fn round_double(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as u32) as i32);
    let scaled = (value * factor + 0.5).floor();
    let rounded = scaled / factor;
    if scaled.is_finite() && rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Formats a number with exactly `decimals` digits after the decimal point.
pub fn format_double(value: f64, decimals: u32) -> String {
    if decimals > 0 && value == 0.0 {
        return format!("0.{}", "0".repeat(decimals as usize));
    }
    format!("{:.*}", decimals as usize, value)
}

/// Formats a number representation with exactly `decimals` digits.
///
/// Empty input and strings that are not numbers are returned unchanged.
pub fn format_double_str(value: &str, decimals: u32) -> String {
    if value.is_empty() {
        return String::new();
    }
    if decimals > 0 && value.trim() == "0" {
        return format!("0.{}", "0".repeat(decimals as usize));
    }
    match parse_double(value) {
        Some(parsed) => format!("{:.*}", decimals as usize, parsed),
        None => value.to_string(),
    }
}

/// Checks a numeric representation character by character.
///
/// A leading minus sign, at most one decimal point (only when `decimals` is
/// positive) and digits are accepted; anything else, including exponents and
/// whitespace, is rejected. The number must carry at most `decimals` digits
/// after the point and lie within `[minimum, maximum]`.
pub fn check_double_representation(value: &str, minimum: f64, maximum: f64, decimals: u32) -> bool {
    if value.is_empty() || minimum > maximum {
        return false;
    }
    let mut buffer = String::with_capacity(value.len());
    let mut decimal_point_seen = false;
    let mut decimal_digits = 0u32;
    for character in value.chars() {
        if buffer.is_empty() && character == '-' {
            buffer.push(character);
        } else if character == '.' && !decimal_point_seen && decimals > 0 {
            decimal_point_seen = true;
            buffer.push(character);
        } else if character.is_ascii_digit() {
            buffer.push(character);
            if decimal_point_seen {
                decimal_digits += 1;
            }
        } else {
            return false;
        }
    }
    if decimal_digits > decimals {
        return false;
    }
    match parse_double(&buffer) {
        Some(parsed) => parsed >= minimum && parsed <= maximum,
        None => false,
    }
}

/// Number of trailing zeros after the decimal point, including the point
/// itself when every decimal digit is zero.
///
/// `"1.500"` has 2, `"2.000"` has 4 and `"12"` has none.
pub fn pending_zero_count(value: &str) -> usize {
    if !value.contains('.') {
        return 0;
    }
    let mut count = 0;
    for character in value.chars().rev() {
        match character {
            '0' => count += 1,
            '.' => {
                count += 1;
                break;
            }
            _ => break,
        }
    }
    count
}

/// Sorts texts numerically if every entry is an integer, else lexically.
pub fn sort_texts(texts: &mut [String]) {
    if !texts.is_empty() && texts.iter().all(|text| is_integer_value(text)) {
        texts.sort_by(|left, right| compare_integer_texts(left, right));
    } else {
        texts.sort();
    }
}

fn compare_integer_texts(left: &str, right: &str) -> Ordering {
    match (left.parse::<i32>(), right.parse::<i32>()) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        _ => left.cmp(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_fixed_decimals() {
        assert_eq!(format_double_str("1.5", 3), "1.500");
        assert_eq!(format_double_str("0", 2), "0.00");
        assert_eq!(format_double_str("-2", 1), "-2.0");
        assert_eq!(format_double_str("7.6", 0), "8");
        assert_eq!(format_double_str("abc", 2), "abc");
        assert_eq!(format_double_str("", 2), "");
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_double(1.005, 1), 1.0);
        assert_eq!(round_double(2.45, 1), 2.5);
        assert_eq!(round_double(f64::MAX, 3), f64::MAX);
        assert_eq!(round_double(-f64::MAX, 3), -f64::MAX);
    }

    #[test]
    fn double_representation_is_checked_per_character() {
        assert!(check_double_representation("-12.25", -100.0, 100.0, 2));
        assert!(!check_double_representation("12.255", -100.0, 100.0, 2));
        assert!(!check_double_representation("1e5", f64::MIN, f64::MAX, 2));
        assert!(!check_double_representation("1.2.3", f64::MIN, f64::MAX, 2));
        assert!(!check_double_representation("1.5", f64::MIN, f64::MAX, 0));
        assert!(!check_double_representation("5-", f64::MIN, f64::MAX, 0));
        assert!(!check_double_representation("101", -100.0, 100.0, 0));
        assert!(!check_double_representation("-", -100.0, 100.0, 0));
    }

    #[test]
    fn pending_zeros_include_decimal_point() {
        assert_eq!(pending_zero_count("1.500"), 2);
        assert_eq!(pending_zero_count("2.000"), 4);
        assert_eq!(pending_zero_count("2.75"), 0);
        assert_eq!(pending_zero_count("100"), 0);
    }

    #[test]
    fn integer_texts_sort_numerically() {
        let mut texts = vec!["10".to_string(), "2".to_string(), "1".to_string()];
        sort_texts(&mut texts);
        assert_eq!(texts, ["1", "2", "10"]);

        let mut mixed = vec!["b".to_string(), "10".to_string(), "a".to_string()];
        sort_texts(&mut mixed);
        assert_eq!(mixed, ["10", "a", "b"]);
    }
}
