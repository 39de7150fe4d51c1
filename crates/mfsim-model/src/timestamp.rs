//! Standard timestamps (`yyyy/MM/dd - HH:mm:ss`).

use std::sync::OnceLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;

use crate::definitions::STANDARD_TIMESTAMP_FORMAT;

static STANDARD_TIMESTAMP_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn matches_standard_layout(value: &str) -> bool {
    STANDARD_TIMESTAMP_REGEX
        .get_or_init(|| {
            Regex::new(
                r"^[2][0][0-9][0-9]/[01][0-9]/[0123][0-9] - [012][0-9]:[0-5][0-9]:[0-5][0-9]$",
            )
            .ok()
        })
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

/// Returns true if `value` is a real calendar instant in standard layout.
pub fn is_valid_standard_timestamp(value: &str) -> bool {
    !value.is_empty()
        && matches_standard_layout(value)
        && NaiveDateTime::parse_from_str(value, STANDARD_TIMESTAMP_FORMAT).is_ok()
}

/// Current local time in standard layout.
pub fn current_standard_timestamp() -> String {
    Local::now().format(STANDARD_TIMESTAMP_FORMAT).to_string()
}

/// Appends the creation timestamp to a name: `"name (2024/03/15 - 12:30:00)"`.
pub fn append_creation_timestamp(name: &str) -> String {
    format!("{name} ({})", current_standard_timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_real_instants_only() {
        assert!(is_valid_standard_timestamp("2024/03/15 - 12:30:00"));
        assert!(!is_valid_standard_timestamp("2024/02/30 - 12:30:00"));
        assert!(!is_valid_standard_timestamp("2024-03-15 12:30:00"));
        assert!(!is_valid_standard_timestamp("1999/03/15 - 12:30:00"));
        assert!(!is_valid_standard_timestamp(""));
    }

    #[test]
    fn creation_suffix_is_a_valid_timestamp() {
        let name = append_creation_timestamp("Schema");
        let stamp = name
            .strip_prefix("Schema (")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap();
        assert!(is_valid_standard_timestamp(stamp));
    }
}
