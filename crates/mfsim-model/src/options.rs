//! Configuration options for the value item model.

use serde::{Deserialize, Serialize};

use crate::definitions::{DEFAULT_MAX_NOTIFICATION_DEPTH, DEFAULT_MAX_UPDATE_DEPTH};

/// Limits applied by value items and containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Nested change notifications deeper than this are dropped.
    pub max_notification_depth: usize,

    /// Nested dependency updates deeper than this are dropped.
    pub max_update_depth: usize,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            max_notification_depth: DEFAULT_MAX_NOTIFICATION_DEPTH,
            max_update_depth: DEFAULT_MAX_UPDATE_DEPTH,
        }
    }
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_notification_depth(mut self, depth: usize) -> Self {
        self.max_notification_depth = depth;
        self
    }

    pub fn with_max_update_depth(mut self, depth: usize) -> Self {
        self.max_update_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let options: ModelOptions = serde_json::from_str(r#"{"max_update_depth": 2}"#).unwrap();
        assert_eq!(options.max_update_depth, 2);
        assert_eq!(options.max_notification_depth, DEFAULT_MAX_NOTIFICATION_DEPTH);
    }

    #[test]
    fn builders_override_limits() {
        let options = ModelOptions::new().with_max_notification_depth(4).with_max_update_depth(1);
        assert_eq!(options, ModelOptions { max_notification_depth: 4, max_update_depth: 1 });
    }
}
