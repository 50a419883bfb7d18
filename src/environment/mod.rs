//! # Probe configuration & variables
//!
//! Holds where the probe points (base URL, per-request timeout) and the
//! `{{variable}}` bindings that chained scenarios capture from one response
//! and feed into later requests.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;

use crate::http::client::default_timeout;

/// Base URL used when neither the CLI nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Target service and request limits.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Flat `key -> value` bindings resolved into endpoint templates.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, String>,
}

impl Variables {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Copy a top-level field of a JSON response into `key`.
    ///
    /// Strings are stored verbatim, other scalars by their JSON text. Missing
    /// or null fields leave the binding untouched and return `None`.
    pub fn capture(&mut self, key: &str, response: &Value, field: &str) -> Option<String> {
        let value = match response.get(field)? {
            Value::Null => return None,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.set(key, value.clone());
        Some(value)
    }

    /// Interpolate `{{variable}}` placeholders in the given text.
    ///
    /// Single left-to-right pass: substituted values are not rescanned, and
    /// unknown placeholders are kept as written.
    pub fn interpolate(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{{") {
            result.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                rest = &rest[start..];
                break;
            };
            let key = &after_open[..end];
            match self.values.get(key) {
                Some(value) => result.push_str(value),
                None => {
                    result.push_str("{{");
                    result.push_str(key);
                    result.push_str("}}");
                }
            }
            rest = &after_open[end + 2..];
        }
        result.push_str(rest);
        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn default_config_uses_ten_second_timeout() {
        let config = ProbeConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn interpolate_replaces_placeholders() {
        let mut vars = Variables::default();
        vars.set("patient_id", "test_patient_001");

        let result = vars.interpolate("patients/{{patient_id}}/directives");
        assert_eq!(result, "patients/test_patient_001/directives");
    }

    #[test]
    fn interpolate_leaves_unknown_placeholders() {
        let vars = Variables::default();
        assert_eq!(vars.interpolate("{{unknown}}"), "{{unknown}}");
    }

    #[test]
    fn interpolate_does_not_rescan_substituted_values() {
        let mut vars = Variables::default();
        vars.set("a", "{{b}}");
        vars.set("b", "X");

        for _ in 0..50 {
            assert_eq!(vars.interpolate("{{a}}/{{b}}"), "{{b}}/X");
        }
    }

    #[test]
    fn interpolate_keeps_unterminated_placeholder() {
        let mut vars = Variables::default();
        vars.set("id", "7");
        assert_eq!(vars.interpolate("p/{{id}}/x{{id"), "p/7/x{{id");
    }

    #[test]
    fn capture_stores_string_and_scalar_fields() {
        let mut vars = Variables::default();
        let body = json!({ "directive_id": "abc", "total_actions": 3, "gone": null });

        assert_eq!(vars.capture("directive_id", &body, "directive_id").as_deref(), Some("abc"));
        assert_eq!(vars.capture("count", &body, "total_actions").as_deref(), Some("3"));
        assert_eq!(vars.get("directive_id"), Some("abc"));
        assert_eq!(vars.get("count"), Some("3"));
    }

    #[test]
    fn capture_ignores_missing_and_null_fields() {
        let mut vars = Variables::default();
        vars.set("directive_id", "old");

        assert!(vars.capture("directive_id", &json!({}), "directive_id").is_none());
        assert!(vars.capture("directive_id", &json!({ "directive_id": null }), "directive_id").is_none());
        assert_eq!(vars.get("directive_id"), Some("old"));
    }
}
