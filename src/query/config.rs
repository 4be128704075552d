//! Processor configuration.

use serde::{Deserialize, Serialize};

/// Settings for [`ExpressionProcessor`](crate::query::ExpressionProcessor).
///
/// Date patterns use chrono's `strftime` syntax. A date string must match one
/// of them exactly, including zero padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Pattern for a date without a time of day (midnight local time is assumed)
    pub date_format: String,
    /// Pattern for a local date and time
    pub date_time_format: String,
}

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_time_format: DEFAULT_DATE_TIME_FORMAT.to_string(),
        }
    }
}

impl ProcessorConfig {
    pub fn with_date_formats(
        date_format: impl Into<String>,
        date_time_format: impl Into<String>,
    ) -> Self {
        Self {
            date_format: date_format.into(),
            date_time_format: date_time_format.into(),
        }
    }
}

/// Render a strftime pattern the way users write dates, e.g. `YYYY-MM-DD`
pub fn describe_format(pattern: &str) -> String {
    let mut described = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            described.push(c);
            continue;
        }
        match chars.next() {
            Some('Y') => described.push_str("YYYY"),
            Some('y') => described.push_str("YY"),
            Some('m') => described.push_str("MM"),
            Some('d') => described.push_str("DD"),
            Some('H') => described.push_str("HH"),
            Some('M') => described.push_str("MM"),
            Some('S') => described.push_str("SS"),
            Some('%') => described.push('%'),
            Some(other) => {
                described.push('%');
                described.push(other);
            }
            None => described.push('%'),
        }
    }
    described
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert_eq!(config.date_format, "%Y-%m-%d");
        assert_eq!(config.date_time_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_describe_format() {
        assert_eq!(describe_format(DEFAULT_DATE_FORMAT), "YYYY-MM-DD");
        assert_eq!(describe_format(DEFAULT_DATE_TIME_FORMAT), "YYYY-MM-DD HH:MM:SS");
        assert_eq!(describe_format("%d/%m/%y"), "DD/MM/YY");
        assert_eq!(describe_format("100%% %j"), "100% %j");
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: ProcessorConfig =
            serde_json::from_str(r#"{"date_format": "%d/%m/%Y"}"#).unwrap();
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.date_time_format, DEFAULT_DATE_TIME_FORMAT);

        let config: ProcessorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProcessorConfig::default());
    }
}
