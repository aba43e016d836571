//! JSON output formatting for machine-readable output.
//!
//! Always pretty-printed.

use super::OutputConfig;
use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as a pretty-printed JSON string
    pub fn format<T: Serialize + ?Sized>(data: &T, _config: &OutputConfig) -> String {
        serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use apibump_core::{Change, ChangeRecord};

    #[test]
    fn test_format_pretty() {
        let record = ChangeRecord::new("pkg.Widget", Change::EntityWasRemoved);
        let output = JsonOutput::format(&record, &OutputConfig::new(OutputFormat::Json));

        assert!(output.contains("\"path\": \"pkg.Widget\""));
        assert!(output.contains("\"kind\": \"entity_was_removed\""));
        assert!(output.contains("\"severity\": \"major\""));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_list() {
        let records = vec![
            ChangeRecord::new("a", Change::EntityWasIntroduced),
            ChangeRecord::new("b", Change::EntityWasRemoved),
        ];
        let output = JsonOutput::format(&records, &OutputConfig::new(OutputFormat::Json));

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(2));
        assert_eq!(parsed[1]["path"], "b");
    }
}
