//! Load and dashboard configuration.

use crate::column::ColumnType;
use std::collections::HashMap;

/// Cell tokens treated as absent in addition to the empty string.
pub const DEFAULT_NA_TOKENS: &[&str] = &["NA", "NaN", "nan", "null", "NULL", "None"];

/// Options controlling how a delimited file becomes a `Table`.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Cells equal to one of these (after trimming) are absent.
    pub na_tokens: Vec<String>,
    /// Type used for a column whose cells are all absent. Columns without a
    /// hint fall back to `String`.
    pub type_hints: HashMap<String, ColumnType>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            na_tokens: DEFAULT_NA_TOKENS.iter().map(|s| s.to_string()).collect(),
            type_hints: HashMap::new(),
        }
    }
}

impl LoadOptions {
    pub fn is_na(&self, cell: &str) -> bool {
        cell.is_empty() || self.na_tokens.iter().any(|t| t == cell)
    }

    pub fn with_type_hint(mut self, column: impl Into<String>, column_type: ColumnType) -> Self {
        self.type_hints.insert(column.into(), column_type);
        self
    }
}

/// Defaults applied when a dashboard session is created.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How many distinct states the comparison view starts with.
    pub compared_states: usize,
    /// Colour name the renderer uses for regions without a value.
    pub placeholder_color: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            compared_states: 5,
            placeholder_color: "grey50".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_tokens() {
        let opts = LoadOptions::default();
        assert!(opts.is_na(""));
        assert!(opts.is_na("NA"));
        assert!(opts.is_na("NaN"));
        assert!(!opts.is_na("0"));
        assert!(!opts.is_na("na"));
    }

    #[test]
    fn test_type_hint_builder() {
        let opts = LoadOptions::default().with_type_hint("price", ColumnType::Float64);
        assert_eq!(opts.type_hints.get("price"), Some(&ColumnType::Float64));
    }
}
