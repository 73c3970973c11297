//! Cell expansion popover formatters, keyed by schema type.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::ColumnType;

/// Content shown in a cell's expansion popover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopoverContent {
    /// Plain text.
    Text(String),
    /// A code block in the given language.
    Code { language: String, text: String },
}

impl PopoverContent {
    /// The text carried by the content.
    pub fn text(&self) -> &str {
        match self {
            PopoverContent::Text(text) => text,
            PopoverContent::Code { text, .. } => text,
        }
    }
}

/// Formats the raw rendered text of a cell into popover content.
pub type PopoverFormatterFn = Arc<dyn Fn(&str) -> PopoverContent + Send + Sync>;

/// Pretty-print JSON, falling back to the raw text when it does not parse.
pub fn format_json(raw: &str) -> PopoverContent {
    let text = serde_json::from_str::<serde_json::Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_string());
    PopoverContent::Code {
        language: "json".into(),
        text,
    }
}

/// Wrap the raw text unchanged.
pub fn format_text(raw: &str) -> PopoverContent {
    PopoverContent::Text(raw.to_string())
}

/// Popover formatters by schema type.
///
/// Holds the built-in json formatter plus any caller formatters; a caller
/// formatter for `json` replaces the built-in one. Types without a
/// formatter use [`format_text`].
#[derive(Clone)]
pub struct PopoverFormatters {
    formatters: HashMap<ColumnType, PopoverFormatterFn>,
    fallback: PopoverFormatterFn,
}

impl Default for PopoverFormatters {
    fn default() -> Self {
        Self::new()
    }
}

impl PopoverFormatters {
    /// Formatters with only the built-ins registered.
    pub fn new() -> Self {
        let mut formatters: HashMap<ColumnType, PopoverFormatterFn> = HashMap::new();
        formatters.insert(ColumnType::Json, Arc::new(format_json));
        Self {
            formatters,
            fallback: Arc::new(format_text),
        }
    }

    /// Register a formatter for a type, replacing any existing one.
    pub fn with<F>(mut self, column_type: ColumnType, formatter: F) -> Self
    where
        F: Fn(&str) -> PopoverContent + Send + Sync + 'static,
    {
        self.formatters.insert(column_type, Arc::new(formatter));
        self
    }

    /// Formatter for a column type.
    pub fn resolve(&self, column_type: Option<&ColumnType>) -> &PopoverFormatterFn {
        column_type
            .and_then(|t| self.formatters.get(t))
            .unwrap_or(&self.fallback)
    }

    /// Format raw cell text for a column type.
    pub fn format(&self, column_type: Option<&ColumnType>, raw: &str) -> PopoverContent {
        (self.resolve(column_type))(raw)
    }
}

impl fmt::Debug for PopoverFormatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopoverFormatters")
            .field("types", &self.formatters.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_pretty_prints() {
        let content = format_json(r#"{"a":[1,2]}"#);
        assert_eq!(
            content,
            PopoverContent::Code {
                language: "json".into(),
                text: "{\n  \"a\": [\n    1,\n    2\n  ]\n}".into(),
            }
        );
    }

    #[test]
    fn test_json_falls_back_to_raw() {
        assert_eq!(format_json("{broken").text(), "{broken");
    }

    #[test]
    fn test_resolution_order() {
        let formatters = PopoverFormatters::new().with(ColumnType::custom("franchise"), |raw| {
            PopoverContent::Text(format!("franchise: {raw}"))
        });
        assert_eq!(
            formatters.format(Some(&ColumnType::custom("franchise")), "x").text(),
            "franchise: x"
        );
        assert!(matches!(
            formatters.format(Some(&ColumnType::Json), "[]"),
            PopoverContent::Code { .. }
        ));
        assert_eq!(
            formatters.format(Some(&ColumnType::Numeric), "5"),
            PopoverContent::Text("5".into())
        );
        assert_eq!(formatters.format(None, "5"), PopoverContent::Text("5".into()));
    }

    #[test]
    fn test_json_formatter_overridable() {
        let formatters = PopoverFormatters::new()
            .with(ColumnType::Json, |raw| PopoverContent::Text(raw.to_uppercase()));
        assert_eq!(formatters.format(Some(&ColumnType::Json), "{}").text(), "{}");
        assert_eq!(formatters.format(Some(&ColumnType::Json), "ab").text(), "AB");
    }
}
