//! Schema descriptors: detector, comparator and display metadata per type.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::ColumnType;
use super::builtin::DEFAULT_SCHEMA_COLOR;
use crate::sorting::SortDirection;

/// Scores how well a raw value matches a schema, in `[0, 1]`.
pub type DetectorFn = Arc<dyn Fn(&str) -> f64 + Send + Sync>;

/// Orders two raw values for the given direction.
///
/// Must describe a total order; the direction flip is the comparator's job.
pub type ComparatorFn = Arc<dyn Fn(&str, &str, SortDirection) -> Ordering + Send + Sync>;

/// Display metadata for a schema, used by the sort popover and field picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDetails {
    pub sort_text_asc: String,
    pub sort_text_desc: String,
    pub icon: String,
    pub color: String,
}

/// A schema type definition.
///
/// Built-in and caller-registered schemas share this shape.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use datagrid::schema::{ColumnType, SchemaDescriptor};
/// use datagrid::sorting::SortDirection;
///
/// let franchise = SchemaDescriptor::new(ColumnType::custom("franchise"), |value| {
///     let v = value.to_lowercase();
///     if v == "star wars" || v == "star trek" { 1.0 } else { 0.0 }
/// })
/// .comparator(|a, b, direction| {
///     let a = a.eq_ignore_ascii_case("star wars");
///     let b = b.eq_ignore_ascii_case("star wars");
///     direction.apply(b.cmp(&a))
/// })
/// .sort_text("Star Wars-Star Trek", "Star Trek-Star Wars")
/// .icon("star");
///
/// assert_eq!(franchise.detect("Star Trek"), 1.0);
/// assert_eq!(
///     franchise.compare("Star Wars", "Star Trek", SortDirection::Asc),
///     Some(Ordering::Less)
/// );
/// ```
#[derive(Clone)]
pub struct SchemaDescriptor {
    column_type: ColumnType,
    detector: DetectorFn,
    comparator: Option<ComparatorFn>,
    details: SchemaDetails,
}

impl SchemaDescriptor {
    /// Create a descriptor with a detector and default metadata.
    pub fn new<F>(column_type: ColumnType, detector: F) -> Self
    where
        F: Fn(&str) -> f64 + Send + Sync + 'static,
    {
        Self {
            column_type,
            detector: Arc::new(detector),
            comparator: None,
            details: SchemaDetails {
                sort_text_asc: "A-Z".into(),
                sort_text_desc: "Z-A".into(),
                icon: "string".into(),
                color: DEFAULT_SCHEMA_COLOR.into(),
            },
        }
    }

    /// Set the comparator used when sorting columns of this type.
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&str, &str, SortDirection) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }

    /// Set the labels describing ascending and descending order.
    pub fn sort_text(mut self, asc: impl Into<String>, desc: impl Into<String>) -> Self {
        self.details.sort_text_asc = asc.into();
        self.details.sort_text_desc = desc.into();
        self
    }

    /// Set the icon name.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.details.icon = icon.into();
        self
    }

    /// Set the icon color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.details.color = color.into();
        self
    }

    /// The type tag.
    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// Display metadata.
    pub fn details(&self) -> &SchemaDetails {
        &self.details
    }

    /// Shared handle to the comparator, if one is defined.
    pub fn comparator_fn(&self) -> Option<&ComparatorFn> {
        self.comparator.as_ref()
    }

    /// Score a value. Results are clamped to `[0, 1]`; NaN scores as 0.
    pub fn detect(&self, value: &str) -> f64 {
        let score = (self.detector)(value);
        if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
    }

    /// Compare two values, or `None` when no comparator is defined.
    pub fn compare(&self, a: &str, b: &str, direction: SortDirection) -> Option<Ordering> {
        self.comparator.as_ref().map(|cmp| cmp(a, b, direction))
    }
}

impl fmt::Debug for SchemaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("column_type", &self.column_type)
            .field("has_comparator", &self.comparator.is_some())
            .field("details", &self.details)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_clamps_scores() {
        let over = SchemaDescriptor::new(ColumnType::custom("over"), |_| 7.0);
        let under = SchemaDescriptor::new(ColumnType::custom("under"), |_| -1.0);
        let nan = SchemaDescriptor::new(ColumnType::custom("nan"), |_| f64::NAN);
        assert_eq!(over.detect("x"), 1.0);
        assert_eq!(under.detect("x"), 0.0);
        assert_eq!(nan.detect("x"), 0.0);
    }

    #[test]
    fn test_compare_without_comparator() {
        let d = SchemaDescriptor::new(ColumnType::custom("plain"), |_| 0.0);
        assert_eq!(d.compare("a", "b", SortDirection::Asc), None);
    }

    #[test]
    fn test_default_details() {
        let d = SchemaDescriptor::new(ColumnType::custom("plain"), |_| 0.0);
        assert_eq!(d.details().sort_text_asc, "A-Z");
        assert_eq!(d.details().icon, "string");
        assert_eq!(d.details().color, DEFAULT_SCHEMA_COLOR);
    }
}
