//! Column schemas: type tags, detection and per-type sorting metadata.
//!
//! A schema classifies the value domain of a column. It is either declared
//! on the column or detected from the materialized values by scoring every
//! registered [`SchemaDescriptor`] against a sample.

mod builtin;
mod descriptor;
mod registry;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use builtin::{builtin_descriptors, default_comparator, DEFAULT_SCHEMA_COLOR};
pub use descriptor::{ComparatorFn, DetectorFn, SchemaDescriptor, SchemaDetails};
pub use registry::SchemaRegistry;

// =============================================================================
// ColumnType
// =============================================================================

/// A schema type tag.
///
/// Built-in tags have dedicated variants; caller-registered schemas use
/// [`ColumnType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Numeric,
    Currency,
    Datetime,
    Boolean,
    Json,
    String,
    Custom(String),
}

impl ColumnType {
    /// Create a custom type tag.
    pub fn custom(tag: impl Into<String>) -> Self {
        ColumnType::from(tag.into())
    }

    /// The tag string.
    pub fn as_str(&self) -> &str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Currency => "currency",
            ColumnType::Datetime => "datetime",
            ColumnType::Boolean => "boolean",
            ColumnType::Json => "json",
            ColumnType::String => "string",
            ColumnType::Custom(tag) => tag,
        }
    }
}

impl From<String> for ColumnType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "numeric" => ColumnType::Numeric,
            "currency" => ColumnType::Currency,
            "datetime" => ColumnType::Datetime,
            "boolean" => ColumnType::Boolean,
            "json" => ColumnType::Json,
            "string" => ColumnType::String,
            _ => ColumnType::Custom(tag),
        }
    }
}

impl From<&str> for ColumnType {
    fn from(tag: &str) -> Self {
        ColumnType::from(tag.to_string())
    }
}

impl From<ColumnType> for String {
    fn from(column_type: ColumnType) -> Self {
        column_type.as_str().to_string()
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SchemaEntry / Schema
// =============================================================================

/// Where a column's schema came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Declared on the column definition.
    Declared,
    /// Chosen by detection.
    Detected,
}

/// The resolved schema of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub column_id: String,
    /// `None` when the column is untyped and uses default string behavior.
    pub column_type: Option<ColumnType>,
    /// Mean detector score of the chosen type (1.0 for declared types).
    pub confidence: f64,
    pub origin: SchemaOrigin,
}

impl SchemaEntry {
    /// Entry for a declared type.
    pub fn declared(column_id: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            column_id: column_id.into(),
            column_type: Some(column_type),
            confidence: 1.0,
            origin: SchemaOrigin::Declared,
        }
    }

    /// Entry for a column without a resolved type.
    pub fn untyped(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            column_type: None,
            confidence: 0.0,
            origin: SchemaOrigin::Detected,
        }
    }
}

/// Resolved schemas for a column set, keyed by column id.
///
/// Built fresh on every update pass that changes columns or values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    entries: HashMap<String, SchemaEntry>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a column entry.
    pub fn insert(&mut self, entry: SchemaEntry) {
        self.entries.insert(entry.column_id.clone(), entry);
    }

    /// Entry for a column.
    pub fn get(&self, column_id: &str) -> Option<&SchemaEntry> {
        self.entries.get(column_id)
    }

    /// Resolved type for a column.
    pub fn column_type(&self, column_id: &str) -> Option<&ColumnType> {
        self.entries
            .get(column_id)
            .and_then(|e| e.column_type.as_ref())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.values()
    }
}

impl FromIterator<SchemaEntry> for Schema {
    fn from_iter<I: IntoIterator<Item = SchemaEntry>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for entry in iter {
            schema.insert(entry);
        }
        schema
    }
}
