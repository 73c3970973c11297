//! Schema registry: detection and comparator/metadata lookup.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::builtin::{builtin_descriptors, default_comparator};
use super::descriptor::{ComparatorFn, SchemaDescriptor, SchemaDetails};
use super::{ColumnType, Schema, SchemaEntry, SchemaOrigin};
use crate::column::ColumnDefinition;
use crate::config::InMemoryLevel;
use crate::error::panic_message;
use crate::values::InMemoryValues;

/// Default minimum mean score for a detected type to be assigned.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.5;

/// Ordered set of schema descriptors.
///
/// Caller-registered descriptors come first, followed by the built-ins.
/// Every lookup walks this order, so a custom descriptor shadows a built-in
/// with the same tag, and ties in detection go to the earlier descriptor.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    descriptors: Vec<SchemaDescriptor>,
    threshold: f64,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// Registry with only the built-in descriptors.
    pub fn new() -> Self {
        Self::with_custom(Vec::new())
    }

    /// Registry with caller descriptors ahead of the built-ins.
    pub fn with_custom(custom: Vec<SchemaDescriptor>) -> Self {
        let mut descriptors = custom;
        descriptors.extend(builtin_descriptors());
        Self {
            descriptors,
            threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }

    /// Set the minimum mean score for detection.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// All descriptors in lookup order.
    pub fn descriptors(&self) -> &[SchemaDescriptor] {
        &self.descriptors
    }

    /// First descriptor registered for a type.
    pub fn descriptor(&self, column_type: &ColumnType) -> Option<&SchemaDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.column_type() == column_type)
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    /// Resolve the schema of one column.
    ///
    /// A declared type is authoritative. Otherwise every descriptor is
    /// scored by its mean detector result over `sample`; the best mean wins
    /// if it reaches the threshold, earlier descriptors winning ties. An
    /// empty sample, a best score under the threshold, or a panicking
    /// detector leave the column untyped.
    pub fn resolve<S: AsRef<str>>(
        &self,
        column_id: &str,
        declared: Option<&ColumnType>,
        sample: &[S],
    ) -> SchemaEntry {
        if let Some(column_type) = declared {
            return SchemaEntry::declared(column_id, column_type.clone());
        }
        if sample.is_empty() {
            return SchemaEntry::untyped(column_id);
        }

        let mut best: Option<(&SchemaDescriptor, f64)> = None;
        for descriptor in &self.descriptors {
            let Some(mean) = Self::mean_score(column_id, descriptor, sample) else {
                return SchemaEntry::untyped(column_id);
            };
            if best.is_none_or(|(_, best_mean)| mean > best_mean) {
                best = Some((descriptor, mean));
            }
        }

        match best {
            Some((descriptor, mean)) if mean > 0.0 && mean >= self.threshold => {
                log::debug!(
                    "schema: column '{}' detected as '{}' (score {:.3})",
                    column_id,
                    descriptor.column_type(),
                    mean
                );
                SchemaEntry {
                    column_id: column_id.to_string(),
                    column_type: Some(descriptor.column_type().clone()),
                    confidence: mean,
                    origin: SchemaOrigin::Detected,
                }
            }
            _ => SchemaEntry::untyped(column_id),
        }
    }

    /// Mean detector score, or `None` if the detector panicked.
    fn mean_score<S: AsRef<str>>(
        column_id: &str,
        descriptor: &SchemaDescriptor,
        sample: &[S],
    ) -> Option<f64> {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            sample.iter().map(|v| descriptor.detect(v.as_ref())).sum::<f64>()
        }));
        match result {
            Ok(total) => Some(total / sample.len() as f64),
            Err(payload) => {
                log::warn!(
                    "schema: detector '{}' panicked on column '{}': {}",
                    descriptor.column_type(),
                    column_id,
                    panic_message(&payload)
                );
                None
            }
        }
    }

    /// Resolve every column of a column set.
    ///
    /// Detection only runs when `level` enables it and values are available;
    /// otherwise undeclared columns are untyped.
    pub fn resolve_columns(
        &self,
        columns: &[ColumnDefinition],
        values: Option<&InMemoryValues>,
        level: InMemoryLevel,
    ) -> Schema {
        columns
            .iter()
            .map(|column| {
                let sample = match values {
                    Some(values) if level.detects_schema() && column.schema.is_none() => {
                        values.column_sample(&column.id)
                    }
                    _ => Vec::new(),
                };
                self.resolve(&column.id, column.schema.as_ref(), &sample)
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Comparator for a type: the first descriptor with that tag that
    /// defines one, else the default comparator.
    pub fn comparator_for(&self, column_type: Option<&ColumnType>) -> ComparatorFn {
        column_type
            .and_then(|column_type| {
                self.descriptors
                    .iter()
                    .filter(|d| d.column_type() == column_type)
                    .find_map(|d| d.comparator_fn().cloned())
            })
            .unwrap_or_else(|| Arc::new(default_comparator))
    }

    /// Display metadata for a type, falling back to the string schema.
    pub fn details_for(&self, column_type: Option<&ColumnType>) -> SchemaDetails {
        column_type
            .and_then(|t| self.descriptor(t))
            .or_else(|| self.descriptor(&ColumnType::String))
            .map(|d| d.details().clone())
            .unwrap_or_else(|| {
                SchemaDescriptor::new(ColumnType::String, |_| 0.0)
                    .details()
                    .clone()
            })
    }
}
