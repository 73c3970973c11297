//! Grid configuration types.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Width used for a column when neither an explicit width nor a configured
/// default is available.
pub const FALLBACK_COLUMN_WIDTH: u32 = 100;

/// How much data work the grid performs on the materialized rows.
///
/// Each level includes everything the previous one does.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InMemoryLevel {
    /// No detection, no local data operations. Content is treated as flat strings.
    #[default]
    Disabled,
    /// Schema detection on whatever rows are currently materialized.
    Enhancements,
    /// Detection plus local pagination.
    Pagination,
    /// Detection, pagination and local sorting.
    Sorting,
}

impl InMemoryLevel {
    /// Whether column schemas are detected from materialized values.
    pub fn detects_schema(self) -> bool {
        self >= InMemoryLevel::Enhancements
    }

    /// Whether pagination is applied to materialized rows.
    pub fn paginates(self) -> bool {
        self >= InMemoryLevel::Pagination
    }

    /// Whether the grid sorts materialized rows itself.
    pub fn sorts(self) -> bool {
        self == InMemoryLevel::Sorting
    }
}

/// Per-grid configuration.
///
/// All sizes are in abstract layout units (pixels for a web host, cells for
/// a terminal host).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Height of every body row.
    pub row_height: u32,
    /// Height of the sticky header band.
    pub header_height: u32,
    /// Height of the sticky footer band (only used when a footer is rendered).
    pub footer_height: u32,
    /// Space reserved for the horizontal scrollbar.
    pub scrollbar_size: u32,
    /// Width for columns without an explicit width.
    pub default_column_width: Option<u32>,
    /// Extra rows rendered beyond each edge of the viewport.
    pub overscan_rows: usize,
    /// Extra columns rendered beyond each edge of the viewport.
    pub overscan_columns: usize,
    /// Minimum mean detector score for a detected schema to be assigned.
    pub detection_threshold: f64,
    /// In-memory capability level.
    pub in_memory: InMemoryLevel,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: 34,
            header_height: 37,
            footer_height: 37,
            scrollbar_size: 15,
            default_column_width: None,
            overscan_rows: 1,
            overscan_columns: 1,
            detection_threshold: 0.5,
            in_memory: InMemoryLevel::Disabled,
        }
    }
}

impl GridConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a config from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is within its accepted range.
    pub fn validate(&self) -> Result<()> {
        if self.row_height == 0 {
            return Err(GridError::InvalidConfig {
                field: "row_height",
                reason: "must be greater than zero".into(),
            });
        }
        if self.default_column_width == Some(0) {
            return Err(GridError::InvalidConfig {
                field: "default_column_width",
                reason: "must be greater than zero when set".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.detection_threshold) {
            return Err(GridError::InvalidConfig {
                field: "detection_threshold",
                reason: format!("{} is outside [0, 1]", self.detection_threshold),
            });
        }
        Ok(())
    }

    /// Set the body row height.
    pub fn row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Set the header band height.
    pub fn header_height(mut self, height: u32) -> Self {
        self.header_height = height;
        self
    }

    /// Set the footer band height.
    pub fn footer_height(mut self, height: u32) -> Self {
        self.footer_height = height;
        self
    }

    /// Set the horizontal scrollbar allowance.
    pub fn scrollbar_size(mut self, size: u32) -> Self {
        self.scrollbar_size = size;
        self
    }

    /// Set the default column width.
    pub fn default_column_width(mut self, width: u32) -> Self {
        self.default_column_width = Some(width);
        self
    }

    /// Set row and column overscan.
    pub fn overscan(mut self, rows: usize, columns: usize) -> Self {
        self.overscan_rows = rows;
        self.overscan_columns = columns;
        self
    }

    /// Set the detection threshold.
    pub fn detection_threshold(mut self, threshold: f64) -> Self {
        self.detection_threshold = threshold;
        self
    }

    /// Set the in-memory level.
    pub fn in_memory(mut self, level: InMemoryLevel) -> Self {
        self.in_memory = level;
        self
    }
}
