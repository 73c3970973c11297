//! Pagination: the contiguous range of visible row positions on a page.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};

/// Caller-owned pagination state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaginationRepr")]
pub struct Pagination {
    page_index: usize,
    page_size: usize,
    page_size_options: Vec<usize>,
}

#[derive(Deserialize)]
struct PaginationRepr {
    page_index: usize,
    page_size: usize,
    #[serde(default)]
    page_size_options: Vec<usize>,
}

impl TryFrom<PaginationRepr> for Pagination {
    type Error = GridError;

    fn try_from(repr: PaginationRepr) -> Result<Self> {
        Ok(Pagination::new(repr.page_index, repr.page_size)?
            .with_page_size_options(repr.page_size_options))
    }
}

impl Pagination {
    /// Create pagination for a 0-based page index.
    pub fn new(page_index: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(GridError::ZeroPageSize);
        }
        Ok(Self {
            page_index,
            page_size,
            page_size_options: Vec::new(),
        })
    }

    /// Set the page sizes offered to the user.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// 0-based page index.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Page sizes offered to the user.
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Number of pages for a row count. Zero rows still form one page.
    pub fn page_count(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size).max(1)
    }

    /// Copy with the page index clamped to the last page.
    pub fn clamped(&self, row_count: usize) -> Self {
        let last = self.page_count(row_count) - 1;
        Self {
            page_index: self.page_index.min(last),
            ..self.clone()
        }
    }

    /// Copy showing another page.
    pub fn with_page_index(&self, page_index: usize) -> Self {
        Self {
            page_index,
            ..self.clone()
        }
    }

    /// Copy with another page size, keeping the first visible row on the
    /// new page.
    pub fn with_page_size(&self, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(GridError::ZeroPageSize);
        }
        let first_row = self.page_index.saturating_mul(self.page_size);
        Ok(Self {
            page_index: first_row / page_size,
            page_size,
            page_size_options: self.page_size_options.clone(),
        })
    }
}

/// The range of visible row positions shown on the current page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibleWindow {
    pub start_row: usize,
    pub end_row: usize,
}

impl VisibleWindow {
    /// Number of rows on the page.
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    /// Whether the page has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Absolute visible position of a row on the page.
    pub fn absolute(&self, position_in_page: usize) -> usize {
        self.start_row + position_in_page
    }

    /// As a range of absolute visible positions.
    pub fn range(&self) -> Range<usize> {
        self.start_row..self.end_row
    }
}

/// Compute the visible window for a row count.
///
/// Without pagination all rows form a single page. A page past the end
/// yields an empty window at `row_count`.
pub fn slice(row_count: usize, pagination: Option<&Pagination>) -> VisibleWindow {
    match pagination {
        Some(p) => {
            let start_row = p.page_index.saturating_mul(p.page_size).min(row_count);
            let end_row = p
                .page_index
                .saturating_add(1)
                .saturating_mul(p.page_size)
                .min(row_count);
            VisibleWindow { start_row, end_row }
        }
        None => VisibleWindow {
            start_row: 0,
            end_row: row_count,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_final_page() {
        let p = Pagination::new(2, 100).unwrap();
        assert_eq!(slice(250, Some(&p)), VisibleWindow { start_row: 200, end_row: 250 });
    }

    #[test]
    fn test_no_pagination_is_one_page() {
        assert_eq!(slice(42, None), VisibleWindow { start_row: 0, end_row: 42 });
        assert!(slice(0, None).is_empty());
    }

    #[test]
    fn test_bounds_hold_for_many_inputs() {
        for row_count in [0, 1, 7, 99, 100, 101, 1000] {
            for page_size in [1, 3, 10, 100] {
                for page_index in [0, 1, 2, 50, 500] {
                    let p = Pagination::new(page_index, page_size).unwrap();
                    let w = slice(row_count, Some(&p));
                    assert!(w.start_row <= w.end_row);
                    assert!(w.len() <= page_size);
                    assert!(w.end_row <= row_count);
                }
            }
        }
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let p = Pagination::new(10, 10).unwrap();
        assert!(slice(25, Some(&p)).is_empty());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(Pagination::new(0, 0), Err(GridError::ZeroPageSize)));
        let parsed: std::result::Result<Pagination, _> =
            serde_json::from_str(r#"{"page_index": 0, "page_size": 0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_page_count_and_clamp() {
        let p = Pagination::new(9, 100).unwrap();
        assert_eq!(p.page_count(250), 3);
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.clamped(250).page_index(), 2);
    }

    #[test]
    fn test_with_page_size_keeps_first_row() {
        let p = Pagination::new(3, 50)
            .unwrap()
            .with_page_size_options(vec![50, 100]);
        let resized = p.with_page_size(100).unwrap();
        assert_eq!(resized.page_index(), 1);
        assert_eq!(resized.page_size_options(), &[50, 100]);
    }

    #[test]
    fn test_with_page_size_saturates_huge_index() {
        let p = Pagination::new(usize::MAX, 2).unwrap();
        let resized = p.with_page_size(4).unwrap();
        assert_eq!(resized.page_index(), usize::MAX / 4);
    }
}
