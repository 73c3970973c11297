//! Column measurement cache for horizontal windowing.
//!
//! Column offsets are measured lazily from the left and cached. The cache
//! does not watch the widths it measured: whoever owns the column set must
//! call [`ColumnLayout::reset_after_column`] when columns or their widths
//! change, or stale offsets will be served.

/// Cached cumulative column offsets.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    /// `cumulative[i]` is the left offset of column `i`. Always starts with 0.
    cumulative: Vec<u64>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnLayout {
    pub fn new() -> Self {
        Self {
            cumulative: vec![0],
        }
    }

    /// Number of columns whose offsets are cached.
    pub fn measured(&self) -> usize {
        self.cumulative.len() - 1
    }

    /// Drop cached measurements for `index` and every column after it.
    pub fn reset_after_column(&mut self, index: usize) {
        if index < self.measured() {
            log::trace!(
                "layout: reset after column {index} ({} measured)",
                self.measured()
            );
            self.cumulative.truncate(index + 1);
        }
    }

    /// Measure up to and including column `index`.
    fn measure_through<F>(&mut self, index: usize, width_of: F)
    where
        F: Fn(usize) -> u32,
    {
        while self.measured() <= index {
            let next = self.measured();
            let left = self.cumulative[next];
            self.cumulative.push(left + u64::from(width_of(next)));
        }
    }

    /// Left offset of column `index`. O(1) once measured.
    pub fn column_offset<F>(&mut self, index: usize, width_of: F) -> u64
    where
        F: Fn(usize) -> u32,
    {
        if index == 0 {
            return 0;
        }
        self.measure_through(index - 1, width_of);
        self.cumulative[index]
    }

    /// Total width of `count` columns.
    pub fn total_width<F>(&mut self, count: usize, width_of: F) -> u64
    where
        F: Fn(usize) -> u32,
    {
        self.column_offset(count, width_of)
    }

    /// Column containing horizontal offset `x`, clamped to the last column.
    /// Returns `None` when there are no columns.
    pub fn column_at_offset<F>(&mut self, x: u64, count: usize, width_of: F) -> Option<usize>
    where
        F: Fn(usize) -> u32,
    {
        if count == 0 {
            return None;
        }
        self.measure_through(count - 1, width_of);
        let index = self.cumulative[..=count]
            .partition_point(|&left| left <= x)
            .saturating_sub(1);
        Some(index.min(count - 1))
    }
}
