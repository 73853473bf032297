//! Row virtualization window.
//!
//! Only rows intersecting the viewport (plus overscan) are materialized. The
//! rows above and below are replaced by padding so the scroll height stays
//! the same as if every row were rendered.

use std::ops::Range;

/// Rows to materialize and the padding around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualWindow {
    /// First materialized row.
    pub start_index: usize,
    /// One past the last materialized row.
    pub end_index: usize,
    pub top_padding_px: u64,
    pub bottom_padding_px: u64,
    pub total_content_height_px: u64,
}

impl VirtualWindow {
    /// Materialized row positions.
    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Height of the materialized rows.
    pub fn rendered_height_px(&self) -> u64 {
        self.total_content_height_px - self.top_padding_px - self.bottom_padding_px
    }
}

/// Virtualization settings of one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub enabled: bool,
    pub row_height: u32,
    pub overscan: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            row_height: 36,
            overscan: 15,
        }
    }
}

/// Window for uniformly sized rows.
pub fn compute_window(
    scroll_top: u64,
    viewport_height: u64,
    row_count: usize,
    row_height: u32,
    overscan: u32,
) -> VirtualWindow {
    compute_window_measured(
        scroll_top,
        viewport_height,
        &RowHeights::uniform(row_count, row_height),
        overscan,
    )
}

/// Window under a [`WindowConfig`].
///
/// Disabled virtualization runs the same computation with a viewport tall
/// enough to cover every row, which yields the full range and zero padding,
/// zero-height rows included.
pub fn compute_window_for(
    config: &WindowConfig,
    scroll_top: u64,
    viewport_height: u64,
    heights: &RowHeights,
) -> VirtualWindow {
    if config.enabled {
        compute_window_measured(scroll_top, viewport_height, heights, config.overscan)
    } else {
        compute_window_measured(0, heights.total(), heights, 0)
    }
}

/// Window over rows with individually known heights.
pub fn compute_window_measured(
    scroll_top: u64,
    viewport_height: u64,
    heights: &RowHeights,
    overscan: u32,
) -> VirtualWindow {
    let row_count = heights.len();
    let total = heights.total();
    if row_count == 0 {
        return VirtualWindow {
            total_content_height_px: total,
            ..Default::default()
        };
    }

    let scroll_top = scroll_top.min(total.saturating_sub(viewport_height));
    let bottom = scroll_top + viewport_height;
    let visible_start = heights.first_row_at(scroll_top);
    // Reaching the end takes in trailing zero-height rows as well.
    let visible_end = if bottom >= total {
        row_count
    } else {
        heights
            .rows_starting_before(bottom)
            .max(visible_start + 1)
            .min(row_count)
    };

    let overscan = overscan as usize;
    let start_index = visible_start.saturating_sub(overscan);
    let end_index = (visible_end + overscan).min(row_count);

    let top_padding_px = heights.offset_of(start_index);
    let bottom_padding_px = total - heights.offset_of(end_index);

    VirtualWindow {
        start_index,
        end_index,
        top_padding_px,
        bottom_padding_px,
        total_content_height_px: total,
    }
}

// =============================================================================
// RowHeights
// =============================================================================

/// Row heights, either one estimate for all rows or measured per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowHeights {
    Uniform { count: usize, height: u32 },
    /// Cumulative offsets: `offsets[i]` is where row `i` starts, the last
    /// entry is the total height.
    Measured { offsets: Vec<u64> },
}

impl RowHeights {
    pub fn uniform(count: usize, height: u32) -> Self {
        RowHeights::Uniform { count, height }
    }

    /// Heights from measurements. Rows without one use `estimate`.
    pub fn measured(count: usize, estimate: u32, measured: impl Fn(usize) -> Option<u32>) -> Self {
        let mut offsets = Vec::with_capacity(count + 1);
        offsets.push(0);
        let mut total = 0u64;
        for i in 0..count {
            total += measured(i).unwrap_or(estimate) as u64;
            offsets.push(total);
        }
        RowHeights::Measured { offsets }
    }

    pub fn len(&self) -> usize {
        match self {
            RowHeights::Uniform { count, .. } => *count,
            RowHeights::Measured { offsets } => offsets.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total content height.
    pub fn total(&self) -> u64 {
        self.offset_of(self.len())
    }

    /// Y offset where row `index` starts. `index == len()` gives the total.
    pub fn offset_of(&self, index: usize) -> u64 {
        match self {
            RowHeights::Uniform { count, height } => (*count).min(index) as u64 * *height as u64,
            RowHeights::Measured { offsets } => offsets
                .get(index)
                .or_else(|| offsets.last())
                .copied()
                .unwrap_or(0),
        }
    }

    /// First row a viewport starting at `y` shows: the row containing `y`, or
    /// an earlier zero-height row sitting exactly at `y`.
    pub fn first_row_at(&self, y: u64) -> usize {
        let last = self.len().saturating_sub(1);
        match self {
            RowHeights::Uniform { height, .. } => {
                if *height == 0 {
                    return 0;
                }
                ((y / *height as u64) as usize).min(last)
            }
            RowHeights::Measured { offsets } => {
                let ends = offsets.get(1..).unwrap_or_default();
                let mut row = ends.partition_point(|&end| end <= y);
                while row > 0 && offsets[row - 1] >= y {
                    row -= 1;
                }
                row.min(last)
            }
        }
    }

    /// Number of rows starting above `y`.
    pub fn rows_starting_before(&self, y: u64) -> usize {
        match self {
            RowHeights::Uniform { count, height } => {
                if *height == 0 {
                    return if y > 0 { *count } else { 0 };
                }
                (y.div_ceil(*height as u64) as usize).min(*count)
            }
            RowHeights::Measured { offsets } => {
                let starts = &offsets[..offsets.len().saturating_sub(1)];
                starts.partition_point(|&start| start < y)
            }
        }
    }

    /// Row containing the y offset, clamped to the last row.
    pub fn row_at_offset(&self, y: u64) -> usize {
        let last = self.len().saturating_sub(1);
        match self {
            RowHeights::Uniform { height, .. } => {
                if *height == 0 {
                    return 0;
                }
                ((y / *height as u64) as usize).min(last)
            }
            RowHeights::Measured { offsets } => offsets
                .partition_point(|&h| h <= y)
                .saturating_sub(1)
                .min(last),
        }
    }
}
