//! # Virtual Window
//!
//! Computes which rows of a fixed-height list must be materialized for the
//! current scroll position.
//!
//! ```text
//!            ┌──────────────┐  index 0
//!            │   overscan   │
//!   start ──►├──────────────┤
//!            │   overscan   │  floor(scroll / h) - overscan
//!            ├══════════════┤◄── scroll_offset
//!            │              │
//!            │   visible    │  container_height
//!            │              │
//!            ├══════════════┤◄── scroll_offset + container_height
//!            │   overscan   │  ceil((scroll + container) / h) + overscan
//!     end ──►├──────────────┤
//!            │     ...      │  not materialized
//!            └──────────────┘  index item_count - 1
//! ```
//!
//! The calculation is a pure function of its inputs: identical inputs always
//! produce identical ranges, and there is no hidden state to invalidate.
//!
//! ## Example
//!
//! ```
//! use perfkit::window::VirtualWindow;
//!
//! let window = VirtualWindow::try_new(40, 600, 5).unwrap();
//! let range = window.compute_range(1000, 0.0);
//!
//! assert_eq!(range.start_index, 0);
//! assert_eq!(range.end_index, 20);
//! assert_eq!(range.total_height, 40_000);
//! ```

use std::ops::RangeInclusive;

use crate::error::ConfigError;

/// Overscan used when none is configured.
pub const DEFAULT_OVERSCAN: usize = 5;

/// One materialized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualItem {
    pub index: usize,
    /// Distance from the top of the list to the top of this row.
    pub offset: u64,
    pub height: u32,
}

/// Result of [`VirtualWindow::compute_range`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VirtualRange {
    pub start_index: usize,
    pub end_index: usize,
    /// One entry per index in `start_index..=end_index`; empty when the
    /// window lies outside the list.
    pub items: Vec<VirtualItem>,
    /// Height of the whole list, for sizing the scroll spacer.
    pub total_height: u64,
}

impl VirtualRange {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` when `index` is materialized by this range.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        !self.items.is_empty() && (self.start_index..=self.end_index).contains(&index)
    }

    /// Materialized indices, or `None` for an empty range.
    pub fn indices(&self) -> Option<RangeInclusive<usize>> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.start_index..=self.end_index)
        }
    }
}

/// Fixed-height list geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualWindow {
    item_height: u32,
    container_height: u32,
    overscan: usize,
}

impl VirtualWindow {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `item_height` is zero.
    pub fn try_new(
        item_height: u32,
        container_height: u32,
        overscan: usize,
    ) -> Result<Self, ConfigError> {
        if item_height == 0 {
            return Err(ConfigError::new("item height must be > 0"));
        }
        Ok(Self {
            item_height,
            container_height,
            overscan,
        })
    }

    #[inline]
    pub fn item_height(&self) -> u32 {
        self.item_height
    }

    #[inline]
    pub fn container_height(&self) -> u32 {
        self.container_height
    }

    #[inline]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Returns a copy with a different container height (viewport resize).
    #[inline]
    pub fn with_container_height(self, container_height: u32) -> Self {
        Self {
            container_height,
            ..self
        }
    }

    /// Computes the rows to materialize for `item_count` rows scrolled to
    /// `scroll_offset`.
    ///
    /// Negative or non-finite offsets (elastic overscroll) are read as `0`.
    pub fn compute_range(&self, item_count: usize, scroll_offset: f64) -> VirtualRange {
        let height = u64::from(self.item_height);
        let total_height = (item_count as u64).saturating_mul(height);

        let Some(last_index) = item_count.checked_sub(1) else {
            return VirtualRange::default();
        };

        let scroll = sanitize_offset(scroll_offset);
        let item_height = f64::from(self.item_height);

        let first_visible = (scroll / item_height).floor() as usize;
        let start_index = first_visible.saturating_sub(self.overscan);

        let last_visible =
            ((scroll + f64::from(self.container_height)) / item_height).ceil() as usize;
        let end_index = last_visible.saturating_add(self.overscan).min(last_index);

        let items = if start_index <= end_index {
            (start_index..=end_index)
                .map(|index| VirtualItem {
                    index,
                    offset: (index as u64).saturating_mul(height),
                    height: self.item_height,
                })
                .collect()
        } else {
            Vec::new()
        };

        VirtualRange {
            start_index,
            end_index,
            items,
            total_height,
        }
    }

    /// Scroll offset that brings `index` to the top of the container.
    ///
    /// Clamped to the last scrollable position so the list never scrolls past
    /// its end; `index` beyond the list targets the last row.
    pub fn offset_for_index(&self, item_count: usize, index: usize) -> u64 {
        let Some(last_index) = item_count.checked_sub(1) else {
            return 0;
        };
        let height = u64::from(self.item_height);
        let target = (index.min(last_index) as u64).saturating_mul(height);
        let max_scroll = (item_count as u64)
            .saturating_mul(height)
            .saturating_sub(u64::from(self.container_height));
        target.min(max_scroll)
    }
}

/// One-shot form of [`VirtualWindow::compute_range`].
///
/// # Errors
///
/// Returns [`ConfigError`] when `item_height` is zero.
///
/// # Example
///
/// ```
/// use perfkit::window::compute_range;
///
/// let range = compute_range(10, 40, 600, 100_000.0, 5).unwrap();
/// assert_eq!(range.end_index, 9);
/// assert!(range.is_empty());
/// ```
pub fn compute_range(
    item_count: usize,
    item_height: u32,
    container_height: u32,
    scroll_offset: f64,
    overscan: usize,
) -> Result<VirtualRange, ConfigError> {
    VirtualWindow::try_new(item_height, container_height, overscan)
        .map(|window| window.compute_range(item_count, scroll_offset))
}

#[inline]
fn sanitize_offset(offset: f64) -> f64 {
    if offset.is_finite() && offset > 0.0 {
        offset
    } else {
        0.0
    }
}
