//! Virtualized row window for uniform-height grids.
//!
//! Only the rows intersecting the viewport, plus an overscan margin on each
//! side, are materialized. All positions are in pixels.

use serde::{Deserialize, Serialize};

pub const DEFAULT_ROW_HEIGHT: usize = 48;
pub const DEFAULT_VIEWPORT_HEIGHT: usize = 600;
pub const DEFAULT_OVERSCAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualizerConfig {
    pub row_height: usize,
    pub viewport_height: usize,
    pub overscan: usize,
}

impl Default for VirtualizerConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

impl VirtualizerConfig {
    /// Row height in pixels, never zero.
    pub fn effective_row_height(&self) -> usize {
        self.row_height.max(1)
    }

    /// Largest useful scroll offset for `total_rows` rows.
    pub fn max_scroll(&self, total_rows: usize) -> usize {
        total_rows
            .saturating_mul(self.effective_row_height())
            .saturating_sub(self.viewport_height)
    }
}

/// A row to render and where to place it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRow {
    pub index: usize,
    pub offset: usize,
}

/// The inclusive range of rows to render for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderWindow {
    pub start: usize,
    pub end: usize,
    pub total_height: usize,
    pub scroll_offset: usize,
    row_height: usize,
}

impl RenderWindow {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Rows in the window with their pixel offsets.
    pub fn rows(&self) -> impl Iterator<Item = VirtualRow> + '_ {
        (self.start..=self.end).map(move |index| VirtualRow {
            index,
            offset: index.saturating_mul(self.row_height),
        })
    }
}

/// Compute the render window for `total_rows` rows at `scroll_offset`.
///
/// Returns `None` when there are no rows. Offsets past the end are clamped
/// to the maximum scroll.
pub fn compute_window(
    total_rows: usize,
    config: &VirtualizerConfig,
    scroll_offset: usize,
) -> Option<RenderWindow> {
    if total_rows == 0 {
        return None;
    }

    let row_height = config.effective_row_height();
    let scroll_offset = scroll_offset.min(config.max_scroll(total_rows));
    let viewport = config.viewport_height.max(1);

    let first_visible = scroll_offset / row_height;
    let last_visible = scroll_offset.saturating_add(viewport - 1) / row_height;

    Some(RenderWindow {
        start: first_visible.saturating_sub(config.overscan),
        end: last_visible.saturating_add(config.overscan).min(total_rows - 1),
        total_height: total_rows.saturating_mul(row_height),
        scroll_offset,
        row_height,
    })
}

/// Smallest scroll adjustment that makes row `index` fully visible.
///
/// Returns `scroll_offset` unchanged when the row is already in view.
pub fn scroll_into_view(index: usize, scroll_offset: usize, config: &VirtualizerConfig) -> usize {
    let row_height = config.effective_row_height();
    let top = index.saturating_mul(row_height);
    let bottom = top.saturating_add(row_height);

    if top < scroll_offset {
        top
    } else if bottom > scroll_offset.saturating_add(config.viewport_height) {
        bottom.saturating_sub(config.viewport_height)
    } else {
        scroll_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(row_height: usize, viewport_height: usize, overscan: usize) -> VirtualizerConfig {
        VirtualizerConfig {
            row_height,
            viewport_height,
            overscan,
        }
    }

    #[test]
    fn test_empty_list_has_no_window() {
        assert_eq!(compute_window(0, &VirtualizerConfig::default(), 0), None);
    }

    #[test]
    fn test_window_at_top() {
        // 1000 rows of 48px, 600px viewport, overscan 5
        let window = compute_window(1000, &VirtualizerConfig::default(), 0).unwrap();
        assert_eq!((window.start, window.end), (0, 17));
        assert_eq!(window.total_height, 48_000);
        assert_eq!(window.len(), 18);
    }

    #[test]
    fn test_window_mid_list() {
        let window = compute_window(1000, &VirtualizerConfig::default(), 4800).unwrap();
        assert_eq!((window.start, window.end), (95, 117));
        let rows: Vec<VirtualRow> = window.rows().take(2).collect();
        assert_eq!(
            rows,
            vec![
                VirtualRow {
                    index: 95,
                    offset: 4560
                },
                VirtualRow {
                    index: 96,
                    offset: 4608
                },
            ]
        );
    }

    #[test]
    fn test_window_matches_closed_form() {
        let cfg = config(20, 95, 3);
        let n = 200;
        for s in (0..=cfg.max_scroll(n)).step_by(7) {
            let window = compute_window(n, &cfg, s).unwrap();
            let start = (s / 20).saturating_sub(3);
            let end = ((s + 95 - 1) / 20 + 3).min(n - 1);
            assert_eq!((window.start, window.end), (start, end), "scroll {s}");
        }
    }

    #[test]
    fn test_short_list_fits_entirely() {
        let window = compute_window(3, &VirtualizerConfig::default(), 0).unwrap();
        assert_eq!((window.start, window.end), (0, 2));
        assert_eq!(window.rows().count(), 3);
    }

    #[test]
    fn test_scroll_past_end_is_clamped() {
        let cfg = config(10, 100, 0);
        let window = compute_window(50, &cfg, 10_000).unwrap();
        assert_eq!(window.scroll_offset, 400);
        assert_eq!((window.start, window.end), (40, 49));
    }

    #[test]
    fn test_zero_row_height_is_one_pixel() {
        let cfg = config(0, 5, 0);
        let window = compute_window(100, &cfg, 10).unwrap();
        assert_eq!((window.start, window.end), (10, 14));
        assert_eq!(window.total_height, 100);
    }

    #[test]
    fn test_scroll_into_view() {
        let cfg = config(10, 50, 0);
        // already visible
        assert_eq!(scroll_into_view(2, 0, &cfg), 0);
        // below the viewport
        assert_eq!(scroll_into_view(7, 0, &cfg), 30);
        // above the viewport
        assert_eq!(scroll_into_view(1, 40, &cfg), 10);
        let window = compute_window(100, &cfg, scroll_into_view(42, 0, &cfg)).unwrap();
        assert!(window.contains(42));
    }

    #[test]
    fn test_huge_row_height_saturates() {
        let cfg = config(usize::MAX / 2, 600, 5);
        for scroll in [0, usize::MAX] {
            let window = compute_window(3, &cfg, scroll).unwrap();
            assert_eq!((window.start, window.end), (0, 2));
            assert_eq!(window.total_height, usize::MAX);
            assert_eq!(window.rows().last().unwrap().offset, usize::MAX - 1);
        }
        assert_eq!(scroll_into_view(2, 0, &cfg), usize::MAX - 600);
    }
}
