//! Padding and the plot rectangle it leaves inside a target.

use serde::{Deserialize, Serialize};

/// Margins in pixels between the target edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub const fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Plot rectangle in target coordinates.
///
/// Computed in signed arithmetic, so padding larger than the target yields a
/// zero or negative extent instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotArea {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Full target width.
    pub target_width: i32,
    /// Full target height.
    pub target_height: i32,
}

impl PlotArea {
    pub fn new(target_width: u32, target_height: u32, padding: &Padding) -> Self {
        let w = target_width as i64;
        let h = target_height as i64;
        let width = w - padding.left as i64 - padding.right as i64;
        let height = h - padding.top as i64 - padding.bottom as i64;
        Self {
            left: saturate(padding.left as i64),
            top: saturate(padding.top as i64),
            width: saturate(width),
            height: saturate(height),
            target_width: saturate(w),
            target_height: saturate(h),
        }
    }

    /// x of the right edge.
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    /// y of the bottom edge, where the x axis sits.
    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }

    /// Whether there is any room to draw a body.
    pub fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_area_subtracts_padding() {
        let area = PlotArea::new(800, 400, &Padding::new(20, 20, 40, 60));
        assert_eq!(area.left, 60);
        assert_eq!(area.top, 20);
        assert_eq!(area.width, 720);
        assert_eq!(area.height, 340);
        assert_eq!(area.right(), 780);
        assert_eq!(area.bottom(), 360);
        assert!(area.is_drawable());
    }

    #[test]
    fn test_padding_larger_than_target() {
        let area = PlotArea::new(10, 10, &Padding::new(20, 20, 40, 60));
        assert_eq!(area.width, -70);
        assert_eq!(area.height, -50);
        assert!(!area.is_drawable());
    }

    #[test]
    fn test_exact_fit_is_not_drawable() {
        let area = PlotArea::new(80, 60, &Padding::new(20, 20, 40, 60));
        assert_eq!(area.width, 0);
        assert!(!area.is_drawable());
    }
}
