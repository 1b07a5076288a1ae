//! Aspect-ratio layout
//!
//! Fits media of known natural size into a container width and a maximum
//! height without distorting it.

use serde::{Deserialize, Serialize};

/// Fallback aspect ratio used when natural dimensions are unknown
pub const FALLBACK_ASPECT_RATIO: (u32, u32) = (16, 9);

/// Natural (intrinsic) size of a media resource in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    /// Natural width
    pub width: u32,
    /// Natural height
    pub height: u32,
}

impl Dimensions {
    /// Create dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides are non-zero
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height, or `None` for degenerate dimensions
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.is_valid().then(|| self.width as f64 / self.height as f64)
    }

    /// Lay these dimensions out in a container
    ///
    /// Returns `None` when either side is zero, which callers treat like a
    /// failed probe.
    pub fn layout_within(&self, container_width: u32, max_height: u32) -> Option<Layout> {
        self.is_valid()
            .then(|| compute_layout(self.width, self.height, container_width, max_height))
    }
}

/// Display size of a media element in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layout {
    /// Display width
    pub width: u32,
    /// Display height
    pub height: u32,
}

impl Layout {
    /// Create a layout
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Compute the display size of media inside a container
///
/// Portrait media (narrower than tall) is sized by height first and then
/// narrowed to the container if needed. Everything else takes the full
/// container width and is shortened to `max_height` if needed. Both sides
/// are rounded to the nearest pixel.
///
/// Zero natural dimensions cannot be laid out and produce the 16:9 fallback.
///
/// # Example
///
/// ```
/// use media_layout::{compute_layout, Layout};
///
/// assert_eq!(compute_layout(1920, 1080, 800, 540), Layout::new(800, 450));
/// assert_eq!(compute_layout(1080, 1920, 800, 540), Layout::new(304, 540));
/// ```
pub fn compute_layout(
    natural_width: u32,
    natural_height: u32,
    container_width: u32,
    max_height: u32,
) -> Layout {
    if natural_width == 0 || natural_height == 0 {
        return fallback_layout(container_width, max_height);
    }

    let ratio = natural_width as f64 / natural_height as f64;
    let container = container_width as f64;
    let max_h = max_height as f64;

    let (width, height) = if ratio < 1.0 {
        let height = max_h.min(container / ratio);
        let width = height * ratio;
        if width > container {
            (container, container / ratio)
        } else {
            (width, height)
        }
    } else {
        let height = container / ratio;
        if height > max_h {
            (max_h * ratio, max_h)
        } else {
            (container, height)
        }
    };

    Layout { width: to_pixels(width), height: to_pixels(height) }
}

/// 16:9 box at the container width, capped at `max_height`
pub fn fallback_layout(container_width: u32, max_height: u32) -> Layout {
    let (ratio_w, ratio_h) = FALLBACK_ASPECT_RATIO;
    let height = to_pixels(container_width as f64 * ratio_h as f64 / ratio_w as f64);
    Layout { width: container_width, height: height.min(max_height) }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_fills_width() {
        assert_eq!(compute_layout(1920, 1080, 800, 540), Layout::new(800, 450));
    }

    #[test]
    fn test_landscape_capped_by_height() {
        // 2:1 at 1200 wide would be 600 tall
        assert_eq!(compute_layout(2000, 1000, 1200, 540), Layout::new(1080, 540));
    }

    #[test]
    fn test_portrait_sized_by_height() {
        assert_eq!(compute_layout(1080, 1920, 800, 540), Layout::new(304, 540));
    }

    #[test]
    fn test_portrait_narrowed_to_container() {
        // 9:16 in a 100px container: 178px tall fits under 540
        assert_eq!(compute_layout(900, 1600, 100, 540), Layout::new(100, 178));
    }

    #[test]
    fn test_square_is_not_portrait() {
        assert_eq!(compute_layout(500, 500, 300, 540), Layout::new(300, 300));
        assert_eq!(compute_layout(500, 500, 800, 200), Layout::new(200, 200));
    }

    #[test]
    fn test_never_exceeds_bounds() {
        let cases = [(3000, 100), (100, 3000), (640, 480), (1, 1), (7, 3), (3, 7)];
        for (w, h) in cases {
            let layout = compute_layout(w, h, 400, 200);
            assert!(layout.width <= 400, "{w}x{h} -> {layout:?}");
            assert!(layout.height <= 200, "{w}x{h} -> {layout:?}");
        }
    }

    #[test]
    fn test_degenerate_input_does_not_panic() {
        assert_eq!(compute_layout(0, 1080, 800, 540), Layout::new(800, 450));
        assert_eq!(compute_layout(1920, 0, 800, 540), Layout::new(800, 450));
        assert_eq!(compute_layout(1920, 1080, 0, 540), Layout::new(0, 0));
        assert_eq!(compute_layout(u32::MAX, 1, 800, 540), Layout::new(800, 0));
    }

    #[test]
    fn test_fallback_layout() {
        assert_eq!(fallback_layout(800, 540), Layout::new(800, 450));
        assert_eq!(fallback_layout(1200, 540), Layout::new(1200, 540));
        assert_eq!(fallback_layout(400, 200), Layout::new(400, 200));
    }

    #[test]
    fn test_layout_within() {
        assert_eq!(Dimensions::new(1920, 1080).layout_within(800, 540), Some(Layout::new(800, 450)));
        assert_eq!(Dimensions::new(0, 1080).layout_within(800, 540), None);
        assert_eq!(Dimensions::new(1920, 1080).aspect_ratio(), Some(1920.0 / 1080.0));
        assert_eq!(Dimensions::default().aspect_ratio(), None);
    }
}
