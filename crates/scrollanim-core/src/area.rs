//! Visible document rectangle.

use crate::provider::ViewportProvider;

/// The rectangle currently visible in the viewport, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportArea {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl ViewportArea {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Build the active area from the provider's scroll offsets and size.
///
/// Never fails; a provider reporting zero dimensions yields an empty rectangle.
pub fn compute_active_area(viewport: &dyn ViewportProvider) -> ViewportArea {
    let y_min = viewport.scroll_top();
    let x_min = viewport.scroll_left();
    ViewportArea {
        x_min,
        y_min,
        x_max: x_min + viewport.viewport_width(),
        y_max: y_min + viewport.viewport_height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedViewport;

    impl ViewportProvider for FixedViewport {
        fn scroll_top(&self) -> f64 {
            120.0
        }
        fn scroll_left(&self) -> f64 {
            10.0
        }
        fn viewport_width(&self) -> f64 {
            1024.0
        }
        fn viewport_height(&self) -> f64 {
            768.0
        }
    }

    #[test]
    fn test_active_area_from_provider() {
        let area = compute_active_area(&FixedViewport);
        assert_eq!(area, ViewportArea::new(10.0, 120.0, 1034.0, 888.0));
        assert_eq!(area.width(), 1024.0);
        assert_eq!(area.height(), 768.0);
    }
}
