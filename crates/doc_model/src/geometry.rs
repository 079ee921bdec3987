//! Page-space geometry
//!
//! All coordinates are canvas units with the origin at the top-left corner of
//! the page, x growing right and y growing down.

use crate::{DocModelError, Result};
use serde::{Deserialize, Serialize};

/// Smallest width or height a block may have
pub const MIN_BLOCK_SIZE: f64 = 5.0;

/// Fixed page (canvas) dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// The planner canvas: 1536 x 2048 units
    pub const PLANNER: CanvasSize = CanvasSize {
        width: 1536.0,
        height: 2048.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Rectangle covering the whole page
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Pixel dimensions of a raster captured at the given density
    pub fn pixel_size(&self, density: f64) -> (u32, u32) {
        let w = (self.width * density).round().max(1.0) as u32;
        let h = (self.height * density).round().max(1.0) as u32;
        (w, h)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::PLANNER
    }
}

/// An axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Normalize a reported block geometry.
    ///
    /// Width and height are raised to [`MIN_BLOCK_SIZE`] and the origin is
    /// clamped to be non-negative. Non-finite input is rejected.
    pub fn sanitized(&self) -> Result<Rect> {
        if !self.is_finite() {
            return Err(DocModelError::InvalidGeometry(format!(
                "non-finite geometry {:?}",
                self
            )));
        }

        Ok(Rect {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
            width: self.width.max(MIN_BLOCK_SIZE),
            height: self.height.max(MIN_BLOCK_SIZE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_clamps_small_sizes() {
        let rect = Rect::new(10.0, 20.0, 1.0, 0.0).sanitized().unwrap();
        assert_eq!(rect.width, MIN_BLOCK_SIZE);
        assert_eq!(rect.height, MIN_BLOCK_SIZE);
        assert_eq!(rect.x, 10.0);
    }

    #[test]
    fn test_sanitize_rejects_nan() {
        assert!(Rect::new(f64::NAN, 0.0, 10.0, 10.0).sanitized().is_err());
        assert!(Rect::new(0.0, 0.0, f64::INFINITY, 10.0).sanitized().is_err());
    }

    #[test]
    fn test_pixel_size() {
        assert_eq!(CanvasSize::PLANNER.pixel_size(1.5), (2304, 3072));
    }

    proptest! {
        #[test]
        fn sanitized_rect_respects_minimums(
            x in -5000.0f64..5000.0,
            y in -5000.0f64..5000.0,
            w in -100.0f64..3000.0,
            h in -100.0f64..3000.0,
        ) {
            let rect = Rect::new(x, y, w, h).sanitized().unwrap();
            prop_assert!(rect.width >= MIN_BLOCK_SIZE);
            prop_assert!(rect.height >= MIN_BLOCK_SIZE);
            prop_assert!(rect.x >= 0.0);
            prop_assert!(rect.y >= 0.0);
        }
    }
}
