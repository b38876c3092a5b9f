//! Pure scale/translation math for the viewer.
//!
//! Coordinates are viewport pixels with the origin at the viewport's top-left
//! corner. A [`Transform`] maps an image pixel `p` to `pan + p * scale`.

use super::{FIT_PADDING, MAX_SCALE, MIN_SCALE};

/// Floor for the fit scale when the viewport is smaller than its padding.
const MIN_FIT_SCALE: f32 = 0.01;

/// A point or offset in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Width and height of the viewport, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Natural (unscaled) pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Scale plus translation applied to the displayed image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub pan_x: f32,
    pub pan_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Transform {
    /// Image pixel under the viewport point `p`.
    pub fn to_image(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.scale, (p.y - self.pan_y) / self.scale)
    }

    /// Viewport point showing the image pixel `p`.
    pub fn to_viewport(&self, p: Point) -> Point {
        Point::new(self.pan_x + p.x * self.scale, self.pan_y + p.y * self.scale)
    }

    /// Rescales to `new_scale` keeping the image pixel under `pivot` in place.
    pub fn zoomed_about(&self, new_scale: f32, pivot: Point) -> Transform {
        let factor = new_scale / self.scale;
        Transform {
            scale: new_scale,
            pan_x: pivot.x - factor * (pivot.x - self.pan_x),
            pan_y: pivot.y - factor * (pivot.y - self.pan_y),
        }
    }

    /// `image` at `scale`, centered in `viewport`.
    pub fn centered(viewport: Viewport, image: ImageSize, scale: f32) -> Transform {
        Transform {
            scale,
            pan_x: (viewport.width - image.width as f32 * scale) / 2.0,
            pan_y: (viewport.height - image.height as f32 * scale) / 2.0,
        }
    }

    /// Zoom readout as an integer percentage.
    pub fn zoom_percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }
}

pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Largest scale (at most 1.0) at which `image` fits inside `viewport` minus
/// [`FIT_PADDING`] on each side.
pub fn fit_scale(viewport: Viewport, image: ImageSize) -> f32 {
    let fit_w = (viewport.width - FIT_PADDING * 2.0) / image.width as f32;
    let fit_h = (viewport.height - FIT_PADDING * 2.0) / image.height as f32;
    fit_w.min(fit_h).clamp(MIN_FIT_SCALE, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn fit_scale_for_wide_image() {
        let scale = fit_scale(Viewport::new(1000.0, 800.0), ImageSize::new(2000, 1000));
        assert!(close(scale, 0.46));
    }

    #[test]
    fn fit_scale_never_exceeds_native() {
        let scale = fit_scale(Viewport::new(1920.0, 1080.0), ImageSize::new(300, 200));
        assert_eq!(scale, 1.0);
    }

    #[test]
    fn fit_scale_stays_positive_in_tiny_viewport() {
        let scale = fit_scale(Viewport::new(50.0, 50.0), ImageSize::new(300, 200));
        assert!(scale > 0.0);
    }

    #[test]
    fn centered_splits_leftover_space() {
        let t = Transform::centered(Viewport::new(1000.0, 800.0), ImageSize::new(2000, 1000), 0.46);
        assert!(close(t.pan_x, 40.0));
        assert!(close(t.pan_y, 170.0));
    }

    #[test]
    fn zoom_about_keeps_pivot_pixel() {
        let start = Transform {
            scale: 0.8,
            pan_x: -37.0,
            pan_y: 112.5,
        };
        let pivot = Point::new(311.0, 207.0);
        let before = start.to_image(pivot);
        let after = start.zoomed_about(2.3, pivot);
        let back = after.to_viewport(before);
        assert!(close(back.x, pivot.x) && close(back.y, pivot.y));
    }

    #[test]
    fn zoom_percent_rounds() {
        let t = Transform {
            scale: 0.456,
            ..Transform::default()
        };
        assert_eq!(t.zoom_percent(), 46);
    }

    #[test]
    fn point_helpers() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(30.0, 40.0);
        assert_eq!(a.distance(b), 50.0);
        assert_eq!(a.midpoint(b), Point::new(15.0, 20.0));
    }
}
