//! Angular and pixel coordinate types.
//!
//! Angles are in degrees throughout. Pixel coordinates live in the space of the
//! displayed image rectangle: origin top-left, y growing downward.

use anglemap_camera::{ActiveArray, IntrinsicCalibration};
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A viewing direction.
///
/// Bearing is measured clockwise in the horizontal plane, altitude is elevation above
/// the horizon. No range is enforced; callers should keep bearing in `[0, 360)` and
/// altitude in `[-90, 90]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleCoordinate {
    pub bearing: f64,
    pub altitude: f64,
}

impl AngleCoordinate {
    pub fn new(bearing: f64, altitude: f64) -> Self {
        Self { bearing, altitude }
    }

    /// Converts this direction at `distance` into a camera-frame point.
    ///
    /// Uses the bearing-first convention the calibrated projection is tuned to:
    ///
    /// ```text
    /// x = sin(bearing) · cos(altitude) · r
    /// y = cos(bearing) · sin(altitude) · r
    /// z = cos(bearing) · cos(altitude) · r
    /// ```
    pub fn to_cartesian(&self, distance: f64) -> Vector3<f64> {
        let (sin_b, cos_b) = self.bearing.to_radians().sin_cos();
        let (sin_a, cos_a) = self.altitude.to_radians().sin_cos();
        Vector3::new(
            sin_b * cos_a * distance,
            cos_b * sin_a * distance,
            cos_b * cos_a * distance,
        )
    }
}

impl fmt::Display for AngleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bearing={:.6} altitude={:.6}",
            self.bearing, self.altitude
        )
    }
}

/// A location in the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: f64,
    pub y: f64,
}

impl PixelCoordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vector2<f64>> for PixelCoordinate {
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<PixelCoordinate> for Vector2<f64> {
    fn from(p: PixelCoordinate) -> Self {
        Vector2::new(p.x, p.y)
    }
}

impl fmt::Display for PixelCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={:.3} y={:.3}", self.x, self.y)
    }
}

/// Angular extent of the displayed image, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub width: f64,
    pub height: f64,
}

impl FieldOfView {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Field of view covered by `array` under a pinhole camera with `calibration`.
    ///
    /// ```text
    /// width  = 2 · atan(array.width  / (2 · fx))
    /// height = 2 · atan(array.height / (2 · fy))
    /// ```
    pub fn from_calibration(calibration: &IntrinsicCalibration, array: &ActiveArray) -> Self {
        Self {
            width: (2.0 * (array.width() / (2.0 * calibration.fx)).atan()).to_degrees(),
            height: (2.0 * (array.height() / (2.0 * calibration.fy)).atan()).to_degrees(),
        }
    }
}

/// Axis-aligned rectangle on screen where the camera preview is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ImageRect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) * 0.5
    }

    /// Rectangle with the same centre, each side scaled by `factor`.
    pub fn scaled_about_center(&self, factor: f64) -> Self {
        let half_width = self.width() * factor * 0.5;
        let half_height = self.height() * factor * 0.5;
        let (cx, cy) = (self.center_x(), self.center_y());
        Self::new(
            cx - half_width,
            cy - half_height,
            cx + half_width,
            cy + half_height,
        )
    }

    pub fn contains(&self, pixel: PixelCoordinate) -> bool {
        pixel.x >= self.left && pixel.x <= self.right && pixel.y >= self.top && pixel.y <= self.bottom
    }
}
