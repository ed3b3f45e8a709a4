//! Intrinsic Calibration
//!
//! Pinhole intrinsics as reported by the camera stack, in the sensor's native frame.
//!
//! # Mathematical Model
//!
//! For a 3D point p = (x, y, z) in camera coordinates:
//!
//! ```text
//! u = fx · (x/z) + cx
//! v = fy · (y/z) + cy
//! ```
//!
//! The skew term is carried alongside for completeness but does not take part in
//! the projection.

use crate::{CameraModelError, validate_finite};
use serde::{Deserialize, Serialize};

/// Intrinsic calibration `[fx, fy, cx, cy, skew]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicCalibration {
    /// Focal length in x direction (pixels)
    pub fx: f64,
    /// Focal length in y direction (pixels)
    pub fy: f64,
    /// Principal point x-coordinate (pixels)
    pub cx: f64,
    /// Principal point y-coordinate (pixels)
    pub cy: f64,
    /// Axis skew
    #[serde(default)]
    pub skew: f64,
}

impl IntrinsicCalibration {
    /// Number of values in the platform representation.
    pub const PARAM_COUNT: usize = 5;

    /// Creates a calibration with zero skew.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            skew: 0.0,
        }
    }

    /// Sets the skew term.
    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }

    /// Builds a calibration from the platform's `[fx, fy, cx, cy, skew]` array.
    pub fn from_array(values: [f64; 5]) -> Self {
        let [fx, fy, cx, cy, skew] = values;
        Self {
            fx,
            fy,
            cx,
            cy,
            skew,
        }
    }

    /// Builds a calibration from a slice, which must hold exactly five values.
    pub fn from_slice(values: &[f64]) -> Result<Self, CameraModelError> {
        let array: [f64; 5] = values.try_into().map_err(|_| {
            CameraModelError::InvalidParameterCount {
                expected: Self::PARAM_COUNT,
                actual: values.len(),
            }
        })?;
        Ok(Self::from_array(array))
    }

    /// Returns the platform's `[fx, fy, cx, cy, skew]` array.
    pub fn to_array(&self) -> [f64; 5] {
        [self.fx, self.fy, self.cx, self.cy, self.skew]
    }

    /// Exchanges the x and y terms (`fx ↔ fy`, `cx ↔ cy`), leaving skew untouched.
    ///
    /// Used when the sensor is mounted at 90° or 270° to the device.
    pub fn swapped_axes(&self) -> Self {
        Self {
            fx: self.fy,
            fy: self.fx,
            cx: self.cy,
            cy: self.cx,
            skew: self.skew,
        }
    }

    /// Perspective-projects a camera-frame point without adding the principal point.
    ///
    /// Returns `None` for points at or behind the camera plane.
    pub fn project_centered(&self, x: f64, y: f64, z: f64) -> Option<(f64, f64)> {
        if z <= 0.0 {
            return None;
        }
        Some((self.fx * (x / z), self.fy * (y / z)))
    }

    /// Validates camera parameters.
    ///
    /// # Validation Rules
    ///
    /// - fx, fy must be positive (> 0)
    /// - cx, cy, skew must be finite
    pub fn validate(&self) -> Result<(), CameraModelError> {
        validate_finite(&self.to_array(), "Intrinsic calibration")?;
        if self.fx <= 0.0 || self.fy <= 0.0 {
            return Err(CameraModelError::InvalidParams(
                "Focal length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
