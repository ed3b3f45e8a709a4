//! Radial-Tangential Distortion
//!
//! The standard plumb-bob (Brown-Conrady) lens distortion model.
//!
//! # Mathematical Model
//!
//! For a normalized point (x, y):
//!
//! ```text
//! r² = x² + y²
//!
//! Radial distortion:
//! r' = 1 + k₁·r² + k₂·r⁴ + k₃·r⁶
//!
//! Tangential distortion:
//! dx = 2·p₁·x·y + p₂·(r² + 2·x²)
//! dy = p₁·(r² + 2·y²) + 2·p₂·x·y
//!
//! Distorted coordinates:
//! x' = r'·x + dx
//! y' = r'·y + dy
//! ```
//!
//! # References
//!
//! - Brown, "Decentering Distortion of Lenses", 1966
//! - OpenCV Camera Calibration Documentation

use crate::CameraModelError;
use serde::{Deserialize, Serialize};

/// Plumb-bob distortion coefficients, stored in `[k1, k2, p1, p2, k3]` order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DistortionCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl DistortionCoefficients {
    /// Number of values in the platform representation.
    pub const PARAM_COUNT: usize = 5;

    pub fn new(k1: f64, k2: f64, p1: f64, p2: f64, k3: f64) -> Self {
        Self { k1, k2, p1, p2, k3 }
    }

    /// Builds coefficients from a `[k1, k2, p1, p2, k3]` array.
    pub fn from_array(values: [f64; 5]) -> Self {
        let [k1, k2, p1, p2, k3] = values;
        Self { k1, k2, p1, p2, k3 }
    }

    /// Builds coefficients from a slice, which must hold exactly five values.
    pub fn from_slice(values: &[f64]) -> Result<Self, CameraModelError> {
        let array: [f64; 5] = values.try_into().map_err(|_| {
            CameraModelError::InvalidParameterCount {
                expected: Self::PARAM_COUNT,
                actual: values.len(),
            }
        })?;
        Ok(Self::from_array(array))
    }

    pub fn to_array(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    /// True when every coefficient is exactly zero.
    pub fn is_identity(&self) -> bool {
        self.to_array().iter().all(|&c| c == 0.0)
    }

    /// Applies the distortion model to a normalized point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;

        // Radial distortion: r' = 1 + k₁·r² + k₂·r⁴ + k₃·r⁶
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;

        // Tangential distortion
        let xy = x * y;
        let dx = 2.0 * self.p1 * xy + self.p2 * (r2 + 2.0 * x * x);
        let dy = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * xy;

        (radial * x + dx, radial * y + dy)
    }
}
