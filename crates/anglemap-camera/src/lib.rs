//! Camera calibration data for angle/pixel mapping.
//!
//! This crate provides the static description of a physical camera as reported by
//! the platform camera stack, and the capability interface a mapper reads it through.
//!
//! # Key Components
//!
//! - **`CameraCharacteristics` trait**: The camera capability source
//! - **`IntrinsicCalibration`**: Focal lengths, principal point and skew
//! - **`DistortionCoefficients`**: Plumb-bob (radial-tangential) lens distortion
//! - **`ActiveArray`**: Sensor pixel rectangle, before or after distortion correction
//! - **`SensorRotation`**: Sensor orientation relative to the device's natural orientation
//! - **`StaticCamera`**: In-memory capability source
//!
//! # Coordinate Conventions
//!
//! All calibration values are expressed in the sensor's native pixel frame. When the
//! sensor is mounted at 90° or 270°, x and y are exchanged before the values are used
//! against a display in natural orientation; see [`IntrinsicCalibration::swapped_axes`]
//! and [`ActiveArray::swapped_axes`].

use std::sync::Arc;

pub mod active_array;
pub mod intrinsics;
pub mod rad_tan;
pub mod rotation;
pub mod static_camera;

pub use active_array::ActiveArray;
pub use intrinsics::IntrinsicCalibration;
pub use rad_tan::DistortionCoefficients;
pub use rotation::SensorRotation;
pub use static_camera::StaticCamera;

// ============================================================================
// Constants
// ============================================================================

/// Smallest zoom ratio a camera may report.
///
/// Ratios below this value (including zero) are clamped up to it.
pub const MIN_ZOOM_RATIO: f64 = 0.05;

/// Zoom ratio assumed when the camera cannot report one.
pub const DEFAULT_ZOOM_RATIO: f64 = 1.0;

/// Tolerance for float assertions in tests.
pub const PROJECTION_TEST_TOLERANCE: f64 = 1e-9;

/// Camera model errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CameraModelError {
    #[error("Sensor rotation must be 0, 90, 180 or 270 degrees, got {0}")]
    InvalidRotation(i32),
    #[error("Expected {expected} parameters, got {actual}")]
    InvalidParameterCount { expected: usize, actual: usize },
    #[error("Invalid camera parameters: {0}")]
    InvalidParams(String),
    #[error("Active array has zero or negative extent")]
    DegenerateActiveArray,
}

/// Validates that every value in `params` is finite.
pub fn validate_finite(params: &[f64], what: &str) -> Result<(), CameraModelError> {
    if params.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(CameraModelError::InvalidParams(format!(
            "{what} must be finite"
        )))
    }
}

/// Camera capability source.
///
/// Every accessor may report `None` when the platform does not expose the value.
/// Calibration, active arrays and distortion are assumed constant for the lifetime of
/// a camera session; the zoom ratio is live and may change between calls.
pub trait CameraCharacteristics: Send + Sync {
    /// Intrinsic calibration in the sensor's native frame.
    fn intrinsic_calibration(&self) -> Option<IntrinsicCalibration>;

    /// Active pixel array, before (`pre_correction = true`) or after distortion correction.
    fn active_array_size(&self, pre_correction: bool) -> Option<ActiveArray>;

    /// Lens distortion coefficients.
    fn distortion_correction(&self) -> Option<DistortionCoefficients>;

    /// Sensor mounting rotation.
    fn sensor_rotation(&self) -> SensorRotation;

    /// Current digital zoom ratio, unclamped.
    fn current_zoom_ratio(&self) -> Option<f64>;
}

impl<T: CameraCharacteristics + ?Sized> CameraCharacteristics for &T {
    fn intrinsic_calibration(&self) -> Option<IntrinsicCalibration> {
        (**self).intrinsic_calibration()
    }

    fn active_array_size(&self, pre_correction: bool) -> Option<ActiveArray> {
        (**self).active_array_size(pre_correction)
    }

    fn distortion_correction(&self) -> Option<DistortionCoefficients> {
        (**self).distortion_correction()
    }

    fn sensor_rotation(&self) -> SensorRotation {
        (**self).sensor_rotation()
    }

    fn current_zoom_ratio(&self) -> Option<f64> {
        (**self).current_zoom_ratio()
    }
}

impl<T: CameraCharacteristics + ?Sized> CameraCharacteristics for Arc<T> {
    fn intrinsic_calibration(&self) -> Option<IntrinsicCalibration> {
        (**self).intrinsic_calibration()
    }

    fn active_array_size(&self, pre_correction: bool) -> Option<ActiveArray> {
        (**self).active_array_size(pre_correction)
    }

    fn distortion_correction(&self) -> Option<DistortionCoefficients> {
        (**self).distortion_correction()
    }

    fn sensor_rotation(&self) -> SensorRotation {
        (**self).sensor_rotation()
    }

    fn current_zoom_ratio(&self) -> Option<f64> {
        (**self).current_zoom_ratio()
    }
}
