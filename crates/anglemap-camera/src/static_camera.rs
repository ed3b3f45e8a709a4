//! In-memory camera capability source.

use crate::{
    ActiveArray, CameraCharacteristics, DistortionCoefficients, IntrinsicCalibration,
    SensorRotation,
};
use std::sync::RwLock;

/// Camera whose characteristics are fixed at construction, apart from the zoom ratio
/// which can be updated through a shared reference.
///
/// # Example
///
/// ```
/// use anglemap_camera::{ActiveArray, CameraCharacteristics, IntrinsicCalibration, StaticCamera};
///
/// let camera = StaticCamera::new()
///     .with_calibration(IntrinsicCalibration::new(1000.0, 1000.0, 500.0, 500.0))
///     .with_active_arrays(ActiveArray::from_size(1000, 1000), ActiveArray::from_size(1000, 1000));
///
/// assert!(camera.intrinsic_calibration().is_some());
/// camera.set_zoom_ratio(Some(2.0));
/// assert_eq!(camera.current_zoom_ratio(), Some(2.0));
/// ```
#[derive(Debug, Default)]
pub struct StaticCamera {
    calibration: Option<IntrinsicCalibration>,
    pre_correction_array: Option<ActiveArray>,
    active_array: Option<ActiveArray>,
    distortion: Option<DistortionCoefficients>,
    rotation: SensorRotation,
    zoom_ratio: RwLock<Option<f64>>,
}

impl StaticCamera {
    /// Camera reporting nothing: every optional characteristic is `None`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calibration(mut self, calibration: IntrinsicCalibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    /// Sets the pre-correction and post-correction active arrays.
    pub fn with_active_arrays(mut self, pre_correction: ActiveArray, active: ActiveArray) -> Self {
        self.pre_correction_array = Some(pre_correction);
        self.active_array = Some(active);
        self
    }

    pub fn with_pre_correction_array(mut self, array: ActiveArray) -> Self {
        self.pre_correction_array = Some(array);
        self
    }

    pub fn with_active_array(mut self, array: ActiveArray) -> Self {
        self.active_array = Some(array);
        self
    }

    pub fn with_distortion(mut self, distortion: DistortionCoefficients) -> Self {
        self.distortion = Some(distortion);
        self
    }

    pub fn with_rotation(mut self, rotation: SensorRotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_zoom_ratio(self, zoom_ratio: f64) -> Self {
        self.set_zoom_ratio(Some(zoom_ratio));
        self
    }

    /// Updates the live zoom ratio; `None` models a camera that stopped reporting it.
    pub fn set_zoom_ratio(&self, zoom_ratio: Option<f64>) {
        match self.zoom_ratio.write() {
            Ok(mut guard) => *guard = zoom_ratio,
            Err(poisoned) => *poisoned.into_inner() = zoom_ratio,
        }
    }
}

impl CameraCharacteristics for StaticCamera {
    fn intrinsic_calibration(&self) -> Option<IntrinsicCalibration> {
        self.calibration
    }

    fn active_array_size(&self, pre_correction: bool) -> Option<ActiveArray> {
        if pre_correction {
            self.pre_correction_array
        } else {
            self.active_array
        }
    }

    fn distortion_correction(&self) -> Option<DistortionCoefficients> {
        self.distortion
    }

    fn sensor_rotation(&self) -> SensorRotation {
        self.rotation
    }

    fn current_zoom_ratio(&self) -> Option<f64> {
        match self.zoom_ratio.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_camera() {
        let camera = StaticCamera::new();
        assert!(camera.intrinsic_calibration().is_none());
        assert!(camera.active_array_size(true).is_none());
        assert!(camera.active_array_size(false).is_none());
        assert!(camera.distortion_correction().is_none());
        assert!(camera.current_zoom_ratio().is_none());
        assert_eq!(camera.sensor_rotation(), SensorRotation::Deg0);
    }

    #[test]
    fn test_arrays_are_distinct() {
        let camera = StaticCamera::new().with_active_arrays(
            ActiveArray::from_size(4000, 3000),
            ActiveArray::new(8, 8, 3992, 2992),
        );
        assert_eq!(
            camera.active_array_size(true),
            Some(ActiveArray::from_size(4000, 3000))
        );
        assert_eq!(
            camera.active_array_size(false),
            Some(ActiveArray::new(8, 8, 3992, 2992))
        );
    }

    #[test]
    fn test_live_zoom_updates() {
        let camera = StaticCamera::new().with_zoom_ratio(1.5);
        assert_eq!(camera.current_zoom_ratio(), Some(1.5));
        camera.set_zoom_ratio(None);
        assert_eq!(camera.current_zoom_ratio(), None);
    }
}
