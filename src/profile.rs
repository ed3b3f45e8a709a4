//! Camera profile files.
//!
//! A profile captures what a camera reported on a device so that mappings can be
//! reproduced off-device. Every field is optional, mirroring the platform where any
//! characteristic may be unavailable:
//!
//! ```json
//! {
//!   "intrinsic_calibration": [1000.0, 1000.0, 500.0, 500.0, 0.0],
//!   "pre_correction_active_array": [0, 0, 1000, 1000],
//!   "active_array": [0, 0, 1000, 1000],
//!   "distortion": [0.0, 0.0, 0.0, 0.0, 0.0],
//!   "sensor_rotation": 90,
//!   "zoom_ratio": 1.0
//! }
//! ```

use crate::error::AngleMapResult;
use anglemap_camera::{
    ActiveArray, DistortionCoefficients, IntrinsicCalibration, SensorRotation, StaticCamera,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraProfile {
    /// `[fx, fy, cx, cy, skew]`
    pub intrinsic_calibration: Option<[f64; 5]>,
    pub pre_correction_active_array: Option<ActiveArray>,
    pub active_array: Option<ActiveArray>,
    /// `[k1, k2, p1, p2, k3]`
    pub distortion: Option<[f64; 5]>,
    pub sensor_rotation: SensorRotation,
    pub zoom_ratio: Option<f64>,
}

impl CameraProfile {
    /// Loads and validates a profile from a JSON file.
    pub fn load(path: &Path) -> AngleMapResult<Self> {
        let file = File::open(path)?;
        let profile: Self = serde_json::from_reader(BufReader::new(file))?;
        profile.validate()?;
        info!(
            path = %path.display(),
            rotation = %profile.sensor_rotation,
            calibrated = profile.intrinsic_calibration.is_some(),
            "loaded camera profile"
        );
        Ok(profile)
    }

    /// Parses and validates a profile from a JSON string.
    pub fn from_json(json: &str) -> AngleMapResult<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json(&self) -> AngleMapResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every present value; absent values are always valid.
    pub fn validate(&self) -> AngleMapResult<()> {
        if let Some(calibration) = self.calibration() {
            calibration.validate()?;
        }
        for array in [self.pre_correction_active_array, self.active_array]
            .into_iter()
            .flatten()
        {
            array.validate()?;
        }
        if let Some(distortion) = self.distortion {
            anglemap_camera::validate_finite(&distortion, "Distortion coefficients")?;
        }
        Ok(())
    }

    pub fn calibration(&self) -> Option<IntrinsicCalibration> {
        self.intrinsic_calibration.map(IntrinsicCalibration::from_array)
    }

    pub fn distortion_coefficients(&self) -> Option<DistortionCoefficients> {
        self.distortion.map(DistortionCoefficients::from_array)
    }

    /// Builds an in-memory camera reporting exactly what the profile holds.
    pub fn into_camera(self) -> StaticCamera {
        let mut camera = StaticCamera::new().with_rotation(self.sensor_rotation);
        if let Some(calibration) = self.calibration() {
            camera = camera.with_calibration(calibration);
        }
        if let Some(array) = self.pre_correction_active_array {
            camera = camera.with_pre_correction_array(array);
        }
        if let Some(array) = self.active_array {
            camera = camera.with_active_array(array);
        }
        if let Some(distortion) = self.distortion_coefficients() {
            camera = camera.with_distortion(distortion);
        }
        camera.set_zoom_ratio(self.zoom_ratio);
        camera
    }
}
