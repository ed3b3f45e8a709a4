//! Sensor mounting rotation.

use crate::CameraModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clockwise rotation of the sensor's native frame relative to the device's
/// natural orientation.
///
/// Serialized as its value in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum SensorRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl SensorRotation {
    pub fn from_degrees(degrees: i32) -> Result<Self, CameraModelError> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(CameraModelError::InvalidRotation(other)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Whether the sensor's x/y axes are exchanged relative to the device.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

impl TryFrom<i32> for SensorRotation {
    type Error = CameraModelError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl From<SensorRotation> for i32 {
    fn from(rotation: SensorRotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for SensorRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
