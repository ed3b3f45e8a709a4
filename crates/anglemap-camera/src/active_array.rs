//! Sensor active pixel arrays.

use crate::CameraModelError;
use serde::{Deserialize, Serialize};

/// Rectangle of sensor pixels actually used for capture.
///
/// Serialized as `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct ActiveArray {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ActiveArray {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Array of the given size anchored at the sensor origin.
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> f64 {
        f64::from(self.right) - f64::from(self.left)
    }

    pub fn height(&self) -> f64 {
        f64::from(self.bottom) - f64::from(self.top)
    }

    /// Exchanges the axes: `(left, top, right, bottom)` becomes `(top, left, bottom, right)`.
    pub fn swapped_axes(&self) -> Self {
        Self::new(self.top, self.left, self.bottom, self.right)
    }

    /// Rejects arrays without a positive area.
    pub fn validate(&self) -> Result<(), CameraModelError> {
        if self.right <= self.left || self.bottom <= self.top {
            return Err(CameraModelError::DegenerateActiveArray);
        }
        Ok(())
    }
}

impl From<[i32; 4]> for ActiveArray {
    fn from([left, top, right, bottom]: [i32; 4]) -> Self {
        Self::new(left, top, right, bottom)
    }
}

impl From<ActiveArray> for [i32; 4] {
    fn from(array: ActiveArray) -> Self {
        [array.left, array.top, array.right, array.bottom]
    }
}
