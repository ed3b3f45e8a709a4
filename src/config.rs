//! Mapper configuration.

use anglemap_camera::MIN_ZOOM_RATIO;
use std::fmt;
use std::time::Duration;

/// Interval between zoom ratio refreshes.
pub const DEFAULT_ZOOM_REFRESH_INTERVAL: Duration = Duration::from_millis(20);

/// Distance used when the caller does not supply one.
pub const DEFAULT_DISTANCE: f64 = 1.0;

/// Configuration for [`CalibratedMapper`](crate::mapper::CalibratedMapper).
#[derive(Debug, Clone, PartialEq)]
pub struct MapperConfig {
    /// Apply the plumb-bob lens distortion model when coefficients are available
    pub apply_distortion_correction: bool,
    /// Minimum time between zoom ratio queries to the camera
    pub zoom_refresh_interval: Duration,
    /// Lower bound for the zoom ratio
    pub min_zoom_ratio: f64,
    /// Radial distance assumed for angles projected without one
    pub default_distance: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            apply_distortion_correction: true,
            zoom_refresh_interval: DEFAULT_ZOOM_REFRESH_INTERVAL,
            min_zoom_ratio: MIN_ZOOM_RATIO,
            default_distance: DEFAULT_DISTANCE,
        }
    }
}

impl MapperConfig {
    /// Create a new mapper configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable lens distortion correction
    pub fn with_distortion_correction(mut self, apply: bool) -> Self {
        self.apply_distortion_correction = apply;
        self
    }

    /// Set the zoom refresh interval
    pub fn with_zoom_refresh_interval(mut self, interval: Duration) -> Self {
        self.zoom_refresh_interval = interval;
        self
    }

    /// Set the zoom ratio lower bound
    pub fn with_min_zoom_ratio(mut self, min_zoom_ratio: f64) -> Self {
        self.min_zoom_ratio = min_zoom_ratio;
        self
    }

    /// Set the default projection distance
    pub fn with_default_distance(mut self, distance: f64) -> Self {
        self.default_distance = distance;
        self
    }
}

impl fmt::Display for MapperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MapperConfig {{ apply_distortion_correction: {}, zoom_refresh_interval: {:?}, min_zoom_ratio: {}, default_distance: {} }}",
            self.apply_distortion_correction,
            self.zoom_refresh_interval,
            self.min_zoom_ratio,
            self.default_distance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MapperConfig::default();
        assert!(config.apply_distortion_correction);
        assert_eq!(config.zoom_refresh_interval, Duration::from_millis(20));
        assert_eq!(config.min_zoom_ratio, 0.05);
        assert_eq!(config.default_distance, 1.0);
    }

    #[test]
    fn test_builder() {
        let config = MapperConfig::new()
            .with_distortion_correction(false)
            .with_zoom_refresh_interval(Duration::from_millis(5))
            .with_min_zoom_ratio(0.5)
            .with_default_distance(10.0);
        assert!(!config.apply_distortion_correction);
        assert_eq!(config.zoom_refresh_interval, Duration::from_millis(5));
        assert_eq!(config.min_zoom_ratio, 0.5);
        assert_eq!(config.default_distance, 10.0);
        assert!(config.to_string().contains("apply_distortion_correction: false"));
    }
}
