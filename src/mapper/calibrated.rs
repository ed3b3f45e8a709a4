//! Calibrated (pinhole + plumb-bob distortion) mapper.
//!
//! # Mathematical Model
//!
//! ## Projection (angle → pixel)
//!
//! ```text
//! (x, y, z) = (sin b·cos a, cos b·sin a, cos b·cos a) · r
//!
//! preX = fx · x/z,   preY = fy · y/z
//!
//! nx = preX / (W_pre/2),   ny = preY / (H_pre/2)
//! (dx, dy) = plumb_bob(nx, ny)                      // when distortion is applied
//! sx = dx · W_pre/2 + cx,  sy = dy · H_pre/2 + cy
//!
//! u = (sx − left_post) / W_post
//! v = (H_post − (sy − top_post)) / H_post
//!
//! zoomed = image rect scaled by zoom about its centre
//! pixel = (zoomed.left + u · zoomed.width, zoomed.top + v · zoomed.height)
//! ```
//!
//! Normalizing by the pre-correction array centre assumes the optical centre sits at
//! the array centre. This is an approximation; cameras with a strongly off-centre
//! principal point see a small error toward the edges when distortion is applied.
//!
//! ## Unprojection (pixel → angle)
//!
//! Not modelled. [`AnglePixelMapper::angle`] always delegates to the fallback mapper.
//!
//! # Fallbacks
//!
//! - Points at or behind the camera plane (z ≤ 0) use [`LinearMapper`].
//! - Missing calibration or active arrays use the configured fallback mapper.
//! - Missing distortion coefficients skip distortion correction.
//! - A missing zoom ratio is treated as 1.0.

use super::{AnglePixelMapper, LinearMapper};
use crate::config::MapperConfig;
use crate::coords::{AngleCoordinate, FieldOfView, ImageRect, PixelCoordinate};
use crate::zoom::{Clock, SystemClock, ZoomCache};
use anglemap_camera::{
    ActiveArray, CameraCharacteristics, DistortionCoefficients, IntrinsicCalibration,
};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, trace, warn};

/// Mapper using the camera's physical calibration, decorating a fallback mapper.
///
/// Calibration, active arrays and distortion coefficients are read from the camera
/// once, on first use, and kept for the mapper's lifetime. The zoom ratio is re-read
/// at most once per [`MapperConfig::zoom_refresh_interval`].
///
/// # Example
///
/// ```
/// use anglemap::{AngleCoordinate, AnglePixelMapper, CalibratedMapper, FieldOfView, ImageRect};
/// use anglemap_camera::{ActiveArray, IntrinsicCalibration, StaticCamera};
///
/// let camera = StaticCamera::new()
///     .with_calibration(IntrinsicCalibration::new(1000.0, 1000.0, 500.0, 500.0))
///     .with_active_arrays(ActiveArray::from_size(1000, 1000), ActiveArray::from_size(1000, 1000));
/// let mapper = CalibratedMapper::new(camera);
///
/// let rect = ImageRect::from_size(1000.0, 1000.0);
/// let fov = FieldOfView::new(60.0, 60.0);
/// let pixel = mapper.pixel(AngleCoordinate::new(0.0, 0.0), &rect, &fov, None);
/// assert!((pixel.x - 500.0).abs() < 1e-9 && (pixel.y - 500.0).abs() < 1e-9);
/// ```
#[derive(Debug)]
pub struct CalibratedMapper<S, F = LinearMapper> {
    source: S,
    fallback: F,
    config: MapperConfig,
    clock: Arc<dyn Clock>,
    calibration: OnceLock<Option<IntrinsicCalibration>>,
    pre_correction_array: OnceLock<Option<ActiveArray>>,
    active_array: OnceLock<Option<ActiveArray>>,
    distortion: OnceLock<Option<DistortionCoefficients>>,
    zoom: Mutex<ZoomCache>,
}

impl<S: CameraCharacteristics> CalibratedMapper<S, LinearMapper> {
    /// Creates a mapper over `source` falling back to [`LinearMapper`].
    pub fn new(source: S) -> Self {
        Self::with_fallback(source, LinearMapper)
    }
}

impl<S: CameraCharacteristics, F: AnglePixelMapper> CalibratedMapper<S, F> {
    /// Creates a mapper over `source` that hands unsupported requests to `fallback`.
    pub fn with_fallback(source: S, fallback: F) -> Self {
        let config = MapperConfig::default();
        let zoom = ZoomCache::new(config.zoom_refresh_interval, config.min_zoom_ratio);
        Self {
            source,
            fallback,
            config,
            clock: Arc::new(SystemClock),
            calibration: OnceLock::new(),
            pre_correction_array: OnceLock::new(),
            active_array: OnceLock::new(),
            distortion: OnceLock::new(),
            zoom: Mutex::new(zoom),
        }
    }

    /// Replaces the configuration. Resets the zoom cache.
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.zoom = Mutex::new(ZoomCache::new(
            config.zoom_refresh_interval,
            config.min_zoom_ratio,
        ));
        self.config = config;
        self
    }

    /// Replaces the time source used for zoom refreshes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }

    /// Intrinsic calibration in device-natural orientation.
    ///
    /// Fetched once; x/y terms are exchanged when the sensor is mounted at 90° or 270°.
    /// A calibration with non-positive or non-finite values is treated as absent.
    pub fn calibration(&self) -> Option<IntrinsicCalibration> {
        *self.calibration.get_or_init(|| {
            let rotation = self.source.sensor_rotation();
            let calibration = self.source.intrinsic_calibration()?;
            if let Err(err) = calibration.validate() {
                warn!(%err, "ignoring intrinsic calibration");
                return None;
            }
            let calibration = if rotation.swaps_axes() {
                calibration.swapped_axes()
            } else {
                calibration
            };
            debug!(
                %rotation,
                swapped = rotation.swaps_axes(),
                ?calibration,
                "cached intrinsic calibration"
            );
            Some(calibration)
        })
    }

    /// Active array in device-natural orientation, pre- or post-distortion-correction.
    ///
    /// Fetched once per kind; axes are exchanged when the sensor is mounted at 90° or
    /// 270°. An array without positive area is treated as absent.
    pub fn active_array(&self, pre_correction: bool) -> Option<ActiveArray> {
        let cell = if pre_correction {
            &self.pre_correction_array
        } else {
            &self.active_array
        };
        *cell.get_or_init(|| {
            let rotation = self.source.sensor_rotation();
            let array = self.source.active_array_size(pre_correction)?;
            if let Err(err) = array.validate() {
                warn!(%err, pre_correction, "ignoring active array");
                return None;
            }
            let array = if rotation.swaps_axes() {
                array.swapped_axes()
            } else {
                array
            };
            debug!(pre_correction, ?array, "cached active array");
            Some(array)
        })
    }

    /// Lens distortion coefficients, fetched once. Not affected by sensor rotation.
    pub fn distortion(&self) -> Option<DistortionCoefficients> {
        *self.distortion.get_or_init(|| {
            let distortion = self.source.distortion_correction();
            debug!(?distortion, "cached distortion coefficients");
            distortion
        })
    }

    /// Current zoom ratio, re-read from the camera at most once per refresh interval.
    pub fn zoom_ratio(&self) -> f64 {
        let now = self.clock.now();
        let mut zoom = self
            .zoom
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        zoom.ratio(now, || self.source.current_zoom_ratio())
    }

    /// Field of view of the post-correction active array under the cached calibration.
    pub fn calibrated_field_of_view(&self) -> Option<FieldOfView> {
        let calibration = self.calibration()?;
        let array = self.active_array(false)?;
        Some(FieldOfView::from_calibration(&calibration, &array))
    }

    /// Drops every cached camera value so the next projection re-reads the camera.
    pub fn invalidate_calibration(&mut self) {
        self.calibration.take();
        self.pre_correction_array.take();
        self.active_array.take();
        self.distortion.take();
        self.zoom
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .invalidate();
        debug!("invalidated cached camera characteristics");
    }

    /// Sensor-pixel position of a camera-frame point with z > 0.
    fn project_to_sensor(
        &self,
        (x, y, z): (f64, f64, f64),
        calibration: &IntrinsicCalibration,
        pre_array: &ActiveArray,
    ) -> Option<(f64, f64)> {
        let (pre_x, pre_y) = calibration.project_centered(x, y, z)?;

        let distortion = if self.config.apply_distortion_correction {
            self.distortion()
        } else {
            None
        };

        let (sensor_x, sensor_y) = match distortion {
            Some(coefficients) => {
                let half_width = pre_array.width() * 0.5;
                let half_height = pre_array.height() * 0.5;
                let (dx, dy) = coefficients.apply(pre_x / half_width, pre_y / half_height);
                (dx * half_width, dy * half_height)
            }
            None => (pre_x, pre_y),
        };

        Some((sensor_x + calibration.cx, sensor_y + calibration.cy))
    }
}

impl<S: CameraCharacteristics, F: AnglePixelMapper> AnglePixelMapper for CalibratedMapper<S, F> {
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate {
        self.fallback.angle(pixel, image_rect, fov)
    }

    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> PixelCoordinate {
        let point = angle.to_cartesian(distance.unwrap_or(self.config.default_distance));
        if point.z <= 0.0 {
            trace!(%angle, z = point.z, "behind camera plane, using linear mapping");
            return LinearMapper.pixel(angle, image_rect, fov, distance);
        }

        let (Some(calibration), Some(pre_array), Some(post_array)) = (
            self.calibration(),
            self.active_array(true),
            self.active_array(false),
        ) else {
            trace!(%angle, fallback = self.fallback.name(), "camera data unavailable");
            return self.fallback.pixel(angle, image_rect, fov, distance);
        };

        let Some((sensor_x, sensor_y)) =
            self.project_to_sensor((point.x, point.y, point.z), &calibration, &pre_array)
        else {
            return LinearMapper.pixel(angle, image_rect, fov, distance);
        };

        // Post-correction array frame, y measured from the bottom edge.
        let local_x = sensor_x - f64::from(post_array.left);
        let local_y = post_array.height() - (sensor_y - f64::from(post_array.top));
        let fraction_x = local_x / post_array.width();
        let fraction_y = local_y / post_array.height();

        let unzoomed = image_rect.scaled_about_center(self.zoom_ratio());
        PixelCoordinate::new(
            unzoomed.left + fraction_x * unzoomed.width(),
            unzoomed.top + fraction_y * unzoomed.height(),
        )
    }

    fn name(&self) -> &'static str {
        "calibrated"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zoom::ManualClock;
    use anglemap_camera::{SensorRotation, StaticCamera};
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn optical_center_camera() -> StaticCamera {
        StaticCamera::new()
            .with_calibration(IntrinsicCalibration::new(1000.0, 1000.0, 500.0, 500.0))
            .with_active_arrays(
                ActiveArray::from_size(1000, 1000),
                ActiveArray::from_size(1000, 1000),
            )
            .with_distortion(DistortionCoefficients::default())
            .with_zoom_ratio(1.0)
    }

    fn square() -> (ImageRect, FieldOfView) {
        (
            ImageRect::from_size(1000.0, 1000.0),
            FieldOfView::new(60.0, 60.0),
        )
    }

    #[test]
    fn test_optical_center_alignment() {
        let mapper = CalibratedMapper::new(optical_center_camera());
        let (rect, fov) = square();
        let pixel = mapper.pixel(AngleCoordinate::new(0.0, 0.0), &rect, &fov, Some(1.0));
        assert_relative_eq!(pixel.x, 500.0, epsilon = 1e-9);
        assert_relative_eq!(pixel.y, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_direction_signs_match_screen() {
        let mapper = CalibratedMapper::new(optical_center_camera());
        let (rect, fov) = square();

        let right = mapper.pixel(AngleCoordinate::new(10.0, 0.0), &rect, &fov, None);
        assert!(right.x > 500.0);
        assert_relative_eq!(right.y, 500.0, epsilon = 1e-9);
        // x = fx · tan(bearing) at zero altitude
        assert_relative_eq!(right.x, 500.0 + 1000.0 * 10f64.to_radians().tan(), epsilon = 1e-9);

        let up = mapper.pixel(AngleCoordinate::new(0.0, 10.0), &rect, &fov, None);
        assert!(up.y < 500.0);
        assert_relative_eq!(up.x, 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_behind_camera_uses_linear() {
        let mapper = CalibratedMapper::new(optical_center_camera());
        let (rect, fov) = square();
        for angle in [
            AngleCoordinate::new(180.0, 0.0),
            AngleCoordinate::new(120.0, 30.0),
            AngleCoordinate::new(90.0, 0.0),
        ] {
            assert_eq!(
                mapper.pixel(angle, &rect, &fov, None),
                LinearMapper.pixel(angle, &rect, &fov, None)
            );
        }
    }

    #[test]
    fn test_missing_calibration_uses_fallback() {
        let camera = StaticCamera::new().with_active_arrays(
            ActiveArray::from_size(1000, 1000),
            ActiveArray::from_size(1000, 1000),
        );
        let mapper = CalibratedMapper::new(camera);
        let (rect, fov) = square();
        let angle = AngleCoordinate::new(10.0, 5.0);
        assert_eq!(
            mapper.pixel(angle, &rect, &fov, None),
            LinearMapper.pixel(angle, &rect, &fov, None)
        );
    }

    #[test]
    fn test_degenerate_array_is_absent() {
        let camera = StaticCamera::new()
            .with_calibration(IntrinsicCalibration::new(1000.0, 1000.0, 500.0, 500.0))
            .with_active_arrays(ActiveArray::from_size(1000, 1000), ActiveArray::from_size(0, 0));
        let mapper = CalibratedMapper::new(camera);
        assert!(mapper.active_array(false).is_none());
        assert!(mapper.active_array(true).is_some());
    }

    #[test]
    fn test_rotation_swaps_cached_values() {
        let camera = StaticCamera::new()
            .with_calibration(IntrinsicCalibration::from_array([1000.0, 900.0, 480.0, 640.0, 0.0]))
            .with_active_arrays(ActiveArray::new(0, 0, 960, 1280), ActiveArray::new(4, 8, 956, 1272))
            .with_rotation(SensorRotation::Deg270);
        let mapper = CalibratedMapper::new(camera);

        let calibration = mapper.calibration().map(|c| c.to_array());
        assert_eq!(calibration, Some([900.0, 1000.0, 640.0, 480.0, 0.0]));
        // Reading twice must not swap back.
        assert_eq!(mapper.calibration().map(|c| c.to_array()), calibration);
        assert_eq!(mapper.active_array(true), Some(ActiveArray::new(0, 0, 1280, 960)));
        assert_eq!(mapper.active_array(false), Some(ActiveArray::new(8, 4, 1272, 956)));
    }

    #[test]
    fn test_zoom_scales_about_center() {
        let camera = optical_center_camera();
        let mapper = CalibratedMapper::new(&camera);
        let (rect, fov) = square();
        let angle = AngleCoordinate::new(10.0, -5.0);
        let unzoomed = mapper.pixel(angle, &rect, &fov, None);

        camera.set_zoom_ratio(Some(2.0));
        let clock = Arc::new(ManualClock::new());
        let mapper = CalibratedMapper::new(&camera).with_clock(clock);
        let zoomed = mapper.pixel(angle, &rect, &fov, None);

        assert_relative_eq!(zoomed.x - 500.0, 2.0 * (unzoomed.x - 500.0), epsilon = 1e-9);
        assert_relative_eq!(zoomed.y - 500.0, 2.0 * (unzoomed.y - 500.0), epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_refresh_interval() {
        let camera = optical_center_camera();
        let clock = Arc::new(ManualClock::new());
        let mapper = CalibratedMapper::new(&camera).with_clock(clock.clone());

        assert_eq!(mapper.zoom_ratio(), 1.0);
        camera.set_zoom_ratio(Some(3.0));
        clock.advance(Duration::from_millis(10));
        assert_eq!(mapper.zoom_ratio(), 1.0);
        clock.advance(Duration::from_millis(10));
        assert_eq!(mapper.zoom_ratio(), 3.0);

        camera.set_zoom_ratio(Some(0.0));
        clock.advance(Duration::from_millis(20));
        assert_eq!(mapper.zoom_ratio(), 0.05);

        camera.set_zoom_ratio(None);
        clock.advance(Duration::from_millis(20));
        assert_eq!(mapper.zoom_ratio(), 1.0);
    }

    #[test]
    fn test_distortion_toggle_matches_zero_coefficients() {
        let distorted = StaticCamera::new()
            .with_calibration(IntrinsicCalibration::new(1200.0, 1100.0, 510.0, 490.0))
            .with_active_arrays(
                ActiveArray::from_size(1000, 1000),
                ActiveArray::from_size(1000, 1000),
            )
            .with_distortion(DistortionCoefficients::new(0.12, -0.03, 0.001, -0.002, 0.01));
        let disabled = CalibratedMapper::new(&distorted)
            .with_config(MapperConfig::new().with_distortion_correction(false));
        let zero = CalibratedMapper::new(optical_center_camera_with(
            IntrinsicCalibration::new(1200.0, 1100.0, 510.0, 490.0),
        ));
        let enabled = CalibratedMapper::new(&distorted);
        let (rect, fov) = square();

        let angle = AngleCoordinate::new(12.0, -8.0);
        let a = disabled.pixel(angle, &rect, &fov, None);
        let b = zero.pixel(angle, &rect, &fov, None);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);

        let c = enabled.pixel(angle, &rect, &fov, None);
        assert!((c.x - a.x).abs() > 1e-3);
    }

    fn optical_center_camera_with(calibration: IntrinsicCalibration) -> StaticCamera {
        StaticCamera::new()
            .with_calibration(calibration)
            .with_active_arrays(
                ActiveArray::from_size(1000, 1000),
                ActiveArray::from_size(1000, 1000),
            )
            .with_distortion(DistortionCoefficients::default())
    }

    #[test]
    fn test_angle_delegates_to_fallback() {
        let mapper = CalibratedMapper::new(optical_center_camera());
        let (rect, fov) = square();
        let pixel = PixelCoordinate::new(1000.0, 500.0);
        assert_eq!(
            mapper.angle(pixel, &rect, &fov),
            LinearMapper.angle(pixel, &rect, &fov)
        );
    }

    #[test]
    fn test_invalidate_rereads_camera() {
        let mut mapper = CalibratedMapper::new(Arc::new(optical_center_camera()));
        assert!(mapper.calibration().is_some());
        mapper.invalidate_calibration();
        assert!(mapper.calibration().is_some());
        assert!(mapper.distortion().is_some());
    }

    #[test]
    fn test_calibrated_field_of_view() {
        let mapper = CalibratedMapper::new(optical_center_camera());
        let fov = mapper.calibrated_field_of_view();
        let expected = (2.0 * 0.5f64.atan()).to_degrees();
        assert_relative_eq!(fov.map_or(0.0, |f| f.width), expected, epsilon = 1e-9);
        assert!(CalibratedMapper::new(StaticCamera::new()).calibrated_field_of_view().is_none());
    }
}
