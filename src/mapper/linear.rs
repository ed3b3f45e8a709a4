//! Linear (field-of-view proportional) mapper.
//!
//! # Mathematical Model
//!
//! ```text
//! bearing  =  (x − centerX) / width  · fov.width
//! altitude = −(y − centerY) / height · fov.height
//! ```
//!
//! The sign flip on altitude accounts for pixel y growing downward while altitude
//! grows upward. The model ignores lens geometry entirely, so it is exact only at
//! the image centre, but it needs no calibration and always produces a result.

use super::AnglePixelMapper;
use crate::coords::{AngleCoordinate, FieldOfView, ImageRect, PixelCoordinate};

/// Stateless linear mapper; the universal fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearMapper;

impl AnglePixelMapper for LinearMapper {
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate {
        AngleCoordinate::new(
            (pixel.x - image_rect.center_x()) / image_rect.width() * fov.width,
            -(pixel.y - image_rect.center_y()) / image_rect.height() * fov.height,
        )
    }

    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        _distance: Option<f64>,
    ) -> PixelCoordinate {
        PixelCoordinate::new(
            image_rect.center_x() + angle.bearing / fov.width * image_rect.width(),
            image_rect.center_y() - angle.altitude / fov.height * image_rect.height(),
        )
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> (ImageRect, FieldOfView) {
        (
            ImageRect::from_size(1000.0, 1000.0),
            FieldOfView::new(60.0, 60.0),
        )
    }

    #[test]
    fn test_center_is_zero_angle() {
        let (rect, fov) = square();
        let angle = LinearMapper.angle(PixelCoordinate::new(500.0, 500.0), &rect, &fov);
        assert_eq!(angle, AngleCoordinate::new(0.0, 0.0));
    }

    #[test]
    fn test_right_edge_is_half_fov() {
        let (rect, fov) = square();
        let angle = LinearMapper.angle(PixelCoordinate::new(1000.0, 500.0), &rect, &fov);
        assert_relative_eq!(angle.bearing, 30.0);
        assert_relative_eq!(angle.altitude, 0.0);
    }

    #[test]
    fn test_up_is_positive_altitude() {
        let (rect, fov) = square();
        let angle = LinearMapper.angle(PixelCoordinate::new(500.0, 0.0), &rect, &fov);
        assert_relative_eq!(angle.altitude, 30.0);

        let pixel = LinearMapper.pixel(AngleCoordinate::new(0.0, -15.0), &rect, &fov, None);
        assert_relative_eq!(pixel.y, 750.0);
    }

    #[test]
    fn test_distance_is_ignored() {
        let (rect, fov) = square();
        let angle = AngleCoordinate::new(12.0, 7.0);
        assert_eq!(
            LinearMapper.pixel(angle, &rect, &fov, None),
            LinearMapper.pixel(angle, &rect, &fov, Some(250.0))
        );
    }

    #[test]
    fn test_roundtrip_offset_rect() {
        let rect = ImageRect::new(120.0, 40.0, 1080.0, 760.0);
        let fov = FieldOfView::new(66.0, 52.0);
        for (x, y) in [(120.0, 40.0), (600.0, 400.0), (1000.0, 700.0), (333.3, 512.5)] {
            let pixel = PixelCoordinate::new(x, y);
            let back = LinearMapper.pixel(LinearMapper.angle(pixel, &rect, &fov), &rect, &fov, None);
            assert_relative_eq!(back.x, x, epsilon = 1e-9);
            assert_relative_eq!(back.y, y, epsilon = 1e-9);
        }
    }
}
