//! Angle ↔ pixel mappers.
//!
//! # Key Components
//!
//! - **`AnglePixelMapper` trait**: Interface shared by every mapping strategy
//! - **`LinearMapper`**: Calibration-free, field-of-view-proportional approximation
//! - **`CalibratedMapper`**: Pinhole projection with lens distortion and zoom, falling
//!   back to another mapper when camera data is missing
//!
//! Mappers never fail. A mapper that cannot do better always hands the request to a
//! less precise one, so a renderer gets a pixel for every frame.

use crate::coords::{AngleCoordinate, FieldOfView, ImageRect, PixelCoordinate};
use std::sync::Arc;

pub mod calibrated;
pub mod linear;

pub use calibrated::CalibratedMapper;
pub use linear::LinearMapper;

/// Converts between viewing directions and pixels of a displayed camera image.
pub trait AnglePixelMapper: Send + Sync {
    /// Direction seen at `pixel` of an image drawn into `image_rect` covering `fov`.
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate;

    /// Pixel at which `angle` appears.
    ///
    /// `distance` is the radial distance of the target; mappers without a notion of
    /// depth ignore it.
    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> PixelCoordinate;

    /// Maps every angle of a frame, in order.
    fn pixels(
        &self,
        angles: &[AngleCoordinate],
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> Vec<PixelCoordinate> {
        angles
            .iter()
            .map(|&angle| self.pixel(angle, image_rect, fov, distance))
            .collect()
    }

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

impl<T: AnglePixelMapper + ?Sized> AnglePixelMapper for &T {
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate {
        (**self).angle(pixel, image_rect, fov)
    }

    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> PixelCoordinate {
        (**self).pixel(angle, image_rect, fov, distance)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: AnglePixelMapper + ?Sized> AnglePixelMapper for Box<T> {
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate {
        (**self).angle(pixel, image_rect, fov)
    }

    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> PixelCoordinate {
        (**self).pixel(angle, image_rect, fov, distance)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: AnglePixelMapper + ?Sized> AnglePixelMapper for Arc<T> {
    fn angle(
        &self,
        pixel: PixelCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
    ) -> AngleCoordinate {
        (**self).angle(pixel, image_rect, fov)
    }

    fn pixel(
        &self,
        angle: AngleCoordinate,
        image_rect: &ImageRect,
        fov: &FieldOfView,
        distance: Option<f64>,
    ) -> PixelCoordinate {
        (**self).pixel(angle, image_rect, fov, distance)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_matches_single() {
        let mapper = LinearMapper;
        let rect = ImageRect::from_size(1000.0, 1000.0);
        let fov = FieldOfView::new(60.0, 60.0);
        let angles = [
            AngleCoordinate::new(0.0, 0.0),
            AngleCoordinate::new(10.0, -5.0),
            AngleCoordinate::new(-20.0, 15.0),
        ];

        let batch = mapper.pixels(&angles, &rect, &fov, None);
        assert_eq!(batch.len(), angles.len());
        for (angle, pixel) in angles.iter().zip(&batch) {
            assert_eq!(*pixel, mapper.pixel(*angle, &rect, &fov, None));
        }
    }

    #[test]
    fn test_dyn_dispatch() {
        let boxed: Box<dyn AnglePixelMapper> = Box::new(LinearMapper);
        let shared: Arc<dyn AnglePixelMapper> = Arc::new(LinearMapper);
        let rect = ImageRect::from_size(200.0, 100.0);
        let fov = FieldOfView::new(40.0, 20.0);
        let angle = AngleCoordinate::new(5.0, 5.0);

        assert_eq!(
            boxed.pixel(angle, &rect, &fov, None),
            shared.pixel(angle, &rect, &fov, None)
        );
        assert_eq!(boxed.name(), "linear");
        assert_eq!((&shared).name(), "linear");
    }
}
