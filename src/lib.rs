//! # anglemap
//!
//! Conversion between real-world viewing directions and pixels of a live camera
//! preview, for drawing overlays on top of a viewfinder.
//!
//! ## Features
//!
//! - **Linear mapping**: Field-of-view proportional approximation needing no calibration
//! - **Calibrated mapping**: Pinhole projection using the camera's intrinsic calibration,
//!   with optional plumb-bob lens distortion correction and digital zoom compensation
//! - **Graceful degradation**: Missing camera data never fails a projection; the
//!   request is handed to a less precise mapper instead
//! - **Camera profiles**: JSON snapshots of a camera's characteristics
//!
//! ## Example
//!
//! ```
//! use anglemap::{AngleCoordinate, AnglePixelMapper, FieldOfView, ImageRect, LinearMapper, PixelCoordinate};
//!
//! let rect = ImageRect::from_size(1000.0, 1000.0);
//! let fov = FieldOfView::new(60.0, 60.0);
//! let angle = LinearMapper.angle(PixelCoordinate::new(1000.0, 500.0), &rect, &fov);
//! assert_eq!(angle, AngleCoordinate::new(30.0, 0.0));
//! ```

// Re-export workspace crates
pub use anglemap_camera;

pub mod camera {
    pub use anglemap_camera::*;
}

// Local modules
pub mod config;
pub mod coords;
pub mod error;
pub mod logger;
pub mod mapper;
pub mod profile;
pub mod zoom;

pub use config::MapperConfig;
pub use coords::{AngleCoordinate, FieldOfView, ImageRect, PixelCoordinate};
pub use error::{AngleMapError, AngleMapResult};
pub use logger::{init_logger, init_logger_with_level};
pub use mapper::{AnglePixelMapper, CalibratedMapper, LinearMapper};
pub use profile::CameraProfile;
pub use zoom::{Clock, ManualClock, SystemClock, ZoomCache};
