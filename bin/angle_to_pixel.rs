//! Map a viewing direction to a viewfinder pixel (or back) from the command line.
//!
//! ```bash
//! angle_to_pixel --profile camera.json --bearing 12.5 --altitude -3
//! angle_to_pixel --pixel-x 960 --pixel-y 200 --fov-width 66 --fov-height 50
//! ```

use std::error::Error;
use std::path::PathBuf;

use anglemap::{
    AngleCoordinate, AngleMapError, AnglePixelMapper, CalibratedMapper, CameraProfile,
    FieldOfView, ImageRect, LinearMapper, MapperConfig, PixelCoordinate, init_logger_with_level,
};
use clap::Parser;
use tracing::{Level, debug, info};

const DEFAULT_FOV: FieldOfView = FieldOfView {
    width: 60.0,
    height: 45.0,
};

#[derive(Parser)]
#[command(name = "angle_to_pixel")]
#[command(about = "Convert between bearing/altitude and viewfinder pixels")]
struct Args {
    /// JSON camera profile; without it only the linear mapping is available
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Bearing in degrees
    #[arg(short, long, default_value = "0.0", allow_hyphen_values = true)]
    bearing: f64,

    /// Altitude in degrees
    #[arg(short, long, default_value = "0.0", allow_hyphen_values = true)]
    altitude: f64,

    /// Radial distance of the target
    #[arg(short, long)]
    distance: Option<f64>,

    /// Map this pixel back to an angle instead (requires --pixel-y)
    #[arg(long, requires = "pixel_y", allow_hyphen_values = true)]
    pixel_x: Option<f64>,

    #[arg(long, requires = "pixel_x", allow_hyphen_values = true)]
    pixel_y: Option<f64>,

    /// Image rectangle on screen as LEFT,TOP,RIGHT,BOTTOM
    #[arg(long, default_value = "0,0,1920,1080", value_parser = parse_rect)]
    rect: ImageRect,

    /// Horizontal field of view in degrees (default: from calibration, else 60)
    #[arg(long, requires = "fov_height")]
    fov_width: Option<f64>,

    /// Vertical field of view in degrees (default: from calibration, else 45)
    #[arg(long, requires = "fov_width")]
    fov_height: Option<f64>,

    /// Skip lens distortion correction
    #[arg(long)]
    no_distortion: bool,

    /// Force the linear mapping even when a profile is given
    #[arg(long)]
    linear: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_rect(value: &str) -> Result<ImageRect, AngleMapError> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[left, top, right, bottom] if right > left && bottom > top => {
            Ok(ImageRect::new(left, top, right, bottom))
        }
        &[_, _, _, _] => Err(AngleMapError::InvalidInput(format!(
            "rectangle {value} has no area"
        ))),
        _ => Err(AngleMapError::InvalidInput(format!(
            "expected LEFT,TOP,RIGHT,BOTTOM, got {value}"
        ))),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    init_logger_with_level(if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });

    let config = MapperConfig::new().with_distortion_correction(!args.no_distortion);
    debug!(%config, "mapper configuration");

    let (mapper, calibrated_fov): (Box<dyn AnglePixelMapper>, Option<FieldOfView>) =
        match &args.profile {
            Some(path) if !args.linear => {
                let camera = CameraProfile::load(path)?.into_camera();
                let mapper = CalibratedMapper::new(camera).with_config(config);
                let fov = mapper.calibrated_field_of_view();
                (Box::new(mapper), fov)
            }
            _ => (Box::new(LinearMapper), None),
        };

    let fov = match (args.fov_width, args.fov_height) {
        (Some(width), Some(height)) => FieldOfView::new(width, height),
        _ => calibrated_fov.unwrap_or(DEFAULT_FOV),
    };
    info!(
        mapper = mapper.name(),
        fov_width = fov.width,
        fov_height = fov.height,
        "mapping"
    );

    match (args.pixel_x, args.pixel_y) {
        (Some(x), Some(y)) => {
            let angle = mapper.angle(PixelCoordinate::new(x, y), &args.rect, &fov);
            println!("{angle}");
        }
        _ => {
            let angle = AngleCoordinate::new(args.bearing, args.altitude);
            let pixel = mapper.pixel(angle, &args.rect, &fov, args.distance);
            if !args.rect.contains(pixel) {
                info!(%pixel, "target is outside the image");
            }
            println!("{pixel}");
        }
    }

    Ok(())
}
