extern crate image as image_rs;
extern crate sift;

use std::path::Path;
use color_eyre::eyre::{Result,eyre};
use log::info;

use sift::{Feature,Sift,SiftOptions};

/// Usage: sift_keypoints <image> [options.yaml]
fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let image_path = args.next().ok_or_else(|| eyre!("usage: sift_keypoints <image> [options.yaml]"))?;
    let options = match args.next() {
        Some(options_path) => SiftOptions::load(Path::new(&options_path))?,
        None => SiftOptions::default()
    };

    let gray_image = image_rs::open(&Path::new(&image_path))?.to_luma8();
    let (cols, rows) = gray_image.dimensions();

    let mut sift = Sift::new(rows as usize, cols as usize)?;
    *sift.options_mut() = options;
    let keypoints = sift.detect_gray_image(&gray_image, true)?;

    info!("{} keypoints in {} ({}x{})", keypoints.len(), image_path, cols, rows);
    for keypoint in keypoints.iter() {
        println!("{:.2} {:.2} {:.3} {:.3} octave {}", keypoint.x, keypoint.y, keypoint.scale, keypoint.orientation, keypoint.octave);
    }

    Ok(())
}
