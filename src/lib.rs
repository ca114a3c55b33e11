//! Scale-invariant keypoint detection and description.
//!
//! The [`Sift`] detector builds a Gaussian / Difference-of-Gaussian scale space
//! octave by octave, localizes extrema with sub-pixel accuracy, assigns one or
//! more dominant orientations and optionally computes the 128 element gradient
//! histogram descriptor for each keypoint.
//!
//! ```no_run
//! use sift::{Feature, Sift};
//!
//! let (rows, cols) = (480, 640);
//! let pixels = vec![0u8; rows * cols];
//! let mut sift = Sift::new(rows, cols).unwrap();
//! sift.options_mut().octaves = 4;
//! sift.options_mut().peak_threshold = 5.0;
//! let keypoints = sift.detect(&pixels, true).unwrap();
//! ```

pub mod errors;
pub mod feature;
pub mod image;
pub mod numerics;
pub mod runtime;
pub mod sift;

pub use self::errors::{FeatureError, Result};
pub use self::feature::Feature;
pub use self::image::matching::sift_descriptor::keypoint::{KeyPoint, KeyPointType};
pub use self::sift::{Sift, options::{SiftOptions, SiftTuning}};

macro_rules! define_float {
    ($f:tt) => {
        pub use std::$f as float;
        pub type Float = $f;
    }
}

define_float!(f32);

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum GradientDirection {
    HORIZINTAL,
    VERTICAL
}
