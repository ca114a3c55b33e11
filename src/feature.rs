use image::GrayImage;
use rayon::prelude::*;

use crate::Float;
use crate::errors::{FeatureError,Result};
use crate::image::matching::sift_descriptor::keypoint::KeyPoint;

/// Common surface of keypoint detectors working on a fixed image size.
///
/// Implementors provide the float entry point. The 8-bit entry points convert into the
/// detector's working buffer first, so they are only available on detectors that own one.
pub trait Feature {
    fn rows(&self) -> usize;
    fn cols(&self) -> usize;

    /// `None` for in-place detectors
    fn working_buffer(&self) -> Option<&[Float]>;
    fn working_buffer_mut(&mut self) -> Option<&mut [Float]>;

    /// Detects on a packed row-major image of at least `rows*cols` samples
    fn detect_float(&self, image: &[Float], compute_descriptors: bool) -> Result<Vec<KeyPoint>>;

    fn detect(&mut self, image: &[u8], compute_descriptors: bool) -> Result<Vec<KeyPoint>> {
        let len = self.rows()*self.cols();
        if image.len() < len {
            return Err(FeatureError::InvalidArgument(format!("image has {} samples, expected at least {}", image.len(), len)));
        }

        let buffer = self.working_buffer_mut().ok_or_else(in_place_error)?;
        buffer[..len].par_iter_mut()
            .zip(image[..len].par_iter())
            .for_each(|(target, &sample)| *target = sample as Float);

        let working_buffer = self.working_buffer().ok_or_else(in_place_error)?;
        self.detect_float(&working_buffer[..len], compute_descriptors)
    }

    fn detect_gray_image(&mut self, image: &GrayImage, compute_descriptors: bool) -> Result<Vec<KeyPoint>> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width != self.cols() || height != self.rows() {
            return Err(FeatureError::InvalidArgument(format!("image is {}x{}, detector expects {}x{}", width, height, self.cols(), self.rows())));
        }
        self.detect(image.as_raw(), compute_descriptors)
    }
}

fn in_place_error() -> FeatureError {
    FeatureError::InvalidArgument("detector was created in-place and has no working buffer, use detect_float".to_string())
}
