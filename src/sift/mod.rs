use log::debug;

use crate::{Float,runtime};
use crate::errors::{FeatureError,Result};
use crate::feature::Feature;
use crate::image::Image;
use crate::image::pyramid::sift::{build_first_octave,build_next_octave,sift_octave::SiftOctave,sift_runtime_params::SiftRuntimeParams};
use crate::image::features::sift_feature::{detect_sift_feature,sift_feature_refinement,CANDIDATE_THRESHOLD_FACTOR};
use crate::image::matching::sift_descriptor::{
    keypoint::{KeyPoint,KeyPointType},
    local_image_descriptor::LocalImageDescriptor,
    orientation_histogram::generate_orientations_from_extrema
};
use self::options::{SiftOptions,SiftTuning};

pub mod options;

#[derive(Debug,Clone)]
enum WorkingBuffer {
    Owned(Vec<Float>),
    InPlace
}

/// SIFT detector for images of a fixed size.
///
/// Options may be changed between calls through [`Sift::options_mut`]; every call to
/// `detect`/`detect_float` resolves them afresh.
#[derive(Debug,Clone)]
pub struct Sift {
    rows: usize,
    cols: usize,
    working_buffer: WorkingBuffer,
    options: SiftOptions,
    tuning: SiftTuning
}

impl Sift {

    /// Detector owning a float buffer of `rows*cols` samples, usable with the 8-bit entry points
    pub fn new(rows: usize, cols: usize) -> Result<Sift> {
        let elements = checked_size(rows, cols)?;
        let mut buffer: Vec<Float> = Vec::new();
        buffer.try_reserve_exact(elements).map_err(|_| FeatureError::AllocationFailure{elements})?;
        buffer.resize(elements, 0.0);
        Ok(Sift::with_buffer(rows, cols, WorkingBuffer::Owned(buffer)))
    }

    /// Detector without a working buffer. Only `detect_float` is available.
    pub fn new_inplace(rows: usize, cols: usize) -> Result<Sift> {
        checked_size(rows, cols)?;
        Ok(Sift::with_buffer(rows, cols, WorkingBuffer::InPlace))
    }

    fn with_buffer(rows: usize, cols: usize, working_buffer: WorkingBuffer) -> Sift {
        runtime::initialize(None);
        Sift {
            rows,
            cols,
            working_buffer,
            options: SiftOptions::default(),
            tuning: SiftTuning::default()
        }
    }

    pub fn is_inplace(&self) -> bool {
        matches!(self.working_buffer, WorkingBuffer::InPlace)
    }

    pub fn options(&self) -> &SiftOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SiftOptions {
        &mut self.options
    }

    pub fn tuning(&self) -> &SiftTuning {
        &self.tuning
    }

    pub fn tuning_mut(&mut self) -> &mut SiftTuning {
        &mut self.tuning
    }
}

impl Feature for Sift {

    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn working_buffer(&self) -> Option<&[Float]> {
        match &self.working_buffer {
            WorkingBuffer::Owned(buffer) => Some(buffer.as_slice()),
            WorkingBuffer::InPlace => None
        }
    }

    fn working_buffer_mut(&mut self) -> Option<&mut [Float]> {
        match &mut self.working_buffer {
            WorkingBuffer::Owned(buffer) => Some(buffer.as_mut_slice()),
            WorkingBuffer::InPlace => None
        }
    }

    fn detect_float(&self, image: &[Float], compute_descriptors: bool) -> Result<Vec<KeyPoint>> {
        let len = self.rows*self.cols;
        if image.len() < len {
            return Err(FeatureError::InvalidArgument(format!("image has {} samples, expected at least {}", image.len(), len)));
        }
        let runtime_params = SiftRuntimeParams::new(&self.options, &self.tuning)?;
        debug!("sift on {}x{}: {} octaves, {} levels, edge {}, peak {}, magnification {}",
            self.cols, self.rows, runtime_params.octave_count, runtime_params.sigma_count,
            runtime_params.edge_r, runtime_params.contrast_r, runtime_params.magnification);

        let base_image = Image::from_row_major_slice(self.rows, self.cols, &image[..len]);
        let mut keypoints: Vec<KeyPoint> = Vec::new();
        let mut octave = Some(build_first_octave(&base_image, &runtime_params));
        while let Some(current) = octave {
            keypoints.extend(keypoints_from_octave(&current, &runtime_params, compute_descriptors));
            octave = build_next_octave(&current, &runtime_params);
        }

        debug!("sift emitted {} keypoints", keypoints.len());
        Ok(keypoints)
    }
}

/// Keypoints of one octave in input image coordinates, ordered by DoG level, scan position
/// and orientation peak.
pub fn keypoints_from_octave(octave: &SiftOctave, runtime_params: &SiftRuntimeParams, compute_descriptors: bool) -> Vec<KeyPoint> {
    let inter_pixel_distance = octave.inter_pixel_distance();
    let candidate_threshold = CANDIDATE_THRESHOLD_FACTOR*runtime_params.contrast_r;

    let mut keypoints: Vec<KeyPoint> = Vec::new();
    let mut candidate_count = 0;
    let mut accepted_count = 0;

    for dog_level in 1..=runtime_params.sigma_count {
        let extrema = detect_sift_feature(octave, dog_level, candidate_threshold);
        let refined = sift_feature_refinement(&extrema, octave, runtime_params);
        candidate_count += extrema.len();
        accepted_count += refined.len();

        for feature in refined.iter() {
            let scale = feature.sigma(runtime_params)*inter_pixel_distance;
            for orientation in generate_orientations_from_extrema(octave, feature, runtime_params) {
                let descriptor = match compute_descriptors {
                    true => LocalImageDescriptor::new(octave, feature, orientation, runtime_params).to_normalized_vector(runtime_params.descriptor_clip),
                    false => Vec::new()
                };

                keypoints.push(KeyPoint {
                    x: feature.x*inter_pixel_distance + 1.0,
                    y: feature.y*inter_pixel_distance + 1.0,
                    scale,
                    orientation,
                    descriptor,
                    keypoint_type: KeyPointType::Sift,
                    index: 0,
                    octave: octave.octave_level
                });
            }
        }
    }

    debug!("octave {} ({}x{}): {} candidates, {} accepted, {} keypoints",
        octave.octave_level, octave.width(), octave.height(), candidate_count, accepted_count, keypoints.len());
    keypoints
}

fn checked_size(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(FeatureError::InvalidArgument(format!("image dimensions must be positive, got {}x{}", cols, rows)));
    }
    rows.checked_mul(cols).ok_or_else(|| FeatureError::InvalidArgument(format!("{}x{} samples overflow", cols, rows)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_overflowing_sizes_are_rejected() {
        assert!(matches!(Sift::new(0, 10), Err(FeatureError::InvalidArgument(_))));
        assert!(matches!(Sift::new_inplace(10, 0), Err(FeatureError::InvalidArgument(_))));
        assert!(matches!(Sift::new_inplace(usize::MAX, 2), Err(FeatureError::InvalidArgument(_))));
    }

    #[test]
    fn owned_detector_allocates_working_buffer() {
        let sift = Sift::new(12, 7).unwrap();
        assert!(!sift.is_inplace());
        assert_eq!(sift.working_buffer().map(|b| b.len()), Some(84));
        let inplace = Sift::new_inplace(12, 7).unwrap();
        assert!(inplace.working_buffer().is_none());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unsatisfiable_buffer_is_an_allocation_failure() {
        let side = 1usize << 31;
        match Sift::new(side, side) {
            Err(FeatureError::AllocationFailure{elements}) => assert_eq!(elements, side*side),
            other => panic!("expected an allocation failure, got {:?}", other.map(|_| ()))
        }
        assert!(Sift::new_inplace(side, side).is_ok());
    }
}
