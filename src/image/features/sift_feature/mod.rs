extern crate nalgebra as na;

use na::DMatrix;
use log::trace;

use crate::Float;
use crate::image::pyramid::sift::{sift_octave::SiftOctave,sift_runtime_params::SiftRuntimeParams};
use std::fmt;

pub mod processing;

/// Fraction of the peak threshold a raw DoG sample needs to become a candidate
pub const CANDIDATE_THRESHOLD_FACTOR: Float = 0.8;

/// Scale space extremum in octave coordinates
#[derive(Debug,Clone,PartialEq)]
pub struct SiftFeature {
    pub x: Float,
    pub y: Float,
    /// fractional scale index
    pub sigma_level: Float,
    pub x_image: usize,
    pub y_image: usize,
    pub dog_level: usize,
    /// DoG value at (x,y,sigma_level)
    pub contrast: Float
}

impl fmt::Display for SiftFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x: {}, y: {}, s: {}, contrast: {}", self.x, self.y, self.sigma_level, self.contrast)
    }
}

impl SiftFeature {
    fn from_sample(x: usize, y: usize, dog_level: usize, value: Float) -> SiftFeature {
        SiftFeature {
            x: x as Float,
            y: y as Float,
            sigma_level: SiftOctave::scale_index(dog_level) as Float,
            x_image: x,
            y_image: y,
            dog_level,
            contrast: value
        }
    }

    /// Octave relative sigma
    pub fn sigma(&self, runtime_params: &SiftRuntimeParams) -> Float {
        runtime_params.sigma_at(self.sigma_level)
    }

    /// Gaussian level the gradients of this feature are sampled from
    pub fn closest_gaussian_level(&self) -> usize {
        self.dog_level
    }
}

/// Samples of a DoG level that are strictly larger or strictly smaller than their 26 neighbours,
/// in row-major scan order.
pub fn detect_sift_feature(source_octave: &SiftOctave, dog_level: usize, threshold: Float) -> Vec<SiftFeature> {

    let mut extrema_vec: Vec<SiftFeature> = Vec::new();

    assert!(dog_level+1 < source_octave.difference_of_gaussians.len());
    assert!(dog_level > 0);

    let image_buffer = &source_octave.difference_of_gaussians[dog_level].buffer;
    let prev_buffer = &source_octave.difference_of_gaussians[dog_level-1].buffer;
    let next_buffer = &source_octave.difference_of_gaussians[dog_level+1].buffer;

    let width = image_buffer.ncols();
    let height = image_buffer.nrows();
    if width < 3 || height < 3 {
        return extrema_vec;
    }

    for y in 1..height-1 {
        for x in 1..width-1 {

            let sample_value = image_buffer[(y,x)];
            if !(sample_value.abs() >= threshold) {
                continue;
            }

            let (is_smallest_curr, is_largest_curr) = is_sample_extrema_in_neighbourhood(sample_value,x,y,image_buffer,true);
            if !(is_smallest_curr || is_largest_curr) {
                continue;
            }
            let (is_smallest_prev, is_largest_prev) = is_sample_extrema_in_neighbourhood(sample_value,x,y,prev_buffer,false);
            let (is_smallest_next, is_largest_next) = is_sample_extrema_in_neighbourhood(sample_value,x,y,next_buffer,false);

            let is_extrema = (is_smallest_curr&&is_smallest_prev&&is_smallest_next) || (is_largest_curr&&is_largest_prev&&is_largest_next);

            if is_extrema {
                extrema_vec.push(SiftFeature::from_sample(x,y,dog_level,sample_value));
            }
        }
    }

    extrema_vec
}

fn is_sample_extrema_in_neighbourhood(sample: Float, x_sample: usize, y_sample: usize, neighbourhood_buffer: &DMatrix<Float>, skip_center: bool) -> (bool,bool) {

    let mut is_smallest = true;
    let mut is_largest = true;

    for x in x_sample-1..x_sample+2 {
        for y in y_sample-1..y_sample+2 {

            if x == x_sample && y == y_sample && skip_center {
                continue;
            }

            let value = neighbourhood_buffer[(y,x)];
            is_smallest &= sample < value;
            is_largest &= sample > value;

            if !(is_smallest || is_largest) {
                return (false,false);
            }
        }
    }

    (is_smallest,is_largest)
}

/// Localizes the candidates and drops low contrast and edge responses
pub fn sift_feature_refinement(extrema: &Vec<SiftFeature>, source_octave: &SiftOctave, runtime_params: &SiftRuntimeParams) -> Vec<SiftFeature> {
    extrema.iter().filter_map(|x| {
        let refined = processing::subpixel_refinement(source_octave, x, runtime_params);
        if refined.is_none() {
            trace!("rejected candidate {}", x);
        }
        refined
    }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;

    fn octave_from_dogs(dogs: Vec<Image>) -> SiftOctave {
        SiftOctave {
            octave_level: 0,
            images: vec![],
            x_gradient: vec![],
            y_gradient: vec![],
            difference_of_gaussians: dogs,
            sigmas: vec![]
        }
    }

    #[test]
    fn isolated_minimum_is_found() {
        let flat = Image::from_row_major_slice(5, 5, &vec![0.0; 25]);
        let mut center = flat.clone();
        center.buffer[(2,3)] = -5.0;
        let octave = octave_from_dogs(vec![flat.clone(), center, flat]);

        let extrema = detect_sift_feature(&octave, 1, 1.0);
        assert_eq!(extrema.len(), 1);
        assert_eq!((extrema[0].x_image, extrema[0].y_image), (3, 2));
        assert_eq!(extrema[0].sigma_level, 0.0);

        assert!(detect_sift_feature(&octave, 1, 6.0).is_empty());
    }

    #[test]
    fn plateaus_are_not_extrema() {
        let flat = Image::from_row_major_slice(5, 5, &vec![1.0; 25]);
        let octave = octave_from_dogs(vec![flat.clone(), flat.clone(), flat]);
        assert!(detect_sift_feature(&octave, 1, 0.0).is_empty());
    }
}
