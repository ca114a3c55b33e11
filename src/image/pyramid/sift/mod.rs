use log::debug;

use crate::Float;
use crate::image::Image;
use crate::image::filter::gaussian_blur;
use self::{sift_octave::SiftOctave,sift_runtime_params::{SiftRuntimeParams,SCALE_INDEX_MIN}};

pub mod sift_runtime_params;
pub mod sift_octave;

/// Octave 0 at input resolution. The input is assumed to carry `sigma_nominal` of blur already.
pub fn build_first_octave(base_image: &Image, runtime_params: &SiftRuntimeParams) -> SiftOctave {
    let target_sigma = runtime_params.sigma_at(SCALE_INDEX_MIN as Float);
    let initial_image = blur_to(base_image, runtime_params.sigma_nominal, target_sigma);
    SiftOctave::build_octave(initial_image, 0, runtime_params)
}

/// Halves the level one octave above the previous base, or `None` when the octave range is exhausted.
pub fn build_next_octave(previous: &SiftOctave, runtime_params: &SiftRuntimeParams) -> Option<SiftOctave> {
    let octave_level = previous.octave_level + 1;
    if octave_level >= runtime_params.octave_count {
        return None;
    }

    let (width, height) = (previous.width()/2, previous.height()/2);
    if width.min(height) < runtime_params.min_octave_side {
        debug!("octave {} would be {}x{}, stopping before the requested {} octaves", octave_level, width, height, runtime_params.octave_count);
        return None;
    }

    let s = runtime_params.sigma_count as isize;
    let best_scale_index = (SCALE_INDEX_MIN + s).min(runtime_params.scale_index_max());
    let downsampled = Image::downsample_half(&previous.images[SiftOctave::level_index(best_scale_index)]);

    let current_sigma = runtime_params.sigma_at((best_scale_index - s) as Float);
    let target_sigma = runtime_params.sigma_at(SCALE_INDEX_MIN as Float);
    Some(SiftOctave::build_octave(blur_to(&downsampled, current_sigma, target_sigma), octave_level, runtime_params))
}

fn blur_to(image: &Image, current_sigma: Float, target_sigma: Float) -> Image {
    match target_sigma {
        target if target > current_sigma => gaussian_blur(image, (target.powi(2) - current_sigma.powi(2)).sqrt()),
        _ => image.clone()
    }
}
