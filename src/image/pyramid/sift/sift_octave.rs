use crate::Float;
use crate::image::Image;
use crate::image::filter::{gaussian_blur,gradient_images};
use crate::image::pyramid::sift::sift_runtime_params::{SiftRuntimeParams,SCALE_INDEX_MIN};

/// Gaussian and Difference-of-Gaussian stacks of one octave.
/// Gaussian level `l` holds scale index `l-1`, DoG level `l` is the difference of Gaussian levels `l+1` and `l`.
#[derive(Debug,Clone)]
pub struct SiftOctave {
    pub octave_level: usize,
    pub images: Vec<Image>,
    pub x_gradient: Vec<Image>,
    pub y_gradient: Vec<Image>,
    pub difference_of_gaussians: Vec<Image>,
    pub sigmas: Vec<Float>
}

impl SiftOctave {

    /// `base_image` is expected to be smoothed to the sigma of scale index -1.
    pub fn build_octave(base_image: Image, octave_level: usize, runtime_params: &SiftRuntimeParams) -> SiftOctave {

        let image_count = runtime_params.gaussian_level_count();
        let sigma_k = runtime_params.sigma_k;
        let sigma_delta_0 = runtime_params.sigma_initial*(1.0 - 1.0/sigma_k.powi(2)).sqrt();

        let mut images: Vec<Image> = Vec::with_capacity(image_count);
        let mut sigmas: Vec<Float> = Vec::with_capacity(image_count);
        images.push(base_image);
        sigmas.push(runtime_params.sigma_at(SCALE_INDEX_MIN as Float));

        // Incremental blur: level l-1 at sigma*k^(s-1) to level l at sigma*k^s
        for level in 1..image_count {
            let scale_index = SiftOctave::scale_index(level);
            let sigma_delta = sigma_delta_0*sigma_k.powi(scale_index as i32);
            let blurred = gaussian_blur(&images[level-1], sigma_delta);
            images.push(blurred);
            sigmas.push(runtime_params.sigma_at(scale_index as Float));
        }

        let (x_gradient, y_gradient): (Vec<Image>,Vec<Image>) = images.iter().map(|image| gradient_images(image)).unzip();

        let mut difference_of_gaussians: Vec<Image> = Vec::with_capacity(image_count-1);
        for i in 0..images.len()-1 {
            difference_of_gaussians.push(Image::difference(&images[i+1], &images[i]));
        }

        SiftOctave {octave_level,images,x_gradient,y_gradient,difference_of_gaussians,sigmas}
    }

    pub fn scale_index(level: usize) -> isize {
        level as isize + SCALE_INDEX_MIN
    }

    pub fn level_index(scale_index: isize) -> usize {
        assert!(scale_index >= SCALE_INDEX_MIN);
        (scale_index - SCALE_INDEX_MIN) as usize
    }

    /// Distance between two samples of this octave in input pixels
    pub fn inter_pixel_distance(&self) -> Float {
        (self.octave_level as Float).exp2()
    }

    pub fn width(&self) -> usize {
        self.images[0].width()
    }

    pub fn height(&self) -> usize {
        self.images[0].height()
    }

    pub fn s(&self) -> usize {
        self.sigmas.len() - 3
    }
}
