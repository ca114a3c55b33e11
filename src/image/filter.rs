use crate::{Float, GradientDirection};
use crate::image::Image;
use self::{kernel::Kernel,gauss_kernel::GaussKernel1D,prewitt_kernel::PrewittKernel};

pub mod gauss_kernel;
pub mod prewitt_kernel;
pub mod kernel;

/// Correlates every sample with the kernel along one axis. Samples outside of the image repeat the border.
pub fn filter_1d_convolution(source: &Image, filter_direction: GradientDirection, filter_kernel: &dyn Kernel) -> Image {
    let kernel = filter_kernel.kernel();
    let step = filter_kernel.step();
    let kernel_radius_signed = filter_kernel.radius() as isize;
    let normalizing_constant = filter_kernel.normalizing_constant();

    let buffer = &source.buffer;
    let width = buffer.ncols();
    let height = buffer.nrows();
    let mut target = Image::empty(width, height);

    for x in 0..width {
        for y in 0..height {
            let mut acc = 0.0;
            for kernel_idx in (-kernel_radius_signed..kernel_radius_signed+1).step_by(step) {
                let sample_value = match filter_direction {
                    GradientDirection::HORIZINTAL => {
                        let sample_idx = ((x as isize)+kernel_idx).max(0).min(width as isize - 1);
                        buffer[(y,sample_idx as usize)]
                    },
                    GradientDirection::VERTICAL => {
                        let sample_idx = ((y as isize)+kernel_idx).max(0).min(height as isize - 1);
                        buffer[(sample_idx as usize,x)]
                    }
                };

                acc += sample_value*kernel[(kernel_idx + kernel_radius_signed) as usize];
            }

            target.buffer[(y,x)] = acc/normalizing_constant;
        }
    }

    target
}

pub fn gaussian_2_d_convolution(image: &Image, filter_kernel: &GaussKernel1D) -> Image {
    let blur_hor = filter_1d_convolution(image,GradientDirection::HORIZINTAL, filter_kernel);
    filter_1d_convolution(&blur_hor,GradientDirection::VERTICAL, filter_kernel)
}

/// Separable Gaussian blur with a kernel radius of ceil(4 sigma). A non-positive sigma is a copy.
pub fn gaussian_blur(image: &Image, sigma: Float) -> Image {
    if sigma <= 0.0 {
        return image.clone();
    }
    let kernel = GaussKernel1D::new(0.0, sigma, 1, GaussKernel1D::blur_radius(sigma));
    gaussian_2_d_convolution(image, &kernel)
}

/// Central difference gradients (x,y)
pub fn gradient_images(image: &Image) -> (Image,Image) {
    let prewitt_kernel = PrewittKernel::new();
    let x_gradient = filter_1d_convolution(image, GradientDirection::HORIZINTAL, &prewitt_kernel);
    let y_gradient = filter_1d_convolution(image, GradientDirection::VERTICAL, &prewitt_kernel);
    (x_gradient,y_gradient)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_keeps_constant_image() {
        let image = Image::from_row_major_slice(9, 11, &vec![42.0; 99]);
        let blurred = gaussian_blur(&image, 1.7);
        for v in blurred.buffer.iter() {
            assert!((v-42.0).abs() < 1e-3);
        }
    }

    #[test]
    fn gradient_of_ramp_is_slope() {
        let data = (0..8*8).map(|i| (i % 8) as Float * 3.0).collect::<Vec<Float>>();
        let image = Image::from_row_major_slice(8, 8, &data);
        let (x_gradient, y_gradient) = gradient_images(&image);
        assert!((x_gradient.buffer[(4,4)] - 3.0).abs() < 1e-6);
        assert!(y_gradient.buffer[(4,4)].abs() < 1e-6);
    }
}
