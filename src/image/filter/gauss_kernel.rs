use crate::{Float,float};
use float::consts::PI;
use super::kernel::Kernel;

pub struct GaussKernel1D {
    kernel: Vec<Float>,
    step: usize,
    normalizing_constant: Float
}

impl GaussKernel1D {
    fn sample(mean: Float, std: Float, x:Float) -> Float {
        let exponent = (-0.5*((x-mean)/std).powi(2)).exp();
        let factor = 1.0/(std*(2.0*PI).sqrt());
        factor*exponent
    }

    pub fn new(mean: Float, std: Float, step: usize, radius: usize) -> GaussKernel1D {
        assert!(std > 0.0);
        assert_eq!(radius%step,0);

        let start = -(radius as isize);
        let end_exclusive = (radius as isize) + 1;
        let kernel = (start..end_exclusive).step_by(step).map(|x| GaussKernel1D::sample(mean,std,x as Float)).collect::<Vec<Float>>();
        // Truncation loses mass in the tails, so the taps are renormalized to sum to one
        let normalizing_constant = kernel.iter().sum();
        GaussKernel1D {
            kernel,
            step,
            normalizing_constant
        }
    }

    pub fn blur_radius(std: Float) -> usize {
        ((4.0*std).ceil() as usize).max(1)
    }
}

impl Kernel for GaussKernel1D {
    fn kernel(&self) -> &Vec<Float> {
        &self.kernel
    }

    fn step(&self) -> usize {
        self.step
    }

    fn normalizing_constant(&self) -> Float{
        self.normalizing_constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_are_symmetric_and_normalized() {
        let kernel = GaussKernel1D::new(0.0, 1.3, 1, GaussKernel1D::blur_radius(1.3));
        let taps = kernel.kernel();
        assert_eq!(taps.len(), 2*6+1);
        for i in 0..taps.len()/2 {
            assert!((taps[i]-taps[taps.len()-1-i]).abs() < 1e-7);
        }
        let sum = taps.iter().sum::<Float>()/kernel.normalizing_constant();
        assert!((sum-1.0).abs() < 1e-6);
    }
}
