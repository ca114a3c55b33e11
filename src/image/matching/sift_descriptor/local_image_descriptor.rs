extern crate nalgebra as na;

use na::Vector2;
use crate::{Float,float};
use crate::numerics::{rotation_matrix_2d_from_orientation,gradient_and_orientation,mod_2pi};
use crate::image::pyramid::sift::{sift_octave::SiftOctave,sift_runtime_params::SiftRuntimeParams};
use crate::image::features::sift_feature::SiftFeature;
use crate::image::matching::sift_descriptor::{ORIENTATION_BINS,DESCRIPTOR_BINS,DESCRIPTOR_LENGTH,SUBMATRIX_LENGTH,orientation_histogram::OrientationHistogram};

/// 4x4 grid of 8 bin orientation histograms, row-major over the rotated window
#[derive(Debug,Clone)]
pub struct LocalImageDescriptor {
    pub descriptor_vector: Vec<OrientationHistogram>
}

impl LocalImageDescriptor {

    /// Accumulates gradients around `feature` in a frame rotated by `orientation`. Every sample
    /// contributes to up to two spatial bins per axis and two orientation bins.
    pub fn new(octave: &SiftOctave, feature: &SiftFeature, orientation: Float, runtime_params: &SiftRuntimeParams) -> LocalImageDescriptor {
        let mut descriptor = vec![OrientationHistogram::new(ORIENTATION_BINS);DESCRIPTOR_BINS];

        let level = feature.closest_gaussian_level();
        let x_gradient = &octave.x_gradient[level];
        let y_gradient = &octave.y_gradient[level];
        let width = octave.width() as isize;
        let height = octave.height() as isize;

        let xi = (feature.x + 0.5).floor() as isize;
        let yi = (feature.y + 0.5).floor() as isize;
        let bin_width = runtime_params.magnification*feature.sigma(runtime_params);
        if !(bin_width > 0.0) || xi < 0 || xi >= width || yi < 0 || yi >= height {
            return LocalImageDescriptor{descriptor_vector: descriptor};
        }

        let half_bins = (SUBMATRIX_LENGTH/2) as isize;
        let w = (float::consts::SQRT_2*bin_width*(SUBMATRIX_LENGTH as Float + 1.0)/2.0 + 0.5).floor() as isize;
        let window_sigma = SUBMATRIX_LENGTH as Float/2.0;
        let orientation_scale = ORIENTATION_BINS as Float/(2.0*float::consts::PI);
        let rot_mat_t = rotation_matrix_2d_from_orientation(orientation).transpose();

        for y_off in (-w).max(1-yi)..=w.min(height-2-yi) {
            for x_off in (-w).max(1-xi)..=w.min(width-2-xi) {
                let (magnitude, angle) = gradient_and_orientation(x_gradient, y_gradient, (xi + x_off) as usize, (yi + y_off) as usize);
                let theta = mod_2pi(angle - orientation);

                let offset = Vector2::new((xi + x_off) as Float - feature.x, (yi + y_off) as Float - feature.y);
                let normalized = rot_mat_t*offset/bin_width;
                let (nx, ny) = (normalized[0], normalized[1]);
                let nt = orientation_scale*theta;

                let window_weight = (-(nx.powi(2) + ny.powi(2))/(2.0*window_sigma.powi(2))).exp();

                let binx = (nx - 0.5).floor();
                let biny = (ny - 0.5).floor();
                let bint = nt.floor();
                let rbinx = nx - (binx + 0.5);
                let rbiny = ny - (biny + 0.5);
                let rbint = nt - bint;

                for dbinx in 0..2 {
                    let bx = binx as isize + dbinx;
                    if bx < -half_bins || bx >= half_bins {
                        continue;
                    }
                    let wx = (1.0 - dbinx as Float - rbinx).abs();
                    for dbiny in 0..2 {
                        let by = biny as isize + dbiny;
                        if by < -half_bins || by >= half_bins {
                            continue;
                        }
                        let wy = (1.0 - dbiny as Float - rbiny).abs();
                        let histogram = &mut descriptor[((by + half_bins) as usize)*SUBMATRIX_LENGTH + (bx + half_bins) as usize];
                        for dbint in 0..2 {
                            let wt = (1.0 - dbint as Float - rbint).abs();
                            let orientation_bin = (bint as usize + dbint) % ORIENTATION_BINS;
                            histogram.bins[orientation_bin] += window_weight*magnitude*wx*wy*wt;
                        }
                    }
                }
            }
        }

        LocalImageDescriptor{descriptor_vector: descriptor}
    }

    /// Flattened to DESCRIPTOR_LENGTH values, unit normalized with large components clipped
    pub fn to_normalized_vector(&self, clip: Float) -> Vec<Float> {
        let mut vector = self.descriptor_vector.iter().flat_map(|histogram| histogram.bins.iter().cloned()).collect::<Vec<Float>>();
        debug_assert_eq!(vector.len(), DESCRIPTOR_LENGTH);

        normalize(&mut vector);
        for v in vector.iter_mut() {
            if *v > clip {
                *v = clip;
            }
        }
        normalize(&mut vector);
        vector
    }
}

fn normalize(vector: &mut Vec<Float>) -> () {
    let norm = vector.iter().map(|v| v.powi(2)).sum::<Float>().sqrt() + float::EPSILON;
    for v in vector.iter_mut() {
        *v /= norm;
    }
}
