use crate::{float,Float};
use crate::numerics::{gradient_and_orientation,mod_2pi,quadratic_peak_offset};
use crate::image::pyramid::sift::{sift_octave::SiftOctave,sift_runtime_params::SiftRuntimeParams};
use crate::image::features::sift_feature::SiftFeature;

/// Circular histogram over [0, 2pi). Bin `i` is centered on `(i+0.5)*bin_range`.
#[derive(Debug,Clone)]
pub struct OrientationHistogram {
    pub bin_range: Float,
    pub bins: Vec<Float>
}

impl OrientationHistogram {

    pub fn new(bin_len: usize) -> OrientationHistogram {
        OrientationHistogram{
            bin_range: 2.0*float::consts::PI/(bin_len as Float),
            bins: vec![0.0;bin_len]
        }
    }

    /// Splits `grad*weight` linearly between the two bins whose centers enclose the orientation
    pub fn add_measurement(&mut self, grad_orientation: (Float,Float), weight: Float) -> () {
        let (grad, orientation) = grad_orientation;
        let bin_len = self.bins.len() as isize;
        let fbin = orientation/self.bin_range;
        let bin = (fbin - 0.5).floor();
        let rbin = fbin - bin - 0.5;
        let v = grad*weight;

        let lower = (bin as isize).rem_euclid(bin_len) as usize;
        let upper = (bin as isize + 1).rem_euclid(bin_len) as usize;
        self.bins[lower] += (1.0 - rbin)*v;
        self.bins[upper] += rbin*v;
    }

    /// One pass of a circular [1,1,1]/3 box filter
    pub fn smooth(&mut self) -> () {
        let bin_len = self.bins.len();
        let first = self.bins[0];
        let mut prev = self.bins[bin_len-1];
        for i in 0..bin_len {
            let current = self.bins[i];
            let next = if i+1 == bin_len { first } else { self.bins[i+1] };
            self.bins[i] = (prev + current + next)/3.0;
            prev = current;
        }
    }

    pub fn max_value(&self) -> Float {
        self.bins.iter().cloned().fold(0.0, Float::max)
    }

    /// Interpolated orientations of all local maxima above `peak_ratio` of the global maximum,
    /// in ascending bin order and at most `max_count` of them.
    pub fn peak_orientations(&self, peak_ratio: Float, max_count: usize) -> Vec<Float> {
        let max_val = self.max_value();
        if !(max_val > 0.0) {
            return Vec::new();
        }
        let threshold = max_val*peak_ratio;
        let bin_len = self.bins.len() as Float;

        (0..self.bins.len())
            .filter(|&i| self.bins[i] > threshold && filter_adjacent(self, i as isize))
            .map(|i| {
                let (l,c,r) = get_adjacent_circular_by_index(self, i as isize);
                let offset = quadratic_peak_offset(self.bins[l], self.bins[c], self.bins[r]);
                mod_2pi(2.0*float::consts::PI*(i as Float + offset + 0.5)/bin_len)
            })
            .take(max_count)
            .collect()
    }
}

/// Dominant gradient orientations around a refined extremum. Empty if the histogram
/// is flat or the keypoint lies too close to the border to be sampled.
pub fn generate_orientations_from_extrema(octave: &SiftOctave, feature: &SiftFeature, runtime_params: &SiftRuntimeParams) -> Vec<Float> {

    let level = feature.closest_gaussian_level();
    let x_grad = &octave.x_gradient[level];
    let y_grad = &octave.y_gradient[level];
    let width = octave.width() as isize;
    let height = octave.height() as isize;

    let xi = (feature.x + 0.5).floor() as isize;
    let yi = (feature.y + 0.5).floor() as isize;
    if xi < 0 || xi >= width || yi < 0 || yi >= height {
        return Vec::new();
    }

    let sigma_w = runtime_params.orientation_window_factor*feature.sigma(runtime_params);
    let w = ((3.0*sigma_w).floor() as isize).max(1);
    let radius_sq = (w*w) as Float + 0.6;
    let mut histogram = OrientationHistogram::new(runtime_params.orientation_bins);

    // Outermost samples have no central difference
    for y_off in (-w).max(1-yi)..=w.min(height-2-yi) {
        for x_off in (-w).max(1-xi)..=w.min(width-2-xi) {
            let dx = (xi + x_off) as Float - feature.x;
            let dy = (yi + y_off) as Float - feature.y;
            let r2 = dx.powi(2) + dy.powi(2);
            if r2 >= radius_sq {
                continue;
            }

            let gauss_weight = (-r2/(2.0*sigma_w.powi(2))).exp();
            let grad_orientation = gradient_and_orientation(x_grad, y_grad, (xi + x_off) as usize, (yi + y_off) as usize);
            histogram.add_measurement(grad_orientation, gauss_weight);
        }
    }

    for _ in 0..runtime_params.orientation_smoothing_passes {
        histogram.smooth();
    }

    histogram.peak_orientations(runtime_params.orientation_peak_ratio, runtime_params.max_orientations)
}

/// Local maximum test. A plateau counts once, at its rightmost bin.
pub fn filter_adjacent(histogram: &OrientationHistogram, bin_idx: isize) -> bool {
    let (l,c,r) = get_adjacent_circular_by_index(histogram, bin_idx);
    let c_val = histogram.bins[c];
    c_val >= histogram.bins[l] && c_val > histogram.bins[r]
}

fn get_adjacent_circular_by_index(histogram: &OrientationHistogram, bin_idx: isize) -> (usize,usize,usize) {
    let bin_len = histogram.bins.len() as isize;

    let l = match bin_idx - 1 {
        idx if idx < 0 => bin_len-1,
        idx => idx
    };

    let r = match bin_idx + 1 {
        idx if idx == bin_len => 0,
        idx => idx
    };

    (l as usize, bin_idx as usize, r as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_on_bin_center_fills_one_bin() {
        let mut histogram = OrientationHistogram::new(36);
        let center = 4.5*histogram.bin_range;
        histogram.add_measurement((2.0, center), 1.0);
        assert!((histogram.bins[4] - 2.0).abs() < 1e-5);
        assert!(histogram.bins[5].abs() < 1e-5);
    }

    #[test]
    fn measurement_near_zero_wraps_to_last_bin() {
        let mut histogram = OrientationHistogram::new(36);
        histogram.add_measurement((1.0, 0.0), 1.0);
        assert!((histogram.bins[35] - 0.5).abs() < 1e-5);
        assert!((histogram.bins[0] - 0.5).abs() < 1e-5);
    }

    #[test]
    fn smoothing_preserves_mass() {
        let mut histogram = OrientationHistogram::new(36);
        histogram.bins[0] = 9.0;
        histogram.bins[17] = 3.0;
        for _ in 0..6 {
            histogram.smooth();
        }
        let total: Float = histogram.bins.iter().sum();
        assert!((total - 12.0).abs() < 1e-4);
        assert!(histogram.bins[35] > 0.0);
    }

    #[test]
    fn single_peak_yields_its_center() {
        let mut histogram = OrientationHistogram::new(36);
        histogram.bins[9] = 1.0;
        histogram.bins[8] = 0.5;
        histogram.bins[10] = 0.5;
        let peaks = histogram.peak_orientations(0.8, 4);
        assert_eq!(peaks.len(), 1);
        assert!((peaks[0] - 9.5*histogram.bin_range).abs() < 1e-5);
    }

    #[test]
    fn secondary_peaks_are_limited() {
        let mut histogram = OrientationHistogram::new(36);
        for i in (0..36).step_by(6) {
            histogram.bins[i] = 1.0;
        }
        assert_eq!(histogram.peak_orientations(0.8, 4).len(), 4);
        assert!(OrientationHistogram::new(36).peak_orientations(0.8, 4).is_empty());
    }
}
