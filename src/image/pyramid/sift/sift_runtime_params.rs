use crate::Float;
use crate::errors::{FeatureError,Result};
use crate::sift::options::{SiftOptions,SiftTuning};

pub const DEFAULT_EDGE_THRESHOLD: Float = 10.0;
pub const DEFAULT_PEAK_THRESHOLD: Float = 0.0;
pub const DEFAULT_MAGNIFICATION: Float = 3.0;

/// Scale index of the first Gaussian level of every octave
pub const SCALE_INDEX_MIN: isize = -1;

/// Parameters of one detection run with sentinels resolved
#[derive(Debug,Clone)]
pub struct SiftRuntimeParams {
    pub octave_count: usize,
    pub sigma_count: usize,
    pub edge_r: Float,
    pub contrast_r: Float,
    pub magnification: Float,
    /// smoothing of scale index 0
    pub sigma_initial: Float,
    pub sigma_nominal: Float,
    /// ratio between adjacent levels, 2^(1/sigma_count)
    pub sigma_k: Float,
    pub orientation_window_factor: Float,
    pub orientation_bins: usize,
    pub orientation_smoothing_passes: usize,
    pub orientation_peak_ratio: Float,
    pub max_orientations: usize,
    pub descriptor_clip: Float,
    pub max_refinement_iterations: usize,
    pub min_octave_side: usize
}

impl SiftRuntimeParams {
    pub fn new(options: &SiftOptions, tuning: &SiftTuning) -> Result<SiftRuntimeParams> {
        if options.octaves < 1 {
            return Err(FeatureError::InvalidArgument(format!("octaves must be at least 1, got {}", options.octaves)));
        }
        if options.levels < 1 {
            return Err(FeatureError::InvalidArgument(format!("levels must be at least 1, got {}", options.levels)));
        }
        if !(tuning.sigma_initial > 0.0) || !(tuning.sigma_nominal >= 0.0) {
            return Err(FeatureError::InvalidArgument(format!("invalid base smoothing: sigma_initial {}, sigma_nominal {}", tuning.sigma_initial, tuning.sigma_nominal)));
        }
        if tuning.orientation_bins < 3 || tuning.max_orientations < 1 || !(tuning.orientation_window_factor > 0.0) {
            return Err(FeatureError::InvalidArgument(format!("invalid orientation histogram: {} bins, {} orientations, window factor {}", tuning.orientation_bins, tuning.max_orientations, tuning.orientation_window_factor)));
        }
        if !(tuning.descriptor_clip > 0.0) {
            return Err(FeatureError::InvalidArgument(format!("descriptor clip must be positive, got {}", tuning.descriptor_clip)));
        }

        let s = options.levels as Float;
        let sigma_k = (1.0/s).exp2();

        Ok(SiftRuntimeParams {
            octave_count: options.octaves,
            sigma_count: options.levels,
            edge_r: resolve_sentinel("edge_threshold", options.edge_threshold, DEFAULT_EDGE_THRESHOLD)?,
            contrast_r: resolve_sentinel("peak_threshold", options.peak_threshold, DEFAULT_PEAK_THRESHOLD)?,
            magnification: resolve_sentinel("magnification", options.magnification, DEFAULT_MAGNIFICATION)?,
            sigma_initial: tuning.sigma_initial*sigma_k,
            sigma_nominal: tuning.sigma_nominal,
            sigma_k,
            orientation_window_factor: tuning.orientation_window_factor,
            orientation_bins: tuning.orientation_bins,
            orientation_smoothing_passes: tuning.orientation_smoothing_passes,
            orientation_peak_ratio: tuning.orientation_peak_ratio,
            max_orientations: tuning.max_orientations,
            descriptor_clip: tuning.descriptor_clip,
            max_refinement_iterations: tuning.max_refinement_iterations,
            // the 3x3x3 neighbourhood needs at least one interior sample
            min_octave_side: tuning.min_octave_side.max(3)
        })
    }

    /// Octave relative sigma of a (fractional) scale index
    pub fn sigma_at(&self, scale_index: Float) -> Float {
        self.sigma_initial*(scale_index/(self.sigma_count as Float)).exp2()
    }

    /// Number of Gaussian levels per octave, scale indices -1..=S+1
    pub fn gaussian_level_count(&self) -> usize {
        self.sigma_count + 3
    }

    pub fn scale_index_max(&self) -> isize {
        self.sigma_count as isize + 1
    }
}

fn resolve_sentinel(name: &str, value: Float, default: Float) -> Result<Float> {
    match value {
        v if v.is_nan() => Err(FeatureError::InvalidArgument(format!("{} is NaN", name))),
        v if v < 0.0 => Ok(default),
        v => Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_thresholds_select_engine_defaults() {
        let options = SiftOptions { edge_threshold: -1.0, peak_threshold: -1.0, magnification: -2.0, ..SiftOptions::default() };
        let params = SiftRuntimeParams::new(&options, &SiftTuning::default()).unwrap();
        assert_eq!(params.edge_r, DEFAULT_EDGE_THRESHOLD);
        assert_eq!(params.contrast_r, DEFAULT_PEAK_THRESHOLD);
        assert_eq!(params.magnification, DEFAULT_MAGNIFICATION);
    }

    #[test]
    fn sigma_doubles_over_one_octave() {
        let params = SiftRuntimeParams::new(&SiftOptions::default(), &SiftTuning::default()).unwrap();
        assert!((params.sigma_at(3.0) - 2.0*params.sigma_at(0.0)).abs() < 1e-5);
        assert!((params.sigma_at(-1.0) - 1.6).abs() < 1e-5);
    }

    #[test]
    fn zero_levels_is_rejected() {
        let options = SiftOptions { levels: 0, ..SiftOptions::default() };
        assert!(matches!(SiftRuntimeParams::new(&options, &SiftTuning::default()), Err(FeatureError::InvalidArgument(_))));
    }
}
