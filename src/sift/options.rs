use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::Float;
use crate::errors::Result;

/// Per-run configuration of the scale space and the rejection thresholds.
///
/// A negative `edge_threshold`, `peak_threshold` or `magnification` selects the
/// engine default for that run (edge 10, peak 0, magnification 3).
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SiftOptions {
    /// number of octaves
    pub octaves: usize,
    /// number of levels per octave
    pub levels: usize,
    #[serde(alias = "edge")]
    pub edge_threshold: Float,
    #[serde(alias = "peak")]
    pub peak_threshold: Float,
    #[serde(alias = "magnif")]
    pub magnification: Float
}

impl Default for SiftOptions {
    fn default() -> SiftOptions {
        SiftOptions {
            octaves: 3,
            levels: 3,
            edge_threshold: 10.0,
            peak_threshold: 3.0,
            magnification: 3.0
        }
    }
}

impl SiftOptions {
    /// Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<SiftOptions> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: &Path) -> Result<SiftOptions> {
        let contents = fs::read_to_string(path)?;
        SiftOptions::from_yaml_str(&contents)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Engine internals. The defaults are the values of Lowe's SIFT.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
#[serde(default)]
pub struct SiftTuning {
    /// smoothing of the scale index 0 of every octave is sigma_initial*2^(1/levels)
    pub sigma_initial: Float,
    /// blur already present in the input image
    pub sigma_nominal: Float,
    pub orientation_window_factor: Float,
    pub orientation_bins: usize,
    pub orientation_smoothing_passes: usize,
    /// histogram peaks above this fraction of the maximum become orientations
    pub orientation_peak_ratio: Float,
    pub max_orientations: usize,
    /// saturation of the normalized descriptor components
    pub descriptor_clip: Float,
    pub max_refinement_iterations: usize,
    /// octaves with a smaller side are not built
    pub min_octave_side: usize
}

impl Default for SiftTuning {
    fn default() -> SiftTuning {
        SiftTuning {
            sigma_initial: 1.6,
            sigma_nominal: 0.5,
            orientation_window_factor: 1.5,
            orientation_bins: 36,
            orientation_smoothing_passes: 6,
            orientation_peak_ratio: 0.8,
            max_orientations: 4,
            descriptor_clip: 0.2,
            max_refinement_iterations: 5,
            min_octave_side: 8
        }
    }
}
