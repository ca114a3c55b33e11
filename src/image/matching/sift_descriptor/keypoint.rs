use serde::{Serialize, Deserialize};

use crate::Float;
use crate::image::matching::sift_descriptor::DESCRIPTOR_LENGTH;

/// Detector family a keypoint originates from
#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum KeyPointType {
    #[serde(rename = "SIFT")]
    Sift = 2
}

/// A detected feature. Coordinates are 1-based, i.e. the sample in the first row and column is (1,1).
/// One extremum with several dominant orientations yields several keypoints sharing x, y and scale.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct KeyPoint {
    pub x: Float,
    pub y: Float,
    /// sigma at input resolution
    pub scale: Float,
    /// radians in [0, 2pi)
    pub orientation: Float,
    /// empty, or DESCRIPTOR_LENGTH values
    pub descriptor: Vec<Float>,
    #[serde(rename = "type")]
    pub keypoint_type: KeyPointType,
    /// free for the caller, never set by a detector
    pub index: usize,
    pub octave: usize
}

impl Default for KeyPoint {
    fn default() -> KeyPoint {
        KeyPoint {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            orientation: 0.0,
            descriptor: Vec::new(),
            keypoint_type: KeyPointType::Sift,
            index: 0,
            octave: 0
        }
    }
}

impl KeyPoint {
    pub fn has_descriptor(&self) -> bool {
        self.descriptor.len() == DESCRIPTOR_LENGTH
    }
}
