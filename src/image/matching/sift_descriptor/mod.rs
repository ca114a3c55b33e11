pub mod orientation_histogram;
pub mod local_image_descriptor;
pub mod keypoint;

/// Spatial histograms per side of the descriptor window
pub const SUBMATRIX_LENGTH: usize = 4;
pub const DESCRIPTOR_BINS: usize = SUBMATRIX_LENGTH*SUBMATRIX_LENGTH;
pub const ORIENTATION_BINS: usize = 8;
pub const DESCRIPTOR_LENGTH: usize = DESCRIPTOR_BINS*ORIENTATION_BINS;
