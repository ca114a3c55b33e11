pub mod sift_feature;
