use rand::{rngs::SmallRng, Rng, SeedableRng};
use sift::Float;

/// Row-major image with a single isotropic Gaussian blob on a constant background
pub fn gaussian_blob(rows: usize, cols: usize, center: (Float, Float), sigma: Float, amplitude: Float, background: Float) -> Vec<Float> {
    let mut data = vec![background; rows*cols];
    add_blob(&mut data, cols, center, sigma, amplitude);
    data
}

/// Bright and dark blobs of random size scattered over a mid-gray background, quantized to 8 bit
pub fn random_blob_scene_u8(rows: usize, cols: usize, blob_count: usize, seed: u64) -> Vec<u8> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut data = vec![128.0 as Float; rows*cols];
    for _ in 0..blob_count {
        let center = (rng.gen_range(0.0..cols as Float), rng.gen_range(0.0..rows as Float));
        let sigma = rng.gen_range(1.5..6.0);
        let magnitude = rng.gen_range(40.0..110.0);
        let amplitude = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
        add_blob(&mut data, cols, center, sigma, amplitude);
    }
    data.iter().map(|v| v.round().max(0.0).min(255.0) as u8).collect()
}

pub fn to_float(data: &[u8]) -> Vec<Float> {
    data.iter().map(|&v| v as Float).collect()
}

fn add_blob(data: &mut [Float], cols: usize, center: (Float, Float), sigma: Float, amplitude: Float) {
    for (i, value) in data.iter_mut().enumerate() {
        let x = (i % cols) as Float;
        let y = (i / cols) as Float;
        let r2 = (x - center.0).powi(2) + (y - center.1).powi(2);
        *value += amplitude*(-r2/(2.0*sigma*sigma)).exp();
    }
}
