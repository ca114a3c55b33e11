extern crate nalgebra as na;

use na::{Matrix2,Matrix3,Vector3};
use crate::Float;
use crate::image::pyramid::sift::{sift_octave::SiftOctave,sift_runtime_params::{SiftRuntimeParams,SCALE_INDEX_MIN}};
use crate::image::features::sift_feature::SiftFeature;

const STEP_CUTOFF: Float = 0.6;
const MAX_OFFSET: Float = 1.5;

/// Finite difference gradient and Hessian of the DoG stack in (x,y,s)
pub fn dog_derivatives(source_octave: &SiftOctave, x: usize, y: usize, dog_level: usize) -> (Vector3<Float>,Matrix3<Float>) {
    let dogs = &source_octave.difference_of_gaussians;
    let at = |dx: isize, dy: isize, ds: isize| -> Float {
        dogs[(dog_level as isize + ds) as usize].buffer[((y as isize + dy) as usize, (x as isize + dx) as usize)]
    };

    let center = at(0,0,0);
    let dx = 0.5*(at(1,0,0) - at(-1,0,0));
    let dy = 0.5*(at(0,1,0) - at(0,-1,0));
    let ds = 0.5*(at(0,0,1) - at(0,0,-1));

    let dxx = at(1,0,0) + at(-1,0,0) - 2.0*center;
    let dyy = at(0,1,0) + at(0,-1,0) - 2.0*center;
    let dss = at(0,0,1) + at(0,0,-1) - 2.0*center;

    let dxy = 0.25*(at(1,1,0) + at(-1,-1,0) - at(-1,1,0) - at(1,-1,0));
    let dxs = 0.25*(at(1,0,1) + at(-1,0,-1) - at(-1,0,1) - at(1,0,-1));
    let dys = 0.25*(at(0,1,1) + at(0,-1,-1) - at(0,-1,1) - at(0,1,-1));

    let gradient = Vector3::new(dx,dy,ds);
    let hessian = Matrix3::new(dxx,dxy,dxs,
                               dxy,dyy,dys,
                               dxs,dys,dss);
    (gradient,hessian)
}

/// Spatial Hessian of the DoG, used for the principal curvature ratio
pub fn spatial_hessian(hessian: &Matrix3<Float>) -> Matrix2<Float> {
    Matrix2::new(hessian[(0,0)],hessian[(0,1)],
                 hessian[(1,0)],hessian[(1,1)])
}

/// True if the ratio of principal curvatures is below r
pub fn accept_edge(hessian: &Matrix2<Float>, r: Float) -> bool {
    let trace = hessian.trace();
    let determinant = hessian.determinant();
    let hessian_factor = trace.powi(2)/determinant;
    let r_factor = (r+1.0).powi(2)/r;

    determinant > 0.0 && hessian_factor < r_factor
}

/// Fits a quadratic to the DoG around the candidate, moving one sample at a time while the
/// extremum lies closer to a neighbour. Returns `None` for rejected candidates.
pub fn subpixel_refinement(source_octave: &SiftOctave, feature: &SiftFeature, runtime_params: &SiftRuntimeParams) -> Option<SiftFeature> {

    let width = source_octave.width();
    let height = source_octave.height();
    let dog_level = feature.dog_level;
    let max_it = runtime_params.max_refinement_iterations.max(1);

    let mut x = feature.x_image;
    let mut y = feature.y_image;
    let mut counter = 0;

    let (gradient, hessian, perturb_final) = loop {
        let (gradient, hessian) = dog_derivatives(source_octave, x, y, dog_level);
        // A singular system leaves the candidate where it is
        let perturb = hessian.lu().solve(&(-gradient)).unwrap_or_else(Vector3::zeros);
        counter += 1;

        let step_x = step_towards(perturb[0], x, width);
        let step_y = step_towards(perturb[1], y, height);
        if (step_x == 0 && step_y == 0) || counter >= max_it {
            break (gradient, hessian, perturb);
        }

        x = (x as isize + step_x) as usize;
        y = (y as isize + step_y) as usize;
    };

    let dog_sample = source_octave.difference_of_gaussians[dog_level].buffer[(y,x)];
    let contrast = dog_sample + 0.5*gradient.dot(&perturb_final);
    if !(contrast.abs() > runtime_params.contrast_r) {
        return None;
    }

    if !accept_edge(&spatial_hessian(&hessian), runtime_params.edge_r) {
        return None;
    }

    if !perturb_final.iter().all(|v| v.abs() < MAX_OFFSET) {
        return None;
    }

    let x_refined = x as Float + perturb_final[0];
    let y_refined = y as Float + perturb_final[1];
    let sigma_level = SiftOctave::scale_index(dog_level) as Float + perturb_final[2];

    let within_octave = x_refined >= 0.0 && x_refined <= (width-1) as Float &&
        y_refined >= 0.0 && y_refined <= (height-1) as Float &&
        sigma_level >= SCALE_INDEX_MIN as Float && sigma_level <= runtime_params.scale_index_max() as Float;
    if !within_octave {
        return None;
    }

    Some(SiftFeature {
        x: x_refined,
        y: y_refined,
        sigma_level,
        x_image: x,
        y_image: y,
        dog_level,
        contrast
    })
}

/// Moves never land on the outermost samples so the derivatives stay defined
fn step_towards(offset: Float, position: usize, size: usize) -> isize {
    match offset {
        o if o > STEP_CUTOFF && position + 2 < size => 1,
        o if o < -STEP_CUTOFF && position > 1 => -1,
        _ => 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::sift::options::{SiftOptions,SiftTuning};

    const SIDE: usize = 9;

    /// DoG stack sampling 10 - |(x,y,s) - peak|^2 at DoG levels 0..3, s relative to level 1
    fn quadratic_octave(peak: (Float,Float,Float)) -> SiftOctave {
        let dogs = (0..3).map(|level| {
            let s = level as Float - 1.0;
            let data = (0..SIDE*SIDE).map(|i| {
                let x = (i % SIDE) as Float;
                let y = (i / SIDE) as Float;
                10.0 - (x-peak.0).powi(2) - (y-peak.1).powi(2) - (s-peak.2).powi(2)
            }).collect::<Vec<Float>>();
            Image::from_row_major_slice(SIDE, SIDE, &data)
        }).collect::<Vec<Image>>();

        SiftOctave {
            octave_level: 0,
            images: vec![Image::empty(SIDE, SIDE)],
            x_gradient: vec![],
            y_gradient: vec![],
            difference_of_gaussians: dogs,
            sigmas: vec![]
        }
    }

    fn candidate(x: usize, y: usize) -> SiftFeature {
        SiftFeature { x: x as Float, y: y as Float, sigma_level: 0.0, x_image: x, y_image: y, dog_level: 1, contrast: 0.0 }
    }

    fn params() -> SiftRuntimeParams {
        SiftRuntimeParams::new(&SiftOptions::default(), &SiftTuning::default()).unwrap()
    }

    #[test]
    fn quadratic_peak_is_interpolated() {
        let octave = quadratic_octave((4.3, 3.8, 0.2));
        let refined = subpixel_refinement(&octave, &candidate(4, 4), &params()).unwrap();

        assert!((refined.x - 4.3).abs() < 1e-3, "x {}", refined.x);
        assert!((refined.y - 3.8).abs() < 1e-3, "y {}", refined.y);
        assert!((refined.sigma_level - 0.2).abs() < 1e-3, "s {}", refined.sigma_level);
        assert!((refined.contrast - 10.0).abs() < 1e-3);
        assert_eq!((refined.x_image, refined.y_image, refined.dog_level), (4, 4, 1));
    }

    #[test]
    fn distant_peak_moves_the_sample() {
        let octave = quadratic_octave((5.8, 3.9, -0.1));
        let refined = subpixel_refinement(&octave, &candidate(3, 4), &params()).unwrap();

        assert_eq!((refined.x_image, refined.y_image), (6, 4));
        assert!((refined.x - 5.8).abs() < 1e-3, "x {}", refined.x);
        assert!((refined.y - 3.9).abs() < 1e-3, "y {}", refined.y);
        assert!((refined.sigma_level + 0.1).abs() < 1e-3);
    }

    #[test]
    fn weak_peak_is_rejected() {
        let octave = quadratic_octave((4.0, 4.0, 0.0));
        let options = SiftOptions { peak_threshold: 11.0, ..SiftOptions::default() };
        let strict = SiftRuntimeParams::new(&options, &SiftTuning::default()).unwrap();
        assert!(subpixel_refinement(&octave, &candidate(4, 4), &strict).is_none());
    }

    #[test]
    fn blob_like_hessian_passes_edge_test() {
        let blob = Matrix2::new(-2.0, 0.0, 0.0, -2.5);
        assert!(accept_edge(&blob, 10.0));
    }

    #[test]
    fn edge_like_hessian_is_rejected() {
        let edge = Matrix2::new(-20.0, 0.0, 0.0, -0.5);
        assert!(!accept_edge(&edge, 10.0));
        let saddle = Matrix2::new(-2.0, 0.0, 0.0, 2.0);
        assert!(!accept_edge(&saddle, 10.0));
    }

    #[test]
    fn steps_stay_off_the_border() {
        assert_eq!(step_towards(0.9, 3, 10), 1);
        assert_eq!(step_towards(0.9, 8, 10), 0);
        assert_eq!(step_towards(-0.9, 1, 10), 0);
        assert_eq!(step_towards(-0.9, 2, 10), -1);
        assert_eq!(step_towards(0.3, 5, 10), 0);
    }
}
