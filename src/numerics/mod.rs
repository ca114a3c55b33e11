extern crate nalgebra as na;

use na::Matrix2;
use crate::image::Image;
use crate::{Float,float};

pub fn rotation_matrix_2d_from_orientation(orientation: Float) -> Matrix2<Float> {

    Matrix2::new(orientation.cos(), -orientation.sin(),
                orientation.sin(), orientation.cos())

}

/// Wraps an angle into [0, 2pi)
pub fn mod_2pi(angle: Float) -> Float {
    let two_pi = 2.0*float::consts::PI;
    match angle.rem_euclid(two_pi) {
        // rem_euclid may round up to the modulus itself for tiny negative inputs
        wrapped if wrapped >= two_pi => 0.0,
        wrapped => wrapped
    }
}

/// Gradient magnitude and orientation in [0, 2pi) at a sample
pub fn gradient_and_orientation(x_gradient: &Image, y_gradient: &Image, x: usize, y: usize) -> (Float,Float) {

    let x_diff = x_gradient.buffer[(y,x)];
    let y_diff = y_gradient.buffer[(y,x)];

    let gradient = (x_diff.powi(2) + y_diff.powi(2)).sqrt();
    let orientation = mod_2pi(y_diff.atan2(x_diff));

    (gradient,orientation)
}

/// Offset of the vertex of the parabola through (-1,f_l), (0,f_c), (1,f_r).
/// Expects f_c to be a maximum, i.e. f_l + f_r - 2 f_c < 0.
pub fn quadratic_peak_offset(f_l: Float, f_c: Float, f_r: Float) -> Float {
    let denominator = f_r + f_l - 2.0*f_c;
    match denominator {
        d if d < 0.0 => -0.5*(f_r - f_l)/d,
        _ => 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mod_2pi_wraps_into_range() {
        let two_pi = 2.0*float::consts::PI;
        assert!((mod_2pi(-0.5) - (two_pi-0.5)).abs() < 1e-5);
        assert!((mod_2pi(two_pi+0.25) - 0.25).abs() < 1e-5);
        assert_eq!(mod_2pi(two_pi), 0.0);
        assert!(mod_2pi(-1e-9) < two_pi);
    }

    #[test]
    fn parabola_vertex_is_recovered() {
        // f(x) = -(x-0.3)^2
        let f = |x: Float| -(x-0.3)*(x-0.3);
        let offset = quadratic_peak_offset(f(-1.0), f(0.0), f(1.0));
        assert!((offset-0.3).abs() < 1e-5);
    }

    #[test]
    fn left_plateau_puts_peak_on_bin_edge() {
        assert!((quadratic_peak_offset(2.0, 2.0, 1.0) + 0.5).abs() < 1e-6);
    }
}
