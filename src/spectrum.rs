// SPDX-License-Identifier: MPL-2.0

//! Images and spectra as `ndarray` arrays.

use ndarray::Array2;
use rustfft::num_complex::Complex;

/// Real valued image in the spatial domain, indexed `[(row, col)]`.
pub type Image = Array2<f64>;

/// Complex coefficients of a (non-centered) 2D Fourier transform.
pub type Spectrum = Array2<Complex<f64>>;

/// Complex array with the image values as real parts.
pub fn to_complex(image: &Image) -> Spectrum {
    image.mapv(|x| Complex::new(x, 0.0))
}

/// Real component of every coefficient.
///
/// The imaginary parts are dropped without any check,
/// see [`max_imaginary_residual`].
pub fn real_part(spectrum: &Spectrum) -> Image {
    spectrum.mapv(|c| c.re)
}

/// Largest absolute imaginary part, 0 for an empty array.
pub fn max_imaginary_residual(spectrum: &Spectrum) -> f64 {
    spectrum.iter().map(|c| c.im.abs()).fold(0.0, f64::max)
}

/// Logarithm of the coefficient norms, floored at `floor`.
///
/// Useful to visualize a spectrum where the DC term dwarfs everything else.
pub fn log_magnitude(spectrum: &Spectrum, floor: f64) -> Image {
    spectrum.mapv(|c| c.norm().max(floor).ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn real_part_and_residual() {
        let spectrum = array![[
            Complex::new(1.0, 0.5),
            Complex::new(-2.0, -3.0),
            Complex::new(0.0, 0.0)
        ]];
        assert_eq!(real_part(&spectrum), array![[1.0, -2.0, 0.0]]);
        assert_eq!(max_imaginary_residual(&spectrum), 3.0);
        assert_eq!(max_imaginary_residual(&Spectrum::zeros((0, 0))), 0.0);
    }

    #[test]
    fn complex_round_trip_keeps_orientation() {
        let image = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let spectrum = to_complex(&image);
        assert_eq!(spectrum[(1, 0)], Complex::new(4.0, 0.0));
        assert_eq!(real_part(&spectrum), image);
    }

    #[test]
    fn log_magnitude_is_floored() {
        let spectrum = array![[Complex::new(3.0, 4.0), Complex::new(0.0, 0.0)]];
        let view = log_magnitude(&spectrum, 1.0);
        assert_eq!(view[(0, 0)], 5.0_f64.ln());
        assert_eq!(view[(0, 1)], 0.0);
    }
}
