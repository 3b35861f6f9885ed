// SPDX-License-Identifier: MPL-2.0

//! Band-pass denoising of `nalgebra` matrices.
//!
//! Same semantics as the [`denoise`](crate::denoise) module:
//! coefficient `(i, j)` of a spectrum is entry `(i, j)` of the matrix.

use nalgebra::{DMatrix, Scalar};
use ndarray::Array2;
use rustfft::{num_complex::Complex, FftDirection, FftPlanner};

use crate::denoise::SpectralBands;

/// Compute the 2D Fourier transform of a matrix.
///
/// The transformation is not normalized,
/// [`inverse_transform`] takes care of the `1 / (nrows * ncols)` factor.
pub fn fft_2d(mat: DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
    transform_2d(mat, FftDirection::Forward)
}

/// Compute the inverse 2D Fourier transform of a matrix, not normalized.
pub fn ifft_2d(mat: DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
    transform_2d(mat, FftDirection::Inverse)
}

fn transform_2d(
    mut mat: DMatrix<Complex<f64>>,
    direction: FftDirection,
) -> DMatrix<Complex<f64>> {
    let (nrows, ncols) = mat.shape();
    if nrows == 0 || ncols == 0 {
        return mat;
    }

    // Storage is column major, so columns come first.
    let mut planner = FftPlanner::new();
    let fft_cols = planner.plan_fft(nrows, direction);
    let mut scratch = vec![Complex::default(); fft_cols.get_inplace_scratch_len()];
    for column in mat.as_mut_slice().chunks_exact_mut(nrows) {
        fft_cols.process_with_scratch(column, &mut scratch);
    }

    let mut transposed = mat.transpose();
    let fft_rows = planner.plan_fft(ncols, direction);
    scratch.resize(fft_rows.get_inplace_scratch_len(), Complex::default());
    for row in transposed.as_mut_slice().chunks_exact_mut(ncols) {
        fft_rows.process_with_scratch(row, &mut scratch);
    }
    transposed.transpose()
}

/// Spectrum of a real matrix.
pub fn forward_transform(image: &DMatrix<f64>) -> DMatrix<Complex<f64>> {
    fft_2d(image.map(|x| Complex::new(x, 0.0)))
}

/// Inverse transform normalized by `1 / (nrows * ncols)`.
pub fn inverse_transform(spectrum: &DMatrix<Complex<f64>>) -> DMatrix<Complex<f64>> {
    let mut inverse = ifft_2d(spectrum.clone());
    let fft_coef = 1.0 / inverse.len().max(1) as f64;
    for x in inverse.iter_mut() {
        *x *= fft_coef;
    }
    inverse
}

/// Real part of the normalized inverse transform.
pub fn reconstruct(spectrum: &DMatrix<Complex<f64>>) -> DMatrix<f64> {
    inverse_transform(spectrum).map(|c| c.re)
}

/// Copy of `spectrum` with the intermediate row and column bands erased,
/// see [`denoise::filtered_spectrum`](crate::denoise::filtered_spectrum).
pub fn filtered_spectrum(
    spectrum: &DMatrix<Complex<f64>>,
    keep_fraction: f64,
) -> DMatrix<Complex<f64>> {
    let (nrows, ncols) = spectrum.shape();
    let bands = SpectralBands::new((nrows, ncols), keep_fraction);
    let mut filtered = spectrum.clone();
    let rows = bands.rows.range();
    if !rows.is_empty() {
        filtered.rows_mut(rows.start, rows.len()).fill(Complex::default());
    }
    let cols = bands.cols.range();
    if !cols.is_empty() {
        filtered.columns_mut(cols.start, cols.len()).fill(Complex::default());
    }
    filtered
}

/// Copy of `spectrum` with the four corner blocks erased,
/// see [`denoise::noise_spectrum`](crate::denoise::noise_spectrum).
pub fn noise_spectrum(
    spectrum: &DMatrix<Complex<f64>>,
    keep_fraction: f64,
) -> DMatrix<Complex<f64>> {
    let shape = spectrum.shape();
    let bands = SpectralBands::new(shape, keep_fraction);
    let mut noise = spectrum.clone();
    for (rows, cols) in bands.corner_blocks(shape) {
        // Blocks are empty when the bands start at 0 or end at the axis length.
        if rows.is_empty() || cols.is_empty() {
            continue;
        }
        noise.slice_range_mut(rows, cols).fill(Complex::default());
    }
    noise
}

/// Matrix with the same entries as an array.
pub fn to_matrix<T: Scalar>(array: &Array2<T>) -> DMatrix<T> {
    let (nrows, ncols) = array.dim();
    DMatrix::from_fn(nrows, ncols, |i, j| array[(i, j)].clone())
}

/// Array with the same entries as a matrix.
pub fn from_matrix<T: Scalar>(mat: &DMatrix<T>) -> Array2<T> {
    Array2::from_shape_fn(mat.shape(), |(i, j)| mat[(i, j)].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denoise;
    use approx::assert_abs_diff_eq;

    fn test_image(nrows: usize, ncols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(nrows, ncols, |i, j| {
            (i as f64 * 0.8).sin() + (j as f64 * 1.7).cos() + 0.1 * (i * j) as f64
        })
    }

    fn assert_spectra_eq(mat: &DMatrix<Complex<f64>>, array: &Array2<Complex<f64>>) {
        assert_eq!(mat.shape(), array.dim());
        for ((i, j), c) in array.indexed_iter() {
            assert_abs_diff_eq!(mat[(i, j)].re, c.re, epsilon = 1e-9);
            assert_abs_diff_eq!(mat[(i, j)].im, c.im, epsilon = 1e-9);
        }
    }

    #[test]
    fn array_conversions_keep_orientation() {
        let array = ndarray::array![[1, 2, 3], [4, 5, 6]];
        let mat = to_matrix(&array);
        assert_eq!(mat[(0, 2)], 3);
        assert_eq!(mat[(1, 0)], 4);
        assert_eq!(from_matrix(&mat), array);
        assert_eq!(to_matrix(&array.t().to_owned()), mat.transpose());
    }

    #[test]
    fn transform_matches_slice_backend() {
        let image = test_image(5, 8);
        let expected = denoise::forward_transform(&from_matrix(&image));
        assert_spectra_eq(&forward_transform(&image), &expected);
    }

    #[test]
    fn round_trip() {
        let image = test_image(6, 4);
        let restored = reconstruct(&forward_transform(&image));
        for (r, x) in restored.iter().zip(image.iter()) {
            assert_abs_diff_eq!(*r, *x, epsilon = 1e-9);
        }
    }

    #[test]
    fn maskings_match_slice_backend() {
        let cases = [(4, 4, 0.25), (9, 7, 0.1), (8, 8, 0.5), (10, 10, 0.7), (6, 5, -0.1)];
        for &(nrows, ncols, fraction) in &cases {
            let spectrum = forward_transform(&test_image(nrows, ncols));
            let array = from_matrix(&spectrum);
            assert_eq!(
                from_matrix(&filtered_spectrum(&spectrum, fraction)),
                denoise::filtered_spectrum(&array, fraction)
            );
            assert_eq!(
                from_matrix(&noise_spectrum(&spectrum, fraction)),
                denoise::noise_spectrum(&array, fraction)
            );
        }
    }

    #[test]
    fn empty_matrices() {
        let image = DMatrix::<f64>::zeros(0, 3);
        let spectrum = forward_transform(&image);
        assert_eq!(spectrum.shape(), (0, 3));
        assert_eq!(filtered_spectrum(&spectrum, 0.1).shape(), (0, 3));
        assert_eq!(noise_spectrum(&spectrum, 0.1).shape(), (0, 3));
        assert_eq!(reconstruct(&spectrum).shape(), (0, 3));
    }
}
