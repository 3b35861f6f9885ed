// SPDX-License-Identifier: MPL-2.0

//! 2D Fourier transform of row major buffers.

use rustfft::{num_complex::Complex, FftDirection, FftPlanner};

/// Compute the 2D Fourier transform of an image buffer.
///
/// The image buffer is considered to be stored in row major order,
/// with `height` rows of `width` pixels.
/// Once both dimensions are processed the buffer is transposed back,
/// so coefficient `(k, l)` ends up at index `k * width + l`,
/// in the usual non-centered order (DC term first, highest frequencies
/// in the middle of each axis).
///
/// The transformation is not normalized.
/// To normalize the output, you should multiply it by 1 / sqrt( width * height ).
/// If the transformed buffer is intended to be processed
/// and then converted back into an image with an inverse Fourier transform,
/// it is more efficient to multiply at the end by 1 / (width * height),
/// which is what [`inverse_transform`](crate::denoise::inverse_transform) does.
///
/// Nothing happens if one of the dimensions is 0.
///
/// Remark: an allocation the size of the image buffer is performed for the transposition,
/// as well as a scratch buffer shared by the rows and columns FFTs.
pub fn fft_2d(width: usize, height: usize, buffer: &mut [Complex<f64>]) {
    transform_2d(width, height, buffer, FftDirection::Forward)
}

/// Compute the inverse 2D Fourier transform to get back an image buffer.
///
/// The buffer layout is the same as the one produced by [`fft_2d`]:
/// row major, not transposed, so both functions can be chained directly.
///
/// The transformation is not normalized.
/// If this is used as a pair of FFT followed by inverse FFT,
/// it is enough to normalize only once by 1 / (width * height) at the end.
///
/// Remark: same allocations as [`fft_2d`].
pub fn ifft_2d(width: usize, height: usize, buffer: &mut [Complex<f64>]) {
    transform_2d(width, height, buffer, FftDirection::Inverse)
}

fn transform_2d(width: usize, height: usize, buffer: &mut [Complex<f64>], direction: FftDirection) {
    if width == 0 || height == 0 {
        return;
    }
    debug_assert_eq!(buffer.len(), width * height);

    // Rows are contiguous, transform them where they are.
    let mut planner = FftPlanner::new();
    let fft_rows = planner.plan_fft(width, direction);
    let mut scratch = vec![Complex::default(); fft_rows.get_inplace_scratch_len()];
    for row in buffer.chunks_exact_mut(width) {
        fft_rows.process_with_scratch(row, &mut scratch);
    }

    // Columns become contiguous once transposed.
    let mut columns = transpose(width, height, buffer);
    let fft_cols = planner.plan_fft(height, direction);
    scratch.resize(fft_cols.get_inplace_scratch_len(), Complex::default());
    for column in columns.chunks_exact_mut(height) {
        fft_cols.process_with_scratch(column, &mut scratch);
    }

    // Restore the row major layout.
    for (col, column) in columns.chunks_exact(height).enumerate() {
        for (row, &coef) in column.iter().enumerate() {
            buffer[row * width + col] = coef;
        }
    }
}

/// Transpose a row major matrix of `height` rows and `width` columns.
///
/// The result is the row major buffer of a `width x height` matrix.
pub fn transpose<T: Copy + Default>(width: usize, height: usize, matrix: &[T]) -> Vec<T> {
    let mut transposed = vec![T::default(); matrix.len()];
    if width == 0 {
        return transposed;
    }
    for (row, line) in matrix.chunks_exact(width).take(height).enumerate() {
        for (col, &value) in line.iter().enumerate() {
            transposed[col * height + row] = value;
        }
    }
    transposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn complex(values: &[f64]) -> Vec<Complex<f64>> {
        values.iter().map(|&x| Complex::new(x, 0.0)).collect()
    }

    fn assert_complex_eq(actual: &[Complex<f64>], expected: &[Complex<f64>]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_abs_diff_eq!(a.re, e.re, epsilon = 1e-12);
            assert_abs_diff_eq!(a.im, e.im, epsilon = 1e-12);
        }
    }

    #[test]
    fn transpose_non_square() {
        // 2 rows, 3 columns.
        let matrix = [1, 2, 3, 4, 5, 6];
        assert_eq!(transpose(3, 2, &matrix), vec![1, 4, 2, 5, 3, 6]);
        assert_eq!(transpose(2, 3, &transpose(3, 2, &matrix)), matrix.to_vec());
    }

    #[test]
    fn fft_2x2_by_hand() {
        let mut buffer = complex(&[1.0, 2.0, 3.0, 4.0]);
        fft_2d(2, 2, &mut buffer);
        assert_complex_eq(&buffer, &complex(&[10.0, -2.0, -4.0, 0.0]));
    }

    #[test]
    fn fft_keeps_row_major_orientation() {
        // First row all ones, second row zeros: energy only in column 0.
        let mut buffer = complex(&[1.0, 1.0, 1.0, 0.0, 0.0, 0.0]);
        fft_2d(3, 2, &mut buffer);
        assert_complex_eq(&buffer, &complex(&[3.0, 0.0, 0.0, 3.0, 0.0, 0.0]));
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut buffer = vec![Complex::default(); 4 * 5];
        buffer[0] = Complex::new(1.0, 0.0);
        fft_2d(5, 4, &mut buffer);
        assert_complex_eq(&buffer, &complex(&[1.0; 20]));
    }

    #[test]
    fn inverse_undoes_forward_up_to_scaling() {
        let (width, height) = (5, 3);
        let original: Vec<Complex<f64>> = (0..width * height)
            .map(|i| Complex::new((i as f64 * 0.7).sin(), 0.0))
            .collect();
        let mut buffer = original.clone();
        fft_2d(width, height, &mut buffer);
        ifft_2d(width, height, &mut buffer);
        let scale = 1.0 / (width * height) as f64;
        let restored: Vec<_> = buffer.iter().map(|&c| c * scale).collect();
        assert_complex_eq(&restored, &original);
    }

    #[test]
    fn empty_buffers_are_left_alone() {
        let mut buffer: Vec<Complex<f64>> = Vec::new();
        fft_2d(0, 4, &mut buffer);
        ifft_2d(4, 0, &mut buffer);
        assert!(buffer.is_empty());
        assert!(transpose::<f64>(0, 3, &[]).is_empty());
    }
}
