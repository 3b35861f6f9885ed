// SPDX-License-Identifier: MPL-2.0

//! Band-pass denoising in the frequency domain.
//!
//! The spectrum of an image is split along each axis into a band of
//! "intermediate" frequencies and the few low and high frequencies on both
//! ends of it. [`filtered_spectrum`] erases every coefficient whose row or
//! column lies in the band, [`noise_spectrum`] erases the four corner blocks
//! where neither does. Reconstructing both gives the denoised image and the
//! removed noise.
//!
//! Spectra use the non-centered ordering of [`slice::fft_2d`](crate::slice::fft_2d),
//! so the low frequencies sit at both ends of each axis, not in the middle.

use std::ops::Range;

use ndarray::s;
use rustfft::num_complex::Complex;

use crate::config::DenoiseConfig;
use crate::slice;
use crate::spectrum::{max_imaginary_residual, real_part, to_complex, Image, Spectrum};

/// Keep fraction used when none is given.
pub const DEFAULT_KEEP_FRACTION: f64 = 0.1;

/// Half-open range `[low, high)` of indices along one axis.
///
/// An inverted band (`low >= high`) contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First index of the band.
    pub low: usize,
    /// One past the last index of the band.
    pub high: usize,
}

impl Band {
    /// Band of intermediate frequencies for an axis of length `len`:
    /// `low = floor(len * f)` and `high = floor(len * (1 - f))`,
    /// both clamped to `[0, len]`.
    pub fn from_fraction(len: usize, keep_fraction: f64) -> Self {
        Self {
            low: cutoff(len, keep_fraction),
            high: cutoff(len, 1.0 - keep_fraction),
        }
    }

    /// True if the band selects no index.
    pub fn is_empty(&self) -> bool {
        self.low >= self.high
    }

    /// True if `index` lies in `[low, high)`.
    pub fn contains(&self, index: usize) -> bool {
        self.low <= index && index < self.high
    }

    /// Indices of the band, empty if it is inverted.
    pub fn range(&self) -> Range<usize> {
        self.low..self.high.max(self.low)
    }
}

fn cutoff(len: usize, fraction: f64) -> usize {
    // NaN and negative values land on 0.
    (len as f64 * fraction).floor().clamp(0.0, len as f64) as usize
}

/// Row and column bands of a spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectralBands {
    /// Band along the vertical frequencies.
    pub rows: Band,
    /// Band along the horizontal frequencies.
    pub cols: Band,
}

impl SpectralBands {
    /// Bands of a `rows x cols` spectrum.
    pub fn new((rows, cols): (usize, usize), keep_fraction: f64) -> Self {
        Self {
            rows: Band::from_fraction(rows, keep_fraction),
            cols: Band::from_fraction(cols, keep_fraction),
        }
    }

    /// The four corner blocks `(rows, cols)` erased by [`noise_spectrum`]:
    /// top right, top left, bottom right, bottom left.
    ///
    /// Blocks may overlap when the bands are inverted.
    pub fn corner_blocks(&self, (rows, cols): (usize, usize)) -> [(Range<usize>, Range<usize>); 4] {
        let top = 0..self.rows.low;
        let bottom = self.rows.high..rows;
        let left = 0..self.cols.low;
        let right = self.cols.high..cols;
        [
            (top.clone(), right.clone()),
            (top, left.clone()),
            (bottom.clone(), right),
            (bottom, left),
        ]
    }
}

/// Copy of `spectrum` with the intermediate frequencies erased.
///
/// Coefficient `(i, j)` is set to 0 iff `i` is in the row band or `j` is in
/// the column band; every other coefficient passes through unchanged.
pub fn filtered_spectrum(spectrum: &Spectrum, keep_fraction: f64) -> Spectrum {
    let bands = SpectralBands::new(spectrum.dim(), keep_fraction);
    let mut filtered = spectrum.clone();
    filtered.slice_mut(s![bands.rows.range(), ..]).fill(Complex::default());
    filtered.slice_mut(s![.., bands.cols.range()]).fill(Complex::default());
    filtered
}

/// Copy of `spectrum` with the four corner blocks erased,
/// see [`SpectralBands::corner_blocks`].
///
/// Everything else, including the whole intermediate band, is kept.
pub fn noise_spectrum(spectrum: &Spectrum, keep_fraction: f64) -> Spectrum {
    let shape = spectrum.dim();
    let bands = SpectralBands::new(shape, keep_fraction);
    let mut noise = spectrum.clone();
    for (rows, cols) in bands.corner_blocks(shape) {
        noise.slice_mut(s![rows, cols]).fill(Complex::default());
    }
    noise
}

/// Forward 2D Fourier transform of a real image, not normalized.
pub fn forward_transform(image: &Image) -> Spectrum {
    transform_2d(&to_complex(image), slice::fft_2d)
}

/// Inverse 2D Fourier transform, normalized by `1 / (rows * cols)`
/// so that it exactly undoes [`forward_transform`].
pub fn inverse_transform(spectrum: &Spectrum) -> Spectrum {
    let mut inverse = transform_2d(spectrum, slice::ifft_2d);
    let fft_coef = 1.0 / inverse.len().max(1) as f64;
    inverse.mapv_inplace(|c| c * fft_coef);
    inverse
}

/// Run one of the [`slice`] transforms on a row major copy of `array`.
fn transform_2d(array: &Spectrum, fft: fn(usize, usize, &mut [Complex<f64>])) -> Spectrum {
    let (height, width) = array.dim();
    let mut out = array.as_standard_layout().into_owned();
    let buffer = out
        .as_slice_mut()
        .expect("arrays in standard layout are contiguous");
    fft(width, height, buffer);
    out
}

/// Image of a spectrum: real part of its inverse transform.
///
/// The imaginary part is discarded whatever its magnitude.
/// It is negligible only for conjugate symmetric spectra.
pub fn reconstruct(spectrum: &Spectrum) -> Image {
    real_part(&inverse_transform(spectrum))
}

/// Everything computed by [`Denoiser::denoise`].
#[derive(Debug, Clone, PartialEq)]
pub struct Denoised {
    /// Spectrum of the input image.
    pub spectrum: Spectrum,
    /// Spectrum with the intermediate frequencies erased.
    pub filtered_spectrum: Spectrum,
    /// Spectrum with the corner blocks erased.
    pub noise_spectrum: Spectrum,
    /// Reconstruction of the filtered spectrum.
    pub image: Image,
    /// Reconstruction of the noise spectrum.
    pub noise: Image,
    /// Reconstruction of the sum of both spectra.
    pub recovered: Image,
}

/// Band-pass denoiser with a fixed keep fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Denoiser {
    keep_fraction: f64,
}

impl Default for Denoiser {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_FRACTION)
    }
}

impl Denoiser {
    /// Any fraction is accepted; values outside `(0, 0.5]`
    /// produce empty or full bands.
    pub fn new(keep_fraction: f64) -> Self {
        if !(keep_fraction > 0.0 && keep_fraction <= 0.5) {
            log::warn!(
                "keep fraction {} outside of (0, 0.5], bands will be degenerate",
                keep_fraction
            );
        }
        Self { keep_fraction }
    }

    /// Denoiser using the keep fraction of `config`.
    pub fn from_config(config: &DenoiseConfig) -> Self {
        Self::new(config.keep_fraction)
    }

    /// The keep fraction.
    pub fn keep_fraction(&self) -> f64 {
        self.keep_fraction
    }

    /// Bands for a spectrum of the given shape.
    pub fn bands(&self, shape: (usize, usize)) -> SpectralBands {
        SpectralBands::new(shape, self.keep_fraction)
    }

    /// See [`filtered_spectrum`].
    pub fn filter(&self, spectrum: &Spectrum) -> Spectrum {
        filtered_spectrum(spectrum, self.keep_fraction)
    }

    /// See [`noise_spectrum`].
    pub fn noise(&self, spectrum: &Spectrum) -> Spectrum {
        noise_spectrum(spectrum, self.keep_fraction)
    }

    /// Run the whole procedure on a real image.
    pub fn denoise(&self, image: &Image) -> Denoised {
        let bands = self.bands(image.dim());
        log::debug!(
            "denoising {}x{} image, row band {:?}, column band {:?}",
            image.nrows(),
            image.ncols(),
            bands.rows.range(),
            bands.cols.range()
        );

        let spectrum = forward_transform(image);
        let filtered_spectrum = self.filter(&spectrum);
        let noise_spectrum = self.noise(&spectrum);

        let filtered_inverse = inverse_transform(&filtered_spectrum);
        log::trace!(
            "discarded imaginary residual of the denoised image: {:e}",
            max_imaginary_residual(&filtered_inverse)
        );
        let image = real_part(&filtered_inverse);
        let noise = reconstruct(&noise_spectrum);
        let recovered = reconstruct(&(&filtered_spectrum + &noise_spectrum));

        Denoised {
            spectrum,
            filtered_spectrum,
            noise_spectrum,
            image,
            noise,
            recovered,
        }
    }
}
