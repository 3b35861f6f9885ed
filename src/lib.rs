// SPDX-License-Identifier: MPL-2.0

//! Spectral band-pass denoising of 2D data such as images.
//!
//! An image is transformed to the frequency domain, the intermediate
//! frequencies along each axis are erased, and the inverse transform gives
//! back a denoised image. The erased part, reconstructed on its own,
//! gives the removed noise.
//!
//! ```
//! use fft2d_denoise::{Denoiser, Image};
//!
//! let image = Image::from_shape_fn((32, 32), |(row, col)| ((row * col) % 7) as f64 / 7.0);
//! let denoised = Denoiser::new(0.1).denoise(&image);
//! assert_eq!(denoised.image.dim(), (32, 32));
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod denoise;
pub mod error;
pub mod spectrum;

// default transform on row major slices
pub mod slice;

#[cfg(feature = "nalgebra")]
pub mod nalgebra;

pub use config::DenoiseConfig;
pub use denoise::{
    filtered_spectrum, noise_spectrum, reconstruct, Band, Denoised, Denoiser, SpectralBands,
};
pub use error::{Error, Result};
pub use spectrum::{Image, Spectrum};
pub use rustfft::num_complex::Complex;
