// SPDX-License-Identifier: MPL-2.0

//! Denoise a synthetic image and save every intermediate result as PNG.
//!
//! Usage: `cargo run --example band_pass [config.toml]`
//! Set `RUST_LOG=debug` to see the bands used.

use std::f64::consts::PI;
use std::path::Path;

use fft2d_denoise::spectrum::log_magnitude;
use fft2d_denoise::{DenoiseConfig, Denoiser, Image, Spectrum};
use image::GrayImage;

const WIDTH: usize = 256;
const HEIGHT: usize = 192;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => DenoiseConfig::load_from_file(path)?,
        None => DenoiseConfig::default(),
    };
    log::info!("keep fraction: {}", config.keep_fraction);

    // Soft blobs with a periodic interference pattern on top.
    let clean = Image::from_shape_fn((HEIGHT, WIDTH), |(row, col)| {
        let (y, x) = (row as f64 / HEIGHT as f64, col as f64 / WIDTH as f64);
        0.5 + 0.25 * (2.0 * PI * x).sin() * (2.0 * PI * 2.0 * y).cos()
    });
    let interference = Image::from_shape_fn((HEIGHT, WIDTH), |(row, col)| {
        let (y, x) = (row as f64 / HEIGHT as f64, col as f64 / WIDTH as f64);
        0.15 * (2.0 * PI * (60.0 * x + 45.0 * y)).sin()
    });
    let noisy = &clean + &interference;

    let denoised = Denoiser::from_config(&config).denoise(&noisy);
    log::info!("rms error before: {:.4}", rms_diff(&noisy, &clean));
    log::info!("rms error after: {:.4}", rms_diff(&denoised.image, &clean));
    log::info!(
        "rms error of the recovered image: {:.2e}",
        rms_diff(&denoised.recovered, &noisy)
    );

    let out_dir = Path::new("target/band_pass");
    std::fs::create_dir_all(out_dir)?;
    save(&noisy, &out_dir.join("input.png"))?;
    save(&view(&denoised.spectrum, config.log_floor), &out_dir.join("spectrum.png"))?;
    save(
        &view(&denoised.filtered_spectrum, config.log_floor),
        &out_dir.join("filtered_spectrum.png"),
    )?;
    save(
        &view(&denoised.noise_spectrum, config.log_floor),
        &out_dir.join("noise_spectrum.png"),
    )?;
    save(&denoised.image, &out_dir.join("denoised.png"))?;
    save(&shift_to_mid_gray(&denoised.noise), &out_dir.join("noise.png"))?;
    save(&denoised.recovered, &out_dir.join("recovered.png"))?;
    println!("images written to {}", out_dir.display());
    Ok(())
}

// Helpers #####################################################################

fn rms_diff(a: &Image, b: &Image) -> f64 {
    (a - b).mapv(|d| d * d).mean().unwrap_or(0.0).sqrt()
}

/// Log magnitude of a spectrum, rescaled to [0, 1].
fn view(spectrum: &Spectrum, log_floor: f64) -> Image {
    let log_norm = log_magnitude(spectrum, log_floor);
    let min = log_floor.ln();
    let max = log_norm.iter().cloned().fold(min, f64::max);
    let range = (max - min).max(f64::EPSILON);
    log_norm.mapv(|x| (x - min) / range)
}

fn shift_to_mid_gray(image: &Image) -> Image {
    image.mapv(|x| x + 0.5)
}

/// Save values in [0, 1] as an 8 bits gray image.
fn save(image: &Image, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let raw: Vec<u8> = image
        .iter()
        .map(|x| (x.max(0.0).min(1.0) * 255.0) as u8)
        .collect();
    let gray = GrayImage::from_raw(image.ncols() as u32, image.nrows() as u32, raw)
        .ok_or("image buffer does not match its dimensions")?;
    gray.save(path)?;
    Ok(())
}
