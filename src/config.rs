// SPDX-License-Identifier: MPL-2.0

//! Denoiser settings, loadable from TOML.
//!
//! ```toml
//! keep_fraction = 0.1
//! log_floor = 5.0
//! ```
//!
//! Missing keys take their default value.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::denoise::DEFAULT_KEEP_FRACTION;
use crate::error::Result;

/// Floor applied to coefficient norms before taking their logarithm for display.
pub const DEFAULT_LOG_FLOOR: f64 = 5.0;

/// Settings of a [`Denoiser`](crate::Denoiser).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DenoiseConfig {
    /// Fraction of each axis kept at both ends of the spectrum.
    /// Nominally in `(0, 0.5]`; other values give empty or full bands.
    pub keep_fraction: f64,
    /// Floor of [`log_magnitude`](crate::spectrum::log_magnitude).
    pub log_floor: f64,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            keep_fraction: DEFAULT_KEEP_FRACTION,
            log_floor: DEFAULT_LOG_FLOOR,
        }
    }
}

impl DenoiseConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        log::debug!("loaded denoise config: {:?}", config);
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
