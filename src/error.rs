// SPDX-License-Identifier: MPL-2.0

//! Errors raised at the fallible edges of the crate.
//!
//! The spectral operations themselves never fail.

/// Error type of the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading a configuration file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid TOML for [`DenoiseConfig`](crate::DenoiseConfig).
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration could not be written as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result alias using [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;
