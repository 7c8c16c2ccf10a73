//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias.
//! Variants cover invalid sampler or pipeline arguments, failures reported by site
//! probes and scene backends, IO, manifest serialization, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A [`crate::sampling::SiteProbe`] could not answer a query.
    #[error("site probe failed: {0}")]
    Probe(String),

    #[error("scene backend failed: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("manifest serialization failed: {0}")]
    Toml(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "toml")]
impl From<basic_toml::Error> for Error {
    fn from(value: basic_toml::Error) -> Self {
        Error::Toml(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
