//! Error type shared by the seedling crate.
//!
//! Algorithmic failures (a degenerate fit, an empty search window) are not
//! errors: they are reported by value and the affected candidate is dropped.
//! `SeedlingError` only covers misuse of the public API, i.e. invalid
//! configuration or invalid geometry handed to the pool.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeedlingError {
    /// A seeding parameter failed validation in the builder.
    #[error("Invalid seeding parameter: {0}")]
    InvalidSeedingParameter(String),

    /// A zone index outside `[0, N_ZONES)` was handed to the pool.
    #[error("Zone index {0} out of range")]
    ZoneIndexOutOfRange(usize),

    /// The plane descriptors do not describe a usable detector.
    #[error("Invalid detector geometry: {0}")]
    InvalidGeometry(String),
}
