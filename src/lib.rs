//! # Seedling
//!
//! Standalone track seeding for planar tracking detectors: search the
//! zones of a station layout for hit subsets compatible with one particle,
//! fit a low-order polynomial trajectory to each subset, arbitrate clones,
//! and extend the surviving bend-plane projections with stereo hits.
//!
//! The entry point is [`SeedFinder`]: fill a [`HitPool`] with the event's
//! measurements, configure a [`SeedingParams`], and collect
//! [`SeedTrack`] candidates from [`SeedFinder::run`].

pub mod constants;
pub mod hits;
pub mod seeding;
pub mod seedling_errors;

pub use crate::hits::hit::{ChannelId, Hit};
pub use crate::hits::hit_pool::{HitPool, PlaneDescriptor};
pub use crate::hits::zone::{Half, Zone};
pub use crate::seeding::seed_finder::SeedFinder;
pub use crate::seeding::track::SeedTrack;
pub use crate::seeding::{SeedingParams, SeedingParamsBuilder};
pub use crate::seedling_errors::SeedlingError;
