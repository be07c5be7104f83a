//! # Constants and type definitions for Seedling
//!
//! This module centralizes the **detector layout constants**, **numeric
//! thresholds**, and **common type definitions** used throughout the
//! `seedling` library.
//!
//! ## Overview
//!
//! - Plane and zone counts of the seeding station layout
//! - Search-window and degeneracy thresholds shared by the algorithms
//! - Core type aliases used across the crate
//!
//! These definitions are used by all main modules, including the hit pool,
//! the projection search, and the fitter.

use smallvec::SmallVec;

// -------------------------------------------------------------------------------------------------
// Detector layout
// -------------------------------------------------------------------------------------------------

/// Number of detection planes crossed by a seed (three stations of four layers)
pub const N_PLANES: usize = 12;

/// Number of zones: every plane is split into an upper and a lower half
pub const N_ZONES: usize = 2 * N_PLANES;

// -------------------------------------------------------------------------------------------------
// Numeric thresholds
// -------------------------------------------------------------------------------------------------

/// Half-width of the stereo search road, in units of the zone stereo slope (mm)
pub const STEREO_ROAD_HALF_WIDTH: f64 = 2500.0;

/// One-sided cut on the derived stereo coordinate, applied per detector half
pub const COORD_HALF_CUT: f64 = 0.005;

/// Depth (mm) at which the extrapolated slope enters the stereo chi2 bound
pub const SLOPE_EVAL_Z: f64 = 9000.0;

/// Largest accepted distance (mm) between a hit and the parabola prediction
pub const MAX_PARABOLA_DIST: f64 = 10.0;

/// Determinant threshold below which the three-point parabola is degenerate
pub const PARABOLA_DET_EPS: f64 = 1e-8;

/// Determinant threshold below which the track fit is degenerate
pub const FIT_DET_EPS: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Index of a hit inside the run-scoped pool
pub type HitIdx = u32;

/// A small, inline-optimized container for the hits of a single candidate
pub type TrackHits = SmallVec<[HitIdx; 16]>;
