//! # Seeding parameters
//!
//! This module defines the [`SeedingParams`] configuration struct and its
//! builder, which control how the seed search opens its windows, how the
//! fitter accepts candidates, and how the stereo extension clusters hits.
//!
//! ## Pipeline overview
//!
//! 1. **Projection search** — pairs of hits in the outermost bend planes of
//!    a half open a window constrained by `max_ip_at_zero`; intermediate
//!    hits are collected with the `tol_x_inf` / `tol_x_sup` tolerances and
//!    up to `max_parabola_seed_hits` parabola models are tried per pair.
//!
//! 2. **Fit and selection** — candidates are fitted and pruned against
//!    `max_chi2_in_track` per hit; survivors must span at least
//!    `min_x_planes` planes and stay below `max_chi2_per_dof`.
//!
//! 3. **Stereo extension** — unless `x_only` is set, each surviving
//!    projection collects stereo hits clustered with the
//!    `tol_ty_offset` / `tol_ty_slope` tolerance.
//!
//! ## Example
//!
//! ```rust,no_run
//! use seedling::SeedingParams;
//!
//! let params = SeedingParams::builder()
//!     .max_chi2_per_dof(3.0)
//!     .min_x_planes(5)
//!     .x_only(true)
//!     .build()
//!     .unwrap();
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering::{Equal, Greater};
use std::fmt;

use crate::seedling_errors::SeedlingError;

pub mod fitter;
pub mod parabola;
pub mod seed_finder;
pub mod stereo;
pub mod track;
pub mod x_projection;

/// Configuration parameters controlling the behavior of
/// [`SeedFinder::run`](crate::seeding::seed_finder::SeedFinder::run).
///
/// Fields
/// -----------------
/// **Projection search**
/// * `max_ip_at_zero` – largest impact parameter (mm) at z = 0 compatible
///   with a first/last hit pair; sets the search window in the last plane.
/// * `tol_x_inf` – inner tolerance (mm) of the asymmetric window used to
///   collect parabola seed hits around the straight-line prediction.
/// * `tol_x_sup` – outer tolerance of the same window, scaled by the pair
///   slope; the window flips when the pair points to negative x at z = 0.
/// * `max_parabola_seed_hits` – number of parabola models tried per pair,
///   taken from the seed hits closest to the straight-line prediction.
///
/// **Fit and selection**
/// * `max_chi2_in_track` – per-hit chi2 bound; the fit converges when the
///   worst hit is below it, and outlier removal is driven by it.
/// * `min_x_planes` – minimum number of bend planes a projection must keep.
/// * `max_chi2_per_dof` – chi2-per-DoF acceptance bound; the search widens
///   it with the candidate slope to keep steep tracks.
///
/// **Stereo extension**
/// * `tol_ty_offset`, `tol_ty_slope` – clustering tolerance of the sliding
///   stereo window: `tol_ty_offset + tol_ty_slope * |coord|`.
/// * `x_only` – stop after the projection search and return bend-plane
///   candidates directly.
///
/// Defaults
/// -----------------
/// The [`Default`] implementation reproduces the production tuning:
///
/// * `max_chi2_in_track`: 5.5
/// * `tol_x_inf`: 0.5 mm
/// * `tol_x_sup`: 8.0 mm
/// * `min_x_planes`: 5
/// * `max_chi2_per_dof`: 4.0
/// * `max_parabola_seed_hits`: 4
/// * `tol_ty_offset`: 0.002
/// * `tol_ty_slope`: 0.015
/// * `max_ip_at_zero`: 5000.0 mm
/// * `x_only`: false
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingParams {
    /// Per-hit chi2 bound driving fit convergence and outlier removal.
    pub max_chi2_in_track: f64,
    /// Inner tolerance (mm) of the parabola-seed collection window.
    pub tol_x_inf: f64,
    /// Outer, slope-scaled tolerance of the parabola-seed collection window.
    pub tol_x_sup: f64,
    /// Minimum number of bend planes per projection.
    pub min_x_planes: usize,
    /// Chi2-per-DoF acceptance bound (widened with the candidate slope).
    pub max_chi2_per_dof: f64,
    /// Number of parabola models tried per first/last pair.
    pub max_parabola_seed_hits: usize,
    /// Constant term of the stereo clustering tolerance.
    pub tol_ty_offset: f64,
    /// Slope term of the stereo clustering tolerance.
    pub tol_ty_slope: f64,
    /// Largest impact parameter (mm) at z = 0 for a first/last pair.
    pub max_ip_at_zero: f64,
    /// Skip the stereo extension and return bend-plane projections.
    pub x_only: bool,
}

impl SeedingParams {
    /// Construct a new [`SeedingParams`] with the default tuning.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`SeedingParamsBuilder`] to override the defaults
    /// step by step before running the seed finder.
    pub fn builder() -> SeedingParamsBuilder {
        SeedingParamsBuilder::new()
    }
}

impl Default for SeedingParams {
    fn default() -> Self {
        SeedingParams {
            max_chi2_in_track: 5.5,
            tol_x_inf: 0.5,
            tol_x_sup: 8.0,
            min_x_planes: 5,
            max_chi2_per_dof: 4.0,
            max_parabola_seed_hits: 4,
            tol_ty_offset: 0.002,
            tol_ty_slope: 0.015,
            max_ip_at_zero: 5000.0,
            x_only: false,
        }
    }
}

/// Builder for [`SeedingParams`], with validation.
#[derive(Debug, Clone)]
pub struct SeedingParamsBuilder {
    params: SeedingParams,
}

impl Default for SeedingParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedingParamsBuilder {
    /// Create a new builder initialized with the default tuning.
    pub fn new() -> Self {
        Self {
            params: SeedingParams::default(),
        }
    }

    pub fn max_chi2_in_track(mut self, v: f64) -> Self {
        self.params.max_chi2_in_track = v;
        self
    }
    pub fn tol_x_inf(mut self, v: f64) -> Self {
        self.params.tol_x_inf = v;
        self
    }
    pub fn tol_x_sup(mut self, v: f64) -> Self {
        self.params.tol_x_sup = v;
        self
    }
    pub fn min_x_planes(mut self, v: usize) -> Self {
        self.params.min_x_planes = v;
        self
    }
    pub fn max_chi2_per_dof(mut self, v: f64) -> Self {
        self.params.max_chi2_per_dof = v;
        self
    }
    pub fn max_parabola_seed_hits(mut self, v: usize) -> Self {
        self.params.max_parabola_seed_hits = v;
        self
    }
    pub fn tol_ty_offset(mut self, v: f64) -> Self {
        self.params.tol_ty_offset = v;
        self
    }
    pub fn tol_ty_slope(mut self, v: f64) -> Self {
        self.params.tol_ty_slope = v;
        self
    }
    pub fn max_ip_at_zero(mut self, v: f64) -> Self {
        self.params.max_ip_at_zero = v;
        self
    }
    pub fn x_only(mut self, v: bool) -> Self {
        self.params.x_only = v;
        self
    }

    // ---- Numeric helpers for PartialOrd (handle NaN as invalid) ----

    /// Return true iff x > 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.partial_cmp(&0.0) == Some(Greater)
    }

    /// Return true iff x >= 0.0 and comparable (i.e., not NaN).
    #[inline]
    fn ge0(x: f64) -> bool {
        matches!(x.partial_cmp(&0.0), Some(Greater) | Some(Equal))
    }

    /// Finalize the builder and produce a [`SeedingParams`] instance.
    ///
    /// Validation rules
    /// -----------------
    /// * `max_chi2_in_track > 0`, `max_chi2_per_dof > 0` – the chi2 bounds
    ///   must be strictly positive.
    /// * `tol_x_inf >= 0`, `tol_x_sup >= 0` – window tolerances cannot be
    ///   negative.
    /// * `min_x_planes >= 4` – a quadratic with fewer supporting planes has
    ///   no degree of freedom left.
    /// * `max_parabola_seed_hits >= 1`.
    /// * `tol_ty_offset > 0`, `tol_ty_slope >= 0` – the stereo window must
    ///   be able to open.
    /// * `max_ip_at_zero > 0` – the pair window must be able to open.
    ///
    /// Returns
    /// -----------------
    /// * `Ok(SeedingParams)` if all values are valid.
    /// * `Err(SeedlingError::InvalidSeedingParameter)` otherwise.
    pub fn build(self) -> Result<SeedingParams, SeedlingError> {
        let p = &self.params;

        if !Self::gt0(p.max_chi2_in_track) {
            return Err(SeedlingError::InvalidSeedingParameter(
                "max_chi2_in_track must be > 0".into(),
            ));
        }
        if !Self::gt0(p.max_chi2_per_dof) {
            return Err(SeedlingError::InvalidSeedingParameter(
                "max_chi2_per_dof must be > 0".into(),
            ));
        }
        if !Self::ge0(p.tol_x_inf) || !Self::ge0(p.tol_x_sup) {
            return Err(SeedlingError::InvalidSeedingParameter(
                "window tolerances must be non-negative".into(),
            ));
        }
        if p.min_x_planes < 4 {
            return Err(SeedlingError::InvalidSeedingParameter(
                "min_x_planes must be >= 4".into(),
            ));
        }
        if p.max_parabola_seed_hits < 1 {
            return Err(SeedlingError::InvalidSeedingParameter(
                "max_parabola_seed_hits must be >= 1".into(),
            ));
        }
        if !Self::gt0(p.tol_ty_offset) || !Self::ge0(p.tol_ty_slope) {
            return Err(SeedlingError::InvalidSeedingParameter(
                "stereo tolerances must open a window".into(),
            ));
        }
        if !Self::gt0(p.max_ip_at_zero) {
            return Err(SeedlingError::InvalidSeedingParameter(
                "max_ip_at_zero must be > 0".into(),
            ));
        }

        Ok(self.params)
    }
}

impl fmt::Display for SeedingParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            const PARAM_COL: usize = 34; // width reserved for "name = value"
            writeln!(f, "Seeding Parameters")?;
            writeln!(f, "------------------")?;

            macro_rules! line {
                ($fmt:expr, $val:expr, $comment:expr) => {{
                    let s = format!($fmt, $val);
                    let pad = if s.len() < PARAM_COL {
                        " ".repeat(PARAM_COL - s.len())
                    } else {
                        " ".to_string()
                    };
                    writeln!(f, "  {}{}# {}", s, pad, $comment)
                }};
            }

            writeln!(f, "[Projection search]")?;
            line!(
                "max_ip_at_zero        = {:.1}",
                self.max_ip_at_zero,
                "Max impact parameter at z = 0 (mm)"
            )?;
            line!(
                "tol_x_inf             = {:.2}",
                self.tol_x_inf,
                "Inner seed-collection tolerance (mm)"
            )?;
            line!(
                "tol_x_sup             = {:.2}",
                self.tol_x_sup,
                "Outer, slope-scaled tolerance (mm)"
            )?;
            line!(
                "max_parabola_seed_hits= {}",
                self.max_parabola_seed_hits,
                "Parabola models tried per pair"
            )?;

            writeln!(f, "\n[Fit and selection]")?;
            line!(
                "max_chi2_in_track     = {:.2}",
                self.max_chi2_in_track,
                "Per-hit chi2 bound"
            )?;
            line!(
                "min_x_planes          = {}",
                self.min_x_planes,
                "Minimum bend planes per projection"
            )?;
            line!(
                "max_chi2_per_dof      = {:.2}",
                self.max_chi2_per_dof,
                "Chi2/DoF acceptance bound"
            )?;

            writeln!(f, "\n[Stereo extension]")?;
            line!(
                "tol_ty_offset         = {:.4}",
                self.tol_ty_offset,
                "Constant clustering tolerance"
            )?;
            line!(
                "tol_ty_slope          = {:.4}",
                self.tol_ty_slope,
                "Slope clustering tolerance"
            )?;
            line!("x_only                = {}", self.x_only, "Skip stereo extension")?;

            Ok(())
        } else {
            write!(
                f,
                "SeedingParams(max_chi2_in_track={:.2}, tol_x=[{:.2},{:.2}], min_x_planes={}, max_chi2_per_dof={:.2}, seeds={}, tol_ty={:.4}+{:.4}|c|, max_ip={:.0}, x_only={})",
                self.max_chi2_in_track,
                self.tol_x_inf,
                self.tol_x_sup,
                self.min_x_planes,
                self.max_chi2_per_dof,
                self.max_parabola_seed_hits,
                self.tol_ty_offset,
                self.tol_ty_slope,
                self.max_ip_at_zero,
                self.x_only,
            )
        }
    }
}
