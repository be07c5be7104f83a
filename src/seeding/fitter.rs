//! # Iterative weighted least-squares track fit
//!
//! The fit refines the five trajectory parameters against the candidate's
//! hits, in at most three iterations. Each iteration accumulates weighted
//! power sums of `dz = z - z_ref` and of the residuals, solves the
//! quadratic bend-plane update with two nested 2x2 Cramer eliminations,
//! and (once stereo hits carry information, from the second iteration on)
//! solves the linear non-bend update from the stereo residuals. Updates are
//! additive, so a converged fit is a fixed point: refitting changes
//! nothing.
//!
//! Failure is a value, not an error: a degenerate system or a fit that
//! never meets the per-hit chi2 bound returns `false` and the caller
//! decides whether to drop a hit and retry or drop the candidate.

use crate::constants::FIT_DET_EPS;
use crate::hits::hit::Hit;
use crate::seeding::track::SeedTrack;
use crate::seeding::SeedingParams;

/// One fit of a candidate, up to 3 refinement iterations.
///
/// Arguments
/// ---------
/// * `track`: the candidate to refine in place
/// * `hits`: the pool's hit slice the candidate indexes into
/// * `params`: the seeding configuration (per-hit chi2 bound)
///
/// Return
/// ------
/// * `true` once every hit's chi2 contribution is below
///   `max_chi2_in_track`, `false` when the iterations run out or the
///   normal equations are degenerate
pub(crate) fn fit_track(track: &mut SeedTrack, hits: &[Hit], params: &SeedingParams) -> bool {
    for iteration in 0..3 {
        let mut s0 = 0.0;
        let mut sz = 0.0;
        let mut sz2 = 0.0;
        let mut sz3 = 0.0;
        let mut sz4 = 0.0;
        let mut sd = 0.0;
        let mut sdz = 0.0;
        let mut sdz2 = 0.0;

        let mut t0 = 0.0;
        let mut tz = 0.0;
        let mut tz2 = 0.0;
        let mut td = 0.0;
        let mut tdz = 0.0;

        for &idx in track.hits() {
            let hit = &hits[idx as usize];
            let w = hit.w();
            let dz = hit.z() - track.z_ref();
            if hit.is_stereo() {
                // The first iteration fixes the bend plane alone; stereo
                // hits only enter once y has a chance to move.
                if iteration == 0 {
                    continue;
                }
                let dy = track.delta_y(hit);
                t0 += w;
                tz += w * dz;
                tz2 += w * dz * dz;
                td += w * dy;
                tdz += w * dy * dz;
            }
            let d = track.distance(hit);
            s0 += w;
            sz += w * dz;
            sz2 += w * dz * dz;
            sz3 += w * dz * dz * dz;
            sz4 += w * dz * dz * dz * dz;
            sd += w * d;
            sdz += w * d * dz;
            sdz2 += w * d * dz * dz;
        }

        // Eliminate the constant term, then solve the 2x2 system in the
        // slope and curvature updates.
        let b1 = sz * sz - s0 * sz2;
        let c1 = sz2 * sz - s0 * sz3;
        let d1 = sd * sz - s0 * sdz;
        let b2 = sz2 * sz2 - sz * sz3;
        let c2 = sz3 * sz2 - sz * sz4;
        let d2 = sdz * sz2 - sz * sdz2;
        let den = b1 * c2 - b2 * c1;
        if den.abs() < FIT_DET_EPS {
            return false;
        }
        let db = (d1 * c2 - d2 * c1) / den;
        let dc = (d2 * b1 - d1 * b2) / den;
        let da = (sd - db * sz - dc * sz2) / s0;

        let mut day = 0.0;
        let mut dby = 0.0;
        if t0 > 0.0 {
            // stereo hits stacked at one depth leave the line unconstrained
            let deny = tz * tz - t0 * tz2;
            if deny.abs() < FIT_DET_EPS {
                return false;
            }
            day = -(tdz * tz - td * tz2) / deny;
            dby = -(td * tz - t0 * tdz) / deny;
        }

        track.update_parameters(da, db, dc, day, dby);

        let max_chi2 = track
            .hits()
            .iter()
            .map(|&idx| track.chi2_contribution(&hits[idx as usize]))
            .fold(0.0, f64::max);
        if max_chi2 < params.max_chi2_in_track {
            return true;
        }
    }
    false
}

/// Drop the hit with the largest chi2 contribution and refit once.
pub(crate) fn remove_worst_and_refit(
    track: &mut SeedTrack,
    hits: &[Hit],
    params: &SeedingParams,
) -> bool {
    let mut worst_pos = 0;
    let mut worst_chi2 = 0.0;
    for (pos, &idx) in track.hits().iter().enumerate() {
        let chi2 = track.chi2_contribution(&hits[idx as usize]);
        if chi2 > worst_chi2 {
            worst_chi2 = chi2;
            worst_pos = pos;
        }
    }
    track.remove_hit_at(worst_pos);
    fit_track(track, hits, params)
}

/// Assign the candidate's total chi2 and degrees of freedom.
///
/// The quadratic bend model costs 3 degrees of freedom; a candidate with
/// any stereo hit also pays 2 for the non-bend line.
pub(crate) fn set_chi2(track: &mut SeedTrack, hits: &[Hit]) {
    let mut chi2 = 0.0;
    let mut has_stereo = false;
    for &idx in track.hits() {
        let hit = &hits[idx as usize];
        chi2 += track.chi2_contribution(hit);
        has_stereo |= hit.is_stereo();
    }
    let mut ndof = track.hits().len() as i32 - 3;
    if has_stereo {
        ndof -= 2;
    }
    track.set_chi2(chi2, ndof);
}
