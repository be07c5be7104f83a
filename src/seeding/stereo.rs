//! # Stereo extension
//!
//! Second stage of the seeding: each accepted bend-plane projection opens a
//! road in the stereo zones of its half, derives a slope-like coordinate
//! for every hit in the road, and scans a sliding window over the sorted
//! coordinates. A window tight enough to come from one particle, spanning
//! enough planes, is attached to a copy of the projection and refitted in
//! three dimensions. One extended candidate is kept per projection.

use itertools::Itertools;
use log::debug;

use crate::constants::{HitIdx, COORD_HALF_CUT, SLOPE_EVAL_Z, STEREO_ROAD_HALF_WIDTH};
use crate::hits::hit_pool::HitPool;
use crate::hits::zone::Half;
use crate::seeding::fitter::{fit_track, remove_worst_and_refit, set_chi2};
use crate::seeding::track::SeedTrack;
use crate::seeding::SeedingParams;

/// Extend the half's valid projections with stereo hits.
///
/// Arguments
/// ---------
/// * `pool`: the event's hit pool, zones in x order
/// * `x_candidates`: the projection candidates of the half
/// * `half`: the detector half being processed
/// * `params`: the seeding configuration
///
/// Return
/// ------
/// * extended candidates, at most one valid per input projection
pub(crate) fn add_stereo(
    pool: &HitPool,
    x_candidates: &[SeedTrack],
    half: Half,
    params: &SeedingParams,
) -> Vec<SeedTrack> {
    let hits = pool.hits();
    let part = half.index();
    let mut extended: Vec<SeedTrack> = Vec::new();

    for seed in x_candidates.iter().filter(|t| t.valid()) {
        let mut road: Vec<HitIdx> = Vec::with_capacity(32);
        for kz in ((part + 2)..(part + 22)).step_by(2) {
            let zone = pool.zone(kz);
            if zone.is_x() {
                continue;
            }
            let dxdy = zone.dxdy();
            let z_plane = zone.z();
            let x_pred = seed.x(z_plane);
            let mut x_min = x_pred + STEREO_ROAD_HALF_WIDTH * dxdy;
            let mut x_max = x_pred - STEREO_ROAD_HALF_WIDTH * dxdy;
            if x_min > x_max {
                std::mem::swap(&mut x_min, &mut x_max);
            }

            let mut pos = zone.lower_bound_x(hits, x_min);
            while pos < zone.hits().len() {
                let idx = zone.hits()[pos];
                pos += 1;
                let hit = &hits[idx as usize];
                if hit.x() > x_max {
                    break;
                }
                let coord = (hit.x() - x_pred) / dxdy / z_plane;
                // the coordinate approximates -ty, one-sided per half
                match half {
                    Half::Upper if coord > COORD_HALF_CUT => continue,
                    Half::Lower if coord < -COORD_HALF_CUT => continue,
                    _ => {}
                }
                hit.set_coord(coord);
                road.push(idx);
            }
        }
        road.sort_by(|&a, &b| {
            hits[a as usize]
                .coord()
                .total_cmp(&hits[b as usize].coord())
        });

        let first_for_seed = extended.len();
        let mut beg = 0usize;
        while beg + 5 < road.len() {
            let mut end = beg + 5;
            let coord_beg = hits[road[beg] as usize].coord();
            let tol_ty = params.tol_ty_offset + params.tol_ty_slope * coord_beg.abs();
            if hits[road[end - 1] as usize].coord() - coord_beg < tol_ty {
                while end + 1 < road.len()
                    && hits[road[end] as usize].coord() - coord_beg < tol_ty
                {
                    end += 1;
                }
                let n_planes = road[beg..end]
                    .iter()
                    .map(|&idx| hits[idx as usize].plane())
                    .unique()
                    .count();
                if n_planes > 4 {
                    let mut track = seed.clone();
                    for &idx in &road[beg..end] {
                        track.add_hit(idx);
                    }
                    let mut ok = false;
                    for _ in 0..3 {
                        ok = fit_track(&mut track, hits, params);
                    }
                    while !ok && track.hits().len() > 10 {
                        ok = remove_worst_and_refit(&mut track, hits, params);
                    }
                    if ok {
                        set_chi2(&mut track, hits);
                        let slope = track.x_slope(SLOPE_EVAL_Z);
                        let chi2_bound = params.max_chi2_per_dof + 6.0 * slope * slope;
                        if track.hits().len() > 9 || track.chi2_per_dof() < chi2_bound {
                            extended.push(track);
                        }
                        beg += 4;
                    }
                }
            }
            beg += 1;
        }
        keep_best_per_seed(&mut extended[first_for_seed..]);
    }

    debug!(
        "stereo extension ({half:?}): {} candidates from {} projections",
        extended.iter().filter(|t| t.valid()).count(),
        x_candidates.iter().filter(|t| t.valid()).count()
    );
    extended
}

/// Keep one candidate among those extended from the same projection:
/// most hits, ties broken by lower total chi2, then first-seen.
pub(crate) fn keep_best_per_seed(candidates: &mut [SeedTrack]) {
    if candidates.len() < 2 {
        return;
    }
    for i1 in 0..candidates.len() - 1 {
        if !candidates[i1].valid() {
            continue;
        }
        for i2 in (i1 + 1)..candidates.len() {
            if !candidates[i2].valid() {
                continue;
            }
            let (len1, len2) = (candidates[i1].hits().len(), candidates[i2].hits().len());
            if len2 < len1 {
                candidates[i2].set_valid(false);
            } else if len2 > len1 {
                candidates[i1].set_valid(false);
            } else if candidates[i1].chi2() < candidates[i2].chi2() {
                candidates[i2].set_valid(false);
            } else {
                candidates[i1].set_valid(false);
            }
        }
    }
}
