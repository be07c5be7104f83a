//! # Bend-plane projection search
//!
//! First stage of the seeding: enumerate pairs of hits in the outermost
//! bend planes of a half, seed a parabola with an intermediate hit, collect
//! the closest hit per intermediate plane, and fit the resulting sets.
//!
//! The search runs three times per half with different outermost planes
//! (full span, skipping the first station, skipping the last station), so
//! tracks leaving through the side or entering late are still found. Hits
//! consumed by a full-length candidate are flagged and skipped by the later
//! cases, and a clone-removal pass arbitrates candidates that share hits.

use ahash::RandomState;
use log::debug;
use smallvec::SmallVec;
use std::collections::HashSet;

use crate::constants::{HitIdx, TrackHits, MAX_PARABOLA_DIST};
use crate::hits::hit_pool::HitPool;
use crate::hits::zone::Half;
use crate::seeding::fitter::{fit_track, remove_worst_and_refit, set_chi2};
use crate::seeding::parabola::solve_parabola;
use crate::seeding::track::SeedTrack;
use crate::seeding::SeedingParams;

/// Search one half for bend-plane projections.
///
/// Arguments
/// ---------
/// * `pool`: the event's hit pool, zones in x order
/// * `half`: the detector half to search
/// * `params`: the seeding configuration
///
/// Return
/// ------
/// * all accepted projection candidates of the half, clone-arbitrated;
///   rejected clones stay in the list with their `valid` flag cleared
pub(crate) fn find_x_projections(
    pool: &HitPool,
    half: Half,
    params: &SeedingParams,
) -> Vec<SeedTrack> {
    let hits = pool.hits();
    let z_ref = pool.z_reference();
    let part = half.index();
    let mut candidates: Vec<SeedTrack> = Vec::new();

    for i_case in 0..3usize {
        let first_zone = if i_case == 1 { part + 6 } else { part };
        let last_zone = if i_case == 2 { part + 16 } else { part + 22 };
        let first = pool.zone(first_zone);
        let last = pool.zone(last_zone);
        let z_ratio = last.z() / first.z();
        let dz_pair = last.z() - first.z();

        // intermediate bend-plane zones of this case, innermost first
        let x_zone_ids: SmallVec<[usize; 8]> = ((first_zone + 2)..last_zone)
            .step_by(2)
            .filter(|&k| pool.zone(k).is_x())
            .collect();

        let n_before = candidates.len();
        for &first_idx in first.hits() {
            let f = &hits[first_idx as usize];
            if i_case != 0 && f.is_used() {
                continue;
            }

            // window in the last plane compatible with max_ip_at_zero
            let projected = f.x() * z_ratio;
            let ip_window = params.max_ip_at_zero * (z_ratio - 1.0);
            let max_xl = projected + ip_window;

            let mut pos_l = last.lower_bound_x(hits, projected - ip_window);
            while pos_l < last.hits().len() {
                let last_idx = last.hits()[pos_l];
                pos_l += 1;
                let l = &hits[last_idx as usize];
                if l.x() >= max_xl {
                    break;
                }
                if i_case != 0 && l.is_used() {
                    continue;
                }

                let tx = (l.x() - f.x()) / dz_pair;
                let x0 = f.x() - f.z() * tx;

                // collect parabola seed hits from the designated planes
                let mut seed_hits: SmallVec<[HitIdx; 8]> = SmallVec::new();
                let last_counter = if i_case == 0 { 3 } else { 2 };
                let mut counter = 0usize;
                for &kz in &x_zone_ids {
                    counter += 1;
                    if i_case == 0 && counter == 1 {
                        continue;
                    }
                    if counter > last_counter {
                        break;
                    }
                    let zone = pool.zone(kz);
                    let x_proj = x0 + zone.z() * tx;
                    let outer = 2.0 * tx.abs() * params.tol_x_sup + 1.5;
                    let (x_min, x_max) = if x0 >= 0.0 {
                        (x_proj - params.tol_x_inf, x_proj + outer)
                    } else {
                        (x_proj - outer, x_proj + params.tol_x_inf)
                    };
                    let mut pos = zone.lower_bound_x(hits, x_min);
                    while pos < zone.hits().len() {
                        let idx = zone.hits()[pos];
                        pos += 1;
                        if hits[idx as usize].x() > x_max {
                            break;
                        }
                        seed_hits.push(idx);
                    }
                }
                if seed_hits.is_empty() {
                    continue;
                }

                // prefer seeds close to the straight-line interpolation
                seed_hits.sort_by(|&a, &b| {
                    let da = (hits[a as usize].x() - (x0 + hits[a as usize].z() * tx)).abs();
                    let db = (hits[b as usize].x() - (x0 + hits[b as usize].z() * tx)).abs();
                    da.total_cmp(&db)
                });
                seed_hits.truncate(params.max_parabola_seed_hits);

                // one hit set per parabola model, deduplicated by id tuple
                let mut seen: HashSet<TrackHits, RandomState> = HashSet::default();
                let mut hit_sets: SmallVec<[TrackHits; 4]> = SmallVec::new();
                for &seed_idx in &seed_hits {
                    let (a, b, c) = solve_parabola(f, &hits[seed_idx as usize], l, z_ref);

                    let mut set: TrackHits = SmallVec::new();
                    for &kz in &x_zone_ids {
                        let zone = pool.zone(kz);
                        let dz = zone.z() - z_ref;
                        let x_at_z = (a * dz + b) * dz + c;
                        let x_max = x_at_z + tx.abs() * 2.0 + 0.5;
                        let mut best: Option<HitIdx> = None;
                        let mut best_dist = MAX_PARABOLA_DIST;
                        let mut pos = zone.lower_bound_x(hits, x_at_z - tx.abs() * 2.0 - 0.5);
                        while pos < zone.hits().len() {
                            let idx = zone.hits()[pos];
                            pos += 1;
                            let x = hits[idx as usize].x();
                            if x > x_max {
                                break;
                            }
                            let dist = (x - x_at_z).abs();
                            if dist < best_dist {
                                best_dist = dist;
                                best = Some(idx);
                            }
                        }
                        if let Some(idx) = best {
                            set.push(idx);
                        }
                    }
                    set.push(first_idx);
                    set.push(last_idx);
                    if set.len() < 5 {
                        continue;
                    }
                    set.sort_by_key(|&i| hits[i as usize].id());
                    if seen.insert(set.clone()) {
                        hit_sets.push(set);
                    }
                }

                for set in hit_sets {
                    let mut track = SeedTrack::new(half, z_ref, set, hits);
                    let mut ok = fit_track(&mut track, hits, params);
                    while !ok && track.hits().len() > 3 {
                        ok = remove_worst_and_refit(&mut track, hits, params);
                    }
                    if !ok {
                        continue;
                    }
                    set_chi2(&mut track, hits);
                    let chi2_bound = params.max_chi2_per_dof + 6.0 * tx * tx;
                    if track.hits().len() >= params.min_x_planes
                        && track.chi2_per_dof() < chi2_bound
                    {
                        // a full-length candidate claims its hits
                        if track.hits().len() == 6 {
                            for &idx in track.hits() {
                                hits[idx as usize].set_used(true);
                            }
                        }
                        candidates.push(track);
                    }
                }
            }
        }
        debug!(
            "x projection case {i_case} ({half:?}): {} candidates",
            candidates.len() - n_before
        );
    }

    remove_clones(&mut candidates, pool);
    candidates
}

/// Arbitrate candidates that share hits.
///
/// Candidates are visited from largest to smallest. A short candidate that
/// reuses more than one flagged hit is dropped outright; otherwise two
/// candidates sharing more than two channels keep the larger one, then the
/// lower chi2 per DoF, then the earlier one.
pub(crate) fn remove_clones(candidates: &mut [SeedTrack], pool: &HitPool) {
    let hits = pool.hits();
    candidates.sort_by(|a, b| b.hits().len().cmp(&a.hits().len()));

    for i1 in 0..candidates.len() {
        if !candidates[i1].valid() {
            continue;
        }
        if candidates[i1].hits().len() != 6 {
            let n_used = candidates[i1]
                .hits()
                .iter()
                .filter(|&&idx| hits[idx as usize].is_used())
                .count();
            if n_used > 1 {
                candidates[i1].set_valid(false);
                continue;
            }
        }
        for i2 in (i1 + 1)..candidates.len() {
            if !candidates[i2].valid() {
                continue;
            }
            if n_common_channels(&candidates[i1], &candidates[i2], pool) > 2 {
                let (len1, len2) = (candidates[i1].hits().len(), candidates[i2].hits().len());
                if len1 > len2 {
                    candidates[i2].set_valid(false);
                } else if len2 > len1 {
                    candidates[i1].set_valid(false);
                } else if candidates[i1].chi2_per_dof() < candidates[i2].chi2_per_dof() {
                    candidates[i2].set_valid(false);
                } else {
                    candidates[i1].set_valid(false);
                }
            }
        }
    }
}

/// Number of channels two candidates share; both hit lists are in id
/// order, so a single merge walk suffices.
pub(crate) fn n_common_channels(t1: &SeedTrack, t2: &SeedTrack, pool: &HitPool) -> usize {
    let mut n_common = 0;
    let (h1, h2) = (t1.hits(), t2.hits());
    let (mut i1, mut i2) = (0, 0);
    while i1 < h1.len() && i2 < h2.len() {
        let id1 = pool.hit(h1[i1]).id();
        let id2 = pool.hit(h2[i2]).id();
        if id1 == id2 {
            n_common += 1;
            i1 += 1;
            i2 += 1;
        } else if id1 < id2 {
            i1 += 1;
        } else {
            i2 += 1;
        }
    }
    n_common
}
