//! Seed track candidate: a low-order polynomial trajectory plus the hits
//! supporting it.

use crate::constants::{HitIdx, TrackHits};
use crate::hits::hit::{ChannelId, Hit};
use crate::hits::hit_pool::HitPool;
use crate::hits::zone::Half;

/// A trajectory candidate through the seeding station.
///
/// The bend-plane projection is a quadratic in `dz = z - z_ref`,
/// `x(z) = ax + bx dz + cx dz^2`; the non-bend projection is linear,
/// `y(z) = ay + by dz`. Hits are stored as pool indices, kept in channel-id
/// order from construction so clone comparison can merge-walk two lists.
#[derive(Debug, Clone)]
pub struct SeedTrack {
    half: Half,
    z_ref: f64,
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    hits: TrackHits,
    valid: bool,
    chi2: f64,
    ndof: i32,
}

impl SeedTrack {
    /// Create a candidate from a hit-index set; the set is sorted by
    /// channel id here, duplicates are the caller's responsibility.
    pub(crate) fn new(half: Half, z_ref: f64, mut track_hits: TrackHits, hits: &[Hit]) -> Self {
        track_hits.sort_by_key(|&i| hits[i as usize].id());
        SeedTrack {
            half,
            z_ref,
            ax: 0.0,
            bx: 0.0,
            cx: 0.0,
            ay: 0.0,
            by: 0.0,
            hits: track_hits,
            valid: true,
            chi2: -1.0,
            ndof: -1,
        }
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn z_ref(&self) -> f64 {
        self.z_ref
    }

    /// Bend-plane position at depth z (mm).
    pub fn x(&self, z: f64) -> f64 {
        let dz = z - self.z_ref;
        self.ax + dz * (self.bx + dz * self.cx)
    }

    /// Bend-plane slope at depth z.
    pub fn x_slope(&self, z: f64) -> f64 {
        self.bx + 2.0 * (z - self.z_ref) * self.cx
    }

    /// Non-bend position at depth z (mm).
    pub fn y(&self, z: f64) -> f64 {
        self.ay + (z - self.z_ref) * self.by
    }

    /// Non-bend slope (constant along z).
    pub fn y_slope(&self) -> f64 {
        self.by
    }

    /// Signed residual of a hit: measured position at the trajectory's y,
    /// minus the trajectory's x, both at the hit's depth.
    pub fn distance(&self, hit: &Hit) -> f64 {
        hit.x_at(self.y(hit.z())) - self.x(hit.z())
    }

    /// Residual of a stereo hit converted to the non-bend coordinate;
    /// zero for bend-plane hits.
    pub fn delta_y(&self, hit: &Hit) -> f64 {
        if hit.is_stereo() {
            self.distance(hit) / hit.dxdy()
        } else {
            0.0
        }
    }

    /// Weighted squared residual of one hit.
    pub fn chi2_contribution(&self, hit: &Hit) -> f64 {
        let d = self.distance(hit);
        d * d * hit.w()
    }

    pub(crate) fn update_parameters(&mut self, dax: f64, dbx: f64, dcx: f64, day: f64, dby: f64) {
        self.ax += dax;
        self.bx += dbx;
        self.cx += dcx;
        self.ay += day;
        self.by += dby;
    }

    /// Pool indices of the supporting hits.
    pub fn hits(&self) -> &[HitIdx] {
        &self.hits
    }

    /// Channel ids of the supporting hits, in id order.
    pub fn hit_ids(&self, pool: &HitPool) -> Vec<ChannelId> {
        self.hits.iter().map(|&i| pool.hit(i).id()).collect()
    }

    pub(crate) fn add_hit(&mut self, idx: HitIdx) {
        self.hits.push(idx);
    }

    pub(crate) fn remove_hit_at(&mut self, pos: usize) {
        self.hits.remove(pos);
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// Total chi2 assigned by the last fit, -1 before any fit.
    pub fn chi2(&self) -> f64 {
        self.chi2
    }

    pub fn ndof(&self) -> i32 {
        self.ndof
    }

    pub fn chi2_per_dof(&self) -> f64 {
        self.chi2 / self.ndof as f64
    }

    pub(crate) fn set_chi2(&mut self, chi2: f64, ndof: i32) {
        self.chi2 = chi2;
        self.ndof = ndof;
    }
}

#[cfg(test)]
mod track_test {
    use super::*;
    use smallvec::smallvec;

    fn x_hit(id: u32, x: f64, z: f64) -> Hit {
        Hit::new(ChannelId(id), x, z, 1.0, 0.0, 0)
    }

    #[test]
    fn hits_are_id_sorted_at_construction() {
        let hits = vec![x_hit(30, 0.0, 8000.0), x_hit(10, 1.0, 8100.0), x_hit(20, 2.0, 8200.0)];
        let track = SeedTrack::new(Half::Upper, 8520.0, smallvec![0, 1, 2], &hits);
        assert_eq!(track.hits(), &[1, 2, 0]);
    }

    #[test]
    fn evaluators_follow_the_polynomials() {
        let hits: Vec<Hit> = Vec::new();
        let mut track = SeedTrack::new(Half::Upper, 8520.0, smallvec![], &hits);
        track.update_parameters(10.0, 0.5, 1e-4, 2.0, 0.03);
        assert_eq!(track.x(8520.0), 10.0);
        assert_eq!(track.x(8530.0), 10.0 + 0.5 * 10.0 + 1e-4 * 100.0);
        assert_eq!(track.x_slope(8530.0), 0.5 + 2.0 * 1e-4 * 10.0);
        assert_eq!(track.y(8520.0), 2.0);
        assert_eq!(track.y_slope(), 0.03);
    }

    #[test]
    fn stereo_distance_uses_the_predicted_y() {
        let hits: Vec<Hit> = Vec::new();
        let mut track = SeedTrack::new(Half::Upper, 8520.0, smallvec![], &hits);
        track.update_parameters(0.0, 0.0, 0.0, 100.0, 0.0);
        let stereo = Hit::new(ChannelId(1), 5.0, 8520.0, 1.0, 0.0874, 1);
        // measured x at y = 100 is 5 + 8.74, model x is 0
        assert_eq!(track.distance(&stereo), 5.0 + 0.0874 * 100.0);
        assert_eq!(track.delta_y(&stereo), track.distance(&stereo) / 0.0874);
        let bend = Hit::new(ChannelId(2), 5.0, 8520.0, 1.0, 0.0, 0);
        assert_eq!(track.delta_y(&bend), 0.0);
    }
}
