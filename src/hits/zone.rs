//! Detection zones: one half of one plane, holding an ordered view of the
//! pool's hits for that region.

use crate::constants::HitIdx;
use crate::hits::hit::{ChannelId, Hit};

/// Upper or lower half of the detector. Zones of the two halves never share
/// hits, so the two halves are searched independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Upper,
    Lower,
}

impl Half {
    pub const BOTH: [Half; 2] = [Half::Upper, Half::Lower];

    /// Zone-index offset of this half: `zone = 2 * plane + half.index()`.
    pub fn index(self) -> usize {
        match self {
            Half::Upper => 0,
            Half::Lower => 1,
        }
    }
}

/// One half of one detection plane.
///
/// A zone owns an index buffer into the shared hit pool. The buffer carries
/// one of two orderings, switched by the pool for the phase at hand:
/// ascending x position for the window searches, ascending channel id for
/// id lookups.
#[derive(Debug, Clone)]
pub struct Zone {
    plane: u8,
    half: Half,
    z: f64,
    dxdy: f64,
    hits: Vec<HitIdx>,
}

impl Zone {
    pub(crate) fn new(plane: u8, half: Half, z: f64, dxdy: f64) -> Self {
        Zone {
            plane,
            half,
            z,
            dxdy,
            hits: Vec::new(),
        }
    }

    pub fn plane(&self) -> u8 {
        self.plane
    }

    pub fn half(&self) -> Half {
        self.half
    }

    /// Depth of the plane (mm).
    pub fn z(&self) -> f64 {
        self.z
    }

    /// Stereo slope of the plane, 0 for bend planes.
    pub fn dxdy(&self) -> f64 {
        self.dxdy
    }

    /// Whether this is a bend-plane (x-measuring) zone.
    pub fn is_x(&self) -> bool {
        self.dxdy == 0.0
    }

    /// Hit indices in the current zone ordering.
    pub fn hits(&self) -> &[HitIdx] {
        &self.hits
    }

    pub(crate) fn push(&mut self, idx: HitIdx) {
        self.hits.push(idx);
    }

    pub(crate) fn clear(&mut self) {
        self.hits.clear();
    }

    pub(crate) fn sort_by_x(&mut self, hits: &[Hit]) {
        self.hits
            .sort_by(|&a, &b| hits[a as usize].x().total_cmp(&hits[b as usize].x()));
    }

    pub(crate) fn sort_by_id(&mut self, hits: &[Hit]) {
        self.hits
            .sort_by_key(|&a| hits[a as usize].id());
    }

    /// Position of the first hit with `x >= x_min`.
    ///
    /// Requires the zone to be in x order; every window search starts here
    /// and then scans forward while the position stays below its upper edge.
    pub fn lower_bound_x(&self, hits: &[Hit], x_min: f64) -> usize {
        self.hits
            .partition_point(|&i| hits[i as usize].x() < x_min)
    }

    /// Look up a hit of this zone by channel id.
    ///
    /// Requires the zone to be in id order.
    pub fn find_by_id(&self, hits: &[Hit], id: ChannelId) -> Option<HitIdx> {
        let pos = self.hits.partition_point(|&i| hits[i as usize].id() < id);
        match self.hits.get(pos) {
            Some(&i) if hits[i as usize].id() == id => Some(i),
            _ => None,
        }
    }
}
