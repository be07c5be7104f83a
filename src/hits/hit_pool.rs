//! Run-scoped hit pool: every phase of the seeding reads the same hits
//! through the same zone views.

use log::debug;

use crate::constants::{HitIdx, N_PLANES, N_ZONES};
use crate::hits::hit::{ChannelId, Hit};
use crate::hits::zone::{Half, Zone};
use crate::seedling_errors::SeedlingError;

/// Geometry of one detection plane, shared by its two zones.
#[derive(Debug, Clone, Copy)]
pub struct PlaneDescriptor {
    /// Depth of the plane (mm).
    pub z: f64,
    /// Stereo slope, 0 for bend planes.
    pub dxdy: f64,
}

/// The hits of one event, organized into the 24 zones of the station layout.
///
/// The pool owns the hits; zones hold index buffers into it. Zone index is
/// `2 * plane + half`, so the x zones of a half are the even or odd zones
/// of the bend planes and the stereo zones interleave with them.
///
/// A pool can be reused across events: [`HitPool::clear`] drops the hits
/// and keeps the geometry.
#[derive(Debug, Clone)]
pub struct HitPool {
    hits: Vec<Hit>,
    zones: Vec<Zone>,
    z_reference: f64,
}

impl HitPool {
    /// Build an empty pool from the plane geometry.
    ///
    /// Arguments
    /// ---------
    /// * `planes`: exactly [`N_PLANES`] descriptors, ordered by plane code
    /// * `z_reference`: the depth (mm) the trajectory polynomials expand around
    ///
    /// Return
    /// ------
    /// * an empty `HitPool`, or [`SeedlingError::InvalidGeometry`] when the
    ///   descriptor list has the wrong length or a non-finite entry
    pub fn new(planes: &[PlaneDescriptor], z_reference: f64) -> Result<Self, SeedlingError> {
        if planes.len() != N_PLANES {
            return Err(SeedlingError::InvalidGeometry(format!(
                "expected {} plane descriptors, got {}",
                N_PLANES,
                planes.len()
            )));
        }
        if !z_reference.is_finite() {
            return Err(SeedlingError::InvalidGeometry(
                "z_reference must be finite".into(),
            ));
        }
        for (plane, desc) in planes.iter().enumerate() {
            if !desc.z.is_finite() || !desc.dxdy.is_finite() || desc.z == 0.0 {
                return Err(SeedlingError::InvalidGeometry(format!(
                    "plane {plane} has invalid geometry (z = {}, dxdy = {})",
                    desc.z, desc.dxdy
                )));
            }
        }

        let mut zones = Vec::with_capacity(N_ZONES);
        for (plane, desc) in planes.iter().enumerate() {
            for half in Half::BOTH {
                zones.push(Zone::new(plane as u8, half, desc.z, desc.dxdy));
            }
        }
        Ok(HitPool {
            hits: Vec::new(),
            zones,
            z_reference,
        })
    }

    /// Add one hit to a zone; plane geometry (z, stereo slope, plane code)
    /// is taken from the zone.
    ///
    /// Arguments
    /// ---------
    /// * `zone`: the zone index, `2 * plane + half`
    /// * `id`: the detector channel identifier
    /// * `x`: the measured position at y = 0 (mm)
    /// * `w`: the measurement weight, 1 / sigma^2
    ///
    /// Return
    /// ------
    /// * the pool index of the new hit, or
    ///   [`SeedlingError::ZoneIndexOutOfRange`]
    pub fn add_hit(
        &mut self,
        zone: usize,
        id: ChannelId,
        x: f64,
        w: f64,
    ) -> Result<HitIdx, SeedlingError> {
        let z = self
            .zones
            .get_mut(zone)
            .ok_or(SeedlingError::ZoneIndexOutOfRange(zone))?;
        let idx = self.hits.len() as HitIdx;
        self.hits
            .push(Hit::new(id, x, z.z(), w, z.dxdy(), z.plane()));
        z.push(idx);
        Ok(idx)
    }

    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    pub fn hit(&self, idx: HitIdx) -> &Hit {
        &self.hits[idx as usize]
    }

    pub fn zone(&self, zone: usize) -> &Zone {
        &self.zones[zone]
    }

    pub fn n_hits(&self) -> usize {
        self.hits.len()
    }

    pub fn z_reference(&self) -> f64 {
        self.z_reference
    }

    /// Clear the `used` flags of every hit. Runs are independent; the
    /// driver calls this before each search.
    pub fn reset_used(&self) {
        for hit in &self.hits {
            hit.set_used(false);
        }
    }

    /// Order every zone by ascending x position (the window-search order).
    pub fn sort_by_x(&mut self) {
        let hits = &self.hits;
        for zone in &mut self.zones {
            zone.sort_by_x(hits);
        }
        debug!("sorted {} hits in {} zones by x", hits.len(), N_ZONES);
    }

    /// Order every zone by ascending channel id (the lookup order).
    pub fn sort_by_id(&mut self) {
        let hits = &self.hits;
        for zone in &mut self.zones {
            zone.sort_by_id(hits);
        }
    }

    /// Drop all hits, keeping the geometry, so the pool can take the next
    /// event without reallocation.
    pub fn clear(&mut self) {
        self.hits.clear();
        for zone in &mut self.zones {
            zone.clear();
        }
    }
}
