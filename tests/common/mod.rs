//! Shared helpers for the integration tests: a fixed station geometry and
//! synthetic track generation.

#![allow(dead_code)]

use seedling::{ChannelId, Half, HitPool, PlaneDescriptor};

/// Depth the trajectory polynomials expand around (mm).
pub const Z_REF: f64 = 8520.0;

/// Plane depths of the test geometry: three stations of four layers (mm).
pub const PLANE_Z: [f64; 12] = [
    7826.0, 7896.0, 7966.0, 8036.0, 8508.0, 8578.0, 8648.0, 8718.0, 9193.0, 9263.0, 9333.0,
    9403.0,
];

/// Stereo slope of the u/v layers (about five degrees).
pub const STEREO_SLOPE: f64 = 0.0874;

/// The bend-plane (x-measuring) planes of the x-u-v-x station layout.
pub const X_PLANES: [usize; 6] = [0, 3, 4, 7, 8, 11];

pub fn plane_dxdy(plane: usize) -> f64 {
    match plane % 4 {
        1 => STEREO_SLOPE,
        2 => -STEREO_SLOPE,
        _ => 0.0,
    }
}

pub fn planes() -> Vec<PlaneDescriptor> {
    PLANE_Z
        .iter()
        .enumerate()
        .map(|(p, &z)| PlaneDescriptor {
            z,
            dxdy: plane_dxdy(p),
        })
        .collect()
}

pub fn make_pool() -> HitPool {
    HitPool::new(&planes(), Z_REF).unwrap()
}

pub fn zone_of(plane: usize, half: Half) -> usize {
    2 * plane + half.index()
}

/// A generated particle: quadratic in the bend plane, linear in y.
pub struct TrackSpec {
    pub x0: f64,
    pub tx: f64,
    pub cx: f64,
    pub ty: f64,
}

impl TrackSpec {
    pub fn line(x0: f64, tx: f64) -> Self {
        TrackSpec {
            x0,
            tx,
            cx: 0.0,
            ty: 0.0,
        }
    }

    pub fn x_at(&self, z: f64) -> f64 {
        self.x0 + self.tx * z + self.cx * (z - Z_REF) * (z - Z_REF)
    }

    pub fn y_at(&self, z: f64) -> f64 {
        self.ty * z
    }
}

/// Deposit one hit per plane (except `skip_planes`) for the given particle,
/// with unit weight. Stereo planes store the measurement at y = 0.
///
/// Returns the channel ids, ordered by plane.
pub fn add_track(
    pool: &mut HitPool,
    half: Half,
    spec: &TrackSpec,
    skip_planes: &[usize],
    next_id: &mut u32,
) -> Vec<ChannelId> {
    let mut ids = Vec::new();
    for (plane, &z) in PLANE_Z.iter().enumerate() {
        if skip_planes.contains(&plane) {
            continue;
        }
        let dxdy = plane_dxdy(plane);
        let x = spec.x_at(z) - dxdy * spec.y_at(z);
        let id = ChannelId(*next_id);
        *next_id += 1;
        pool.add_hit(zone_of(plane, half), id, x, 1.0).unwrap();
        ids.push(id);
    }
    ids
}

/// Ids of the bend-plane hits among `ids`, assuming nothing was skipped.
pub fn x_plane_ids(ids: &[ChannelId]) -> Vec<ChannelId> {
    X_PLANES.iter().map(|&p| ids[p]).collect()
}
