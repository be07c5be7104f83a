//! A single position measurement on one detection plane.

use std::cell::Cell;

/// Opaque, totally ordered identifier of the detector channel that produced
/// a hit. Ordering and equality are all the seeding relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(pub u32);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A measurement in the bend coordinate of one plane.
///
/// For a stereo plane the measured position depends on the non-bend
/// coordinate through the plane's stereo slope: [`Hit::x_at`] evaluates it.
/// Bend-plane hits have `dxdy == 0`.
///
/// The `used` flag and the derived stereo `coord` are run-scoped scratch
/// state shared between the search phases. They use interior mutability so
/// the phases can mark hits while iterating the pool; the pool is
/// single-threaded by construction.
#[derive(Debug, Clone)]
pub struct Hit {
    id: ChannelId,
    x: f64,
    z: f64,
    w: f64,
    dxdy: f64,
    plane: u8,
    used: Cell<bool>,
    coord: Cell<f64>,
}

impl Hit {
    /// Create a new hit.
    ///
    /// Arguments
    /// ---------
    /// * `id`: the detector channel identifier
    /// * `x`: the measured position at y = 0 (mm)
    /// * `z`: the depth of the plane (mm)
    /// * `w`: the measurement weight, 1 / sigma^2
    /// * `dxdy`: the stereo slope of the plane (0 for bend planes)
    /// * `plane`: the plane code, 0..12
    ///
    /// Return
    /// ------
    /// * a new `Hit`, unused, with a zero stereo coordinate
    pub fn new(id: ChannelId, x: f64, z: f64, w: f64, dxdy: f64, plane: u8) -> Self {
        Hit {
            id,
            x,
            z,
            w,
            dxdy,
            plane,
            used: Cell::new(false),
            coord: Cell::new(0.0),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Measured position at y = 0 (mm).
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Measured position at the given non-bend coordinate y (mm).
    pub fn x_at(&self, y: f64) -> f64 {
        self.x + y * self.dxdy
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn dxdy(&self) -> f64 {
        self.dxdy
    }

    pub fn plane(&self) -> u8 {
        self.plane
    }

    pub fn is_stereo(&self) -> bool {
        self.dxdy != 0.0
    }

    pub fn is_used(&self) -> bool {
        self.used.get()
    }

    pub fn set_used(&self, used: bool) {
        self.used.set(used);
    }

    /// Derived stereo coordinate, valid only after stereo association has
    /// written it for the current seed.
    pub fn coord(&self) -> f64 {
        self.coord.get()
    }

    pub fn set_coord(&self, coord: f64) {
        self.coord.set(coord);
    }
}
