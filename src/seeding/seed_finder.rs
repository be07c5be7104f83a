//! Seed finder: drives the per-half pipeline over one event.

use log::debug;

use crate::hits::hit_pool::HitPool;
use crate::hits::zone::Half;
use crate::seeding::stereo::add_stereo;
use crate::seeding::track::SeedTrack;
use crate::seeding::x_projection::find_x_projections;
use crate::seeding::SeedingParams;

/// Standalone seed search over one event.
///
/// The finder holds the validated configuration; all per-event state lives
/// in the [`HitPool`], so one finder serves any number of events.
///
/// ```rust,no_run
/// use seedling::{ChannelId, HitPool, PlaneDescriptor, SeedFinder, SeedingParams};
///
/// # fn planes() -> Vec<PlaneDescriptor> { unimplemented!() }
/// let mut pool = HitPool::new(&planes(), 8520.0).unwrap();
/// pool.add_hit(0, ChannelId(101), -12.3, 1.0).unwrap();
/// // ... fill the remaining zones ...
///
/// let finder = SeedFinder::new(SeedingParams::default());
/// for track in finder.run(&mut pool) {
///     println!("{} hits, chi2/dof {:.2}", track.hits().len(), track.chi2_per_dof());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SeedFinder {
    params: SeedingParams,
}

impl SeedFinder {
    pub fn new(params: SeedingParams) -> Self {
        SeedFinder { params }
    }

    pub fn params(&self) -> &SeedingParams {
        &self.params
    }

    /// Run the seeding over one event.
    ///
    /// Arguments
    /// ---------
    /// * `pool`: the event's hits; sort order and used flags are (re)set
    ///   here, so runs are independent
    ///
    /// Return
    /// ------
    /// * the accepted seed tracks of both halves, each with its fitted
    ///   trajectory, chi2 and DoF assigned
    pub fn run(&self, pool: &mut HitPool) -> Vec<SeedTrack> {
        pool.reset_used();
        pool.sort_by_x();
        debug!("seeding event with {} hits: {}", pool.n_hits(), self.params);

        let mut tracks: Vec<SeedTrack> = Vec::new();
        for half in Half::BOTH {
            let projections = find_x_projections(pool, half, &self.params);
            if self.params.x_only {
                tracks.extend(projections.into_iter().filter(SeedTrack::valid));
            } else {
                let extended = add_stereo(pool, &projections, half, &self.params);
                tracks.extend(extended.into_iter().filter(SeedTrack::valid));
            }
        }
        debug!("seeding found {} tracks", tracks.len());
        tracks
    }
}
