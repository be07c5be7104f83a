//! Hit data model: individual measurements, detection zones, and the
//! run-scoped pool shared by every phase of the seeding.

pub mod hit;
pub mod hit_pool;
pub mod zone;

pub use hit::{ChannelId, Hit};
pub use hit_pool::{HitPool, PlaneDescriptor};
pub use zone::{Half, Zone};
