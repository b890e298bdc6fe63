//! sweepline: batched broad-phase collision detection (candidate pairs only)

pub mod types;
pub mod error;
pub mod api;
pub mod model;
pub mod bounds;
pub mod filter;
pub mod collector;
pub mod nxn;
pub mod sap;
pub mod dispatch;
pub mod broadphase;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::{BroadphaseError, Result};
pub use crate::model::{BatchState, GeomModel};
pub use crate::bounds::BoundingSphere;
pub use crate::collector::PairBuffer;
pub use crate::nxn::Nxn;
pub use crate::sap::SweepAndPrune;
pub use crate::dispatch::CollisionTable;
pub use crate::broadphase::Broadphase;
