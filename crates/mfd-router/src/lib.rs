//! 3D autorouter: an R-tree keepout index, an A* pathfinder over the
//! integer pixel/layer grid, and a deterministic on-disk route cache.

#![warn(missing_docs)]

mod astar;
mod cache;
mod error;
mod keepout;
mod router;

pub use astar::{Axis, Cell, SearchParams};
pub use cache::{CachedRoute, RouteCache, RouteType};
pub use error::{Result, RouterError};
pub use keepout::{KeepoutEntry, KeepoutIndex, KeepoutKind};
pub use router::{ResolvedRoute, Router};
