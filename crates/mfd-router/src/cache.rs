//! On-disk route cache: a deterministic binary stand-in for the reference
//! implementation's pickle file, keyed the same way.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};

/// Which kind of route request produced a cached entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteType {
    /// Resolved by the A* pathfinder.
    Autoroute,
    /// Given directly as a polychannel shape list.
    Polychannel,
    /// Given as a sequence of normalised fractional deltas.
    FractionalPath,
}

/// One cached route: enough to revalidate and rematerialise without
/// re-planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRoute {
    /// Which request kind produced this entry.
    pub route_type: RouteType,
    /// The input port's origin at cache time, in millimetres.
    pub input_origin: (f64, f64, f64),
    /// The output port's origin at cache time, in millimetres.
    pub output_origin: (f64, f64, f64),
    /// Waypoints the route passes through (empty for a pure autoroute
    /// entry revalidated by endpoint match alone).
    pub path: Vec<(i64, i64, i64)>,
}

impl CachedRoute {
    /// A cache entry is valid iff the route type, both port origins, and
    /// (for anything but an autoroute) the path match exactly.
    pub fn is_valid_for(
        &self,
        route_type: RouteType,
        input_origin: (f64, f64, f64),
        output_origin: (f64, f64, f64),
        path: Option<&[(i64, i64, i64)]>,
    ) -> bool {
        if self.route_type != route_type {
            return false;
        }
        if self.input_origin != input_origin || self.output_origin != output_origin {
            return false;
        }
        match (route_type, path) {
            (RouteType::Autoroute, _) => true,
            (_, Some(path)) => self.path == path,
            (_, None) => false,
        }
    }
}

/// The persisted cache for one component: every route name's cached
/// result, keyed `"{inputFQN}__to__{outputFQN}"`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteCache {
    /// Cached routes, keyed by route name.
    pub routes: HashMap<String, CachedRoute>,
}

impl RouteCache {
    /// The conventional cache file path: `{instantiation_dir}/
    /// {source_file_stem}_cache/{component_name}.bin`.
    pub fn cache_path(instantiation_dir: &Path, source_file_stem: &str, component_name: &str) -> PathBuf {
        instantiation_dir
            .join(format!("{source_file_stem}_cache"))
            .join(format!("{component_name}.bin"))
    }

    /// Load a cache file, or an empty cache if it doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let bytes = fs::read(path).map_err(|e| RouterError::CacheIo(e.to_string()))?;
        bincode::deserialize(&bytes).map_err(|e| RouterError::CacheIo(e.to_string()))
    }

    /// Persist the cache, creating its parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RouterError::CacheIo(e.to_string()))?;
        }
        let bytes = bincode::serialize(self).map_err(|e| RouterError::CacheIo(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| RouterError::CacheIo(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoroute_entry_is_valid_regardless_of_path() {
        let entry = CachedRoute {
            route_type: RouteType::Autoroute,
            input_origin: (0.0, 0.0, 0.0),
            output_origin: (1.0, 1.0, 1.0),
            path: vec![(1, 2, 3)],
        };
        assert!(entry.is_valid_for(RouteType::Autoroute, (0.0, 0.0, 0.0), (1.0, 1.0, 1.0), None));
    }

    #[test]
    fn polychannel_entry_requires_matching_path() {
        let entry = CachedRoute {
            route_type: RouteType::Polychannel,
            input_origin: (0.0, 0.0, 0.0),
            output_origin: (1.0, 1.0, 1.0),
            path: vec![(1, 2, 3)],
        };
        assert!(entry.is_valid_for(
            RouteType::Polychannel,
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
            Some(&[(1, 2, 3)])
        ));
        assert!(!entry.is_valid_for(
            RouteType::Polychannel,
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
            Some(&[(9, 9, 9)])
        ));
    }

    #[test]
    fn cache_path_follows_the_documented_convention() {
        let path = RouteCache::cache_path(Path::new("/tmp/job"), "device", "mixer");
        assert_eq!(path, Path::new("/tmp/job/device_cache/mixer.bin"));
    }
}
