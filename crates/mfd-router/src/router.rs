//! Router: binds an A* pathfinder and keepout index to one component,
//! resolves queued route requests, and materialises them as polychannels.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use mfd_component::Component;
use mfd_geom::Shape;
use mfd_polychannel::{Entry, Polychannel, ShapeType, SparseShape};

use crate::astar::{a_star_3d, simplify_cardinal_path, Axis, Cell, SearchParams};
use crate::cache::{CachedRoute, RouteCache, RouteType};
use crate::error::{Result, RouterError};
use crate::keepout::{add_margin, is_inside, KeepoutEntry, KeepoutIndex, KeepoutKind};

/// A queued route request, resolved and materialised by [`Router::finalize`].
enum Request {
    Autoroute {
        input: String,
        output: String,
        label: String,
        timeout: Duration,
        heuristic_weight: f64,
        turn_weight: f64,
        direction_preference: Vec<Axis>,
    },
    Polychannel {
        input: String,
        output: String,
        label: String,
        shapes: Vec<Entry>,
    },
    FractionalPath {
        input: String,
        output: String,
        label: String,
        deltas: Vec<(f64, f64, f64)>,
    },
}

/// One resolved route: its label and materialised shape.
pub struct ResolvedRoute {
    /// The route's name, `"{input}__to__{output}"`.
    pub name: String,
    /// The caller-supplied label.
    pub label: String,
    /// The materialised channel solid.
    pub shape: Shape,
}

/// Binds channel cross-section and margin parameters to one component and
/// plans/materialises every queued route against its keepouts.
pub struct Router<'a> {
    component: &'a mut Component,
    channel_size: Cell,
    channel_margin: (f64, f64, f64),
    bounds: (f64, f64, f64, f64, f64, f64),
    index: KeepoutIndex,
    keepouts_by_port: HashMap<String, Vec<KeepoutEntry>>,
    requests: Vec<Request>,
}

impl<'a> Router<'a> {
    /// Bind a router to `component`, with the given channel cross-section
    /// and margin (in the component's own pixel/layer lattice).
    pub fn new(component: &'a mut Component, channel_size: Cell, channel_margin: (f64, f64, f64)) -> Self {
        let bounds = component.bounding_box_mm();
        let mut router = Self {
            component,
            channel_size,
            channel_margin,
            bounds,
            index: KeepoutIndex::new(),
            keepouts_by_port: HashMap::new(),
            requests: Vec::new(),
        };
        router.rebuild_index();
        router
    }

    fn rebuild_index(&mut self) {
        self.index = KeepoutIndex::new();
        self.keepouts_by_port.clear();
        let top_units = self.component.units();
        for (_, sub) in self.component.subcomponents() {
            let bbox = sub.bounding_box_mm();
            self.index.insert(KeepoutEntry { key: sub.name().unwrap_or("").to_string(), kind: KeepoutKind::Subcomponent, bbox });
            for (port_name, port) in sub.ports() {
                let bbox = add_margin(port.bounding_box_mm(sub.units(), top_units), self.channel_margin);
                let entry = KeepoutEntry { key: port_name.clone(), kind: KeepoutKind::Port, bbox };
                self.index.insert(entry.clone());
                self.keepouts_by_port.entry(port_name.clone()).or_default().push(entry);
            }
        }
        for (shape_name, shape) in self.component.shapes() {
            for (i, keepout) in shape.keepouts().iter().enumerate() {
                let bbox = add_margin((keepout.min.0, keepout.min.1, keepout.min.2, keepout.max.0, keepout.max.1, keepout.max.2), self.channel_margin);
                self.index.insert(KeepoutEntry { key: format!("{shape_name}_{i}"), kind: KeepoutKind::Shape, bbox });
            }
        }
    }

    /// Queue an A* autoroute between two dotted port paths.
    pub fn autoroute_channel(
        &mut self,
        input: &str,
        output: &str,
        label: &str,
        timeout: Duration,
        heuristic_weight: f64,
        turn_weight: f64,
        direction_preference: Vec<Axis>,
    ) -> Result<()> {
        self.require_port(input)?;
        self.require_port(output)?;
        self.requests.push(Request::Autoroute {
            input: input.to_string(),
            output: output.to_string(),
            label: label.to_string(),
            timeout,
            heuristic_weight,
            turn_weight,
            direction_preference,
        });
        Ok(())
    }

    /// Queue a manual route defined by an explicit polychannel shape list.
    pub fn route_with_polychannel(&mut self, input: &str, output: &str, label: &str, shapes: Vec<Entry>) -> Result<()> {
        self.require_port(input)?;
        self.require_port(output)?;
        self.requests.push(Request::Polychannel { input: input.to_string(), output: output.to_string(), label: label.to_string(), shapes });
        Ok(())
    }

    /// Queue a manual route defined by fractional deltas of the
    /// displacement from the input port to the output port. Each axis'
    /// deltas must sum to 1.0.
    pub fn route_with_fractional_path(&mut self, input: &str, output: &str, label: &str, deltas: Vec<(f64, f64, f64)>) -> Result<()> {
        self.require_port(input)?;
        self.require_port(output)?;
        for axis in 0..3 {
            let sum: f64 = deltas.iter().map(|d| match axis {
                0 => d.0,
                1 => d.1,
                _ => d.2,
            }).sum();
            if (sum - 1.0).abs() > 1e-6 {
                return Err(RouterError::FractionalPathNotNormalized { axis: axis as u8, sum });
            }
        }
        self.requests.push(Request::FractionalPath { input: input.to_string(), output: output.to_string(), label: label.to_string(), deltas });
        Ok(())
    }

    fn require_port(&self, path: &str) -> Result<()> {
        self.component.find_port(path).map(|_| ()).ok_or_else(|| RouterError::PortNotFound(path.to_string()))
    }

    fn port_origin_mm(&self, path: &str) -> (f64, f64, f64) {
        let (parent_path, _) = split_port_path(path);
        let parent = self.component.find_component(parent_path).expect("validated at queue time");
        let port = self.component.find_port(path).expect("validated at queue time");
        let (x0, y0, z0, _, _, _) = port.bounding_box_mm(parent.units(), self.component.units());
        (x0, y0, z0)
    }

    fn port_cell(&self, path: &str) -> Cell {
        let (x, y, z) = self.port_origin_mm(path);
        (x.round() as i64, y.round() as i64, z.round() as i64)
    }

    /// Move a port's starting cell outward, one step at a time, until it
    /// clears its own parent (so the search doesn't start inside a
    /// keepout the port itself sits on).
    fn move_outside_port(&self, path: &str) -> Cell {
        let port = self.component.find_port(path).expect("validated at queue time");
        let (parent_path, _) = split_port_path(path);
        let parent = self.component.find_component(parent_path).expect("validated at queue time");
        let mut pos = self.port_cell(path);
        let direction = port.surface_normal().to_vector();
        loop {
            let bbox = add_margin(cell_bbox(pos, self.channel_size), self.channel_margin);
            let parent_bounds = parent.bounding_box_mm();
            let clear = if parent_path.is_empty() {
                !is_inside(bbox, parent_bounds, None)
            } else {
                !crate::keepout::intersects(bbox, parent_bounds)
            };
            if clear {
                break;
            }
            pos = (pos.0 + direction.0, pos.1 + direction.1, pos.2 + direction.2);
        }
        pos
    }

    fn reachability_prefilter(&self, path: &str) -> Result<()> {
        let port = self.component.find_port(path).expect("validated at queue time");
        let pos = self.port_cell(path);
        let bbox = add_margin(cell_bbox(pos, self.channel_size), self.channel_margin);
        if !is_inside(bbox, self.bounds, Some(port.surface_normal().to_vector())) {
            return Err(RouterError::PortUnroutable(path.to_string()));
        }
        Ok(())
    }

    fn plan_autoroute(
        &mut self,
        input: &str,
        output: &str,
        timeout: Duration,
        heuristic_weight: f64,
        turn_weight: f64,
        direction_preference: &[Axis],
    ) -> Result<Vec<Cell>> {
        self.reachability_prefilter(input)?;
        self.reachability_prefilter(output)?;
        let start = self.move_outside_port(input);
        let goal = self.move_outside_port(output);
        let params = SearchParams {
            timeout,
            heuristic_weight,
            turn_weight,
            direction_preference: direction_preference.to_vec(),
            channel_size: self.channel_size,
            channel_margin: self.channel_margin,
        };
        let path = a_star_3d(start, goal, self.bounds, &self.index, &params).ok_or_else(|| RouterError::PortUnroutable(format!("{input}__to__{output}")))?;
        Ok(simplify_cardinal_path(&path))
    }

    fn materialise_waypoints(&self, waypoints: &[Cell]) -> Result<Shape> {
        let entries: Vec<Entry> = waypoints
            .iter()
            .map(|&(x, y, z)| {
                Entry::Shape(
                    SparseShape::new()
                        .shape_type(ShapeType::Cube)
                        .position((x as f64, y as f64, z as f64))
                        .size((self.channel_size.0 as f64, self.channel_size.1 as f64, self.channel_size.2 as f64))
                        .absolute(),
                )
            })
            .collect();
        Polychannel::build(entries, false)
            .map(Polychannel::into_shape)
            .map_err(|e| RouterError::Materialisation { name: "waypoints".to_string(), source: e.to_string() })
    }

    /// Run the finalisation pipeline: load the cache, then for every queued
    /// request either reuse a cached autoroute path whose endpoints still
    /// match (skipping the A* search) or plan/materialise it fresh, persist
    /// the cache, and return every route that resolved. A request that
    /// fails to materialise puts its ports' keepouts back and is dropped
    /// (autoroute) or aborts the whole batch (manual routes, which are
    /// caller errors rather than routing failures).
    pub fn finalize(&mut self, instantiation_dir: &Path, source_file_stem: &str) -> Result<Vec<ResolvedRoute>> {
        let component_name = self.component.name().unwrap_or("device").to_string();
        let cache_path = RouteCache::cache_path(instantiation_dir, source_file_stem, &component_name);
        let mut cache = RouteCache::load(&cache_path)?;
        let mut resolved = Vec::new();

        let requests = std::mem::take(&mut self.requests);
        for request in requests {
            match request {
                Request::Polychannel { input, output, label, shapes } => {
                    let name = format!("{input}__to__{output}");
                    self.remove_port_keepouts(&input);
                    self.remove_port_keepouts(&output);
                    let input_origin = self.port_origin_mm(&input);
                    let output_origin = self.port_origin_mm(&output);
                    match self.materialise_entries(&input, &output, shapes) {
                        Ok(shape) => {
                            self.add_shape_keepouts(&name, &shape);
                            cache.routes.insert(name.clone(), CachedRoute { route_type: RouteType::Polychannel, input_origin, output_origin, path: Vec::new() });
                            resolved.push(ResolvedRoute { name, label, shape });
                        }
                        Err(e) => {
                            self.add_back_port_keepouts(&input);
                            self.add_back_port_keepouts(&output);
                            return Err(e);
                        }
                    }
                }
                Request::FractionalPath { input, output, label, deltas } => {
                    let name = format!("{input}__to__{output}");
                    self.remove_port_keepouts(&input);
                    self.remove_port_keepouts(&output);
                    let input_origin = self.port_origin_mm(&input);
                    let output_origin = self.port_origin_mm(&output);
                    let waypoints = self.fractional_waypoints(&input, &output, &deltas);
                    match self.materialise_waypoints(&waypoints) {
                        Ok(shape) => {
                            self.add_shape_keepouts(&name, &shape);
                            cache.routes.insert(name.clone(), CachedRoute { route_type: RouteType::FractionalPath, input_origin, output_origin, path: waypoints });
                            resolved.push(ResolvedRoute { name, label, shape });
                        }
                        Err(e) => {
                            self.add_back_port_keepouts(&input);
                            self.add_back_port_keepouts(&output);
                            return Err(e);
                        }
                    }
                }
                Request::Autoroute { input, output, label, timeout, heuristic_weight, turn_weight, direction_preference } => {
                    let name = format!("{input}__to__{output}");
                    self.remove_port_keepouts(&input);
                    self.remove_port_keepouts(&output);
                    let input_origin = self.port_origin_mm(&input);
                    let output_origin = self.port_origin_mm(&output);
                    let cached_path = cache
                        .routes
                        .get(&name)
                        .filter(|entry| entry.is_valid_for(RouteType::Autoroute, input_origin, output_origin, None))
                        .map(|entry| entry.path.clone());
                    let planned = match cached_path {
                        Some(path) => Ok(path),
                        None => self.plan_autoroute(&input, &output, timeout, heuristic_weight, turn_weight, &direction_preference),
                    };
                    match planned {
                        Ok(path) => match self.materialise_waypoints(&path) {
                            Ok(shape) => {
                                self.add_shape_keepouts(&name, &shape);
                                cache.routes.insert(name.clone(), CachedRoute { route_type: RouteType::Autoroute, input_origin, output_origin, path });
                                resolved.push(ResolvedRoute { name, label, shape });
                            }
                            Err(_) => {
                                self.add_back_port_keepouts(&input);
                                self.add_back_port_keepouts(&output);
                            }
                        },
                        Err(_) => {
                            self.add_back_port_keepouts(&input);
                            self.add_back_port_keepouts(&output);
                        }
                    }
                }
            }
        }

        if !resolved.is_empty() {
            cache.save(&cache_path)?;
        }
        Ok(resolved)
    }

    fn materialise_entries(&self, _input: &str, _output: &str, shapes: Vec<Entry>) -> Result<Shape> {
        Polychannel::build(shapes, false)
            .map(Polychannel::into_shape)
            .map_err(|e| RouterError::Materialisation { name: "polychannel".to_string(), source: e.to_string() })
    }

    fn fractional_waypoints(&self, input: &str, output: &str, deltas: &[(f64, f64, f64)]) -> Vec<Cell> {
        let start = self.port_origin_mm(input);
        let end = self.port_origin_mm(output);
        let span = (end.0 - start.0, end.1 - start.1, end.2 - start.2);
        let mut points = Vec::with_capacity(deltas.len());
        let mut acc = (0.0, 0.0, 0.0);
        for d in deltas {
            acc = (acc.0 + d.0, acc.1 + d.1, acc.2 + d.2);
            points.push((
                (start.0 + acc.0 * span.0).round() as i64,
                (start.1 + acc.1 * span.1).round() as i64,
                (start.2 + acc.2 * span.2).round() as i64,
            ));
        }
        points
    }

    fn remove_port_keepouts(&mut self, path: &str) {
        let (_, leaf) = split_port_path(path);
        if let Some(entries) = self.keepouts_by_port.get(leaf) {
            for entry in entries {
                self.index.remove_by_key(&entry.key);
            }
        }
    }

    fn add_back_port_keepouts(&mut self, path: &str) {
        let (_, leaf) = split_port_path(path);
        if let Some(entries) = self.keepouts_by_port.get(leaf).cloned() {
            for entry in entries {
                self.index.insert(entry);
            }
        }
    }

    fn add_shape_keepouts(&mut self, name: &str, shape: &Shape) {
        for (i, keepout) in shape.keepouts().iter().enumerate() {
            let bbox = (keepout.min.0, keepout.min.1, keepout.min.2, keepout.max.0, keepout.max.1, keepout.max.2);
            self.index.insert(KeepoutEntry { key: format!("{name}_{i}"), kind: KeepoutKind::Shape, bbox });
        }
    }
}

fn split_port_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('.') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", path),
    }
}

fn cell_bbox(pos: Cell, size: Cell) -> (f64, f64, f64, f64, f64, f64) {
    (pos.0 as f64, pos.1 as f64, pos.2 as f64, (pos.0 + size.0) as f64, (pos.1 + size.1) as f64, (pos.2 + size.2) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfd_component::{Port, PortKind, SurfaceNormal};
    use mfd_units::UnitScale;

    fn two_port_device() -> Component {
        let flat = UnitScale::new(1.0, 1.0);

        let mut left = Component::new((2, 2, 2)).with_units(flat);
        left.add_port("outlet", Port::new(PortKind::Out, (2, 1, 1), (1, 1, 1), SurfaceNormal::PosX)).unwrap();

        let mut right = Component::new((2, 2, 2)).with_units(flat);
        right.add_port("inlet", Port::new(PortKind::In, (-1, 1, 1), (1, 1, 1), SurfaceNormal::NegX)).unwrap();
        right.translate(10, 0, 0);
        right.run_translate(flat);

        let mut parent = Component::new((20, 20, 5)).with_units(flat);
        parent.add_subcomponent("left", left).unwrap();
        parent.add_subcomponent("right", right).unwrap();
        parent
    }

    #[test]
    fn autoroute_finds_a_direct_path_between_two_ports() {
        let mut parent = two_port_device();
        let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
        router
            .autoroute_channel(
                "left.outlet",
                "right.inlet",
                "main",
                Duration::from_secs(5),
                10.0,
                2.0,
                vec![Axis::X, Axis::Y, Axis::Z],
            )
            .unwrap();

        let dir = std::env::temp_dir().join(format!("mfd_router_test_direct_{:p}", &parent));
        let routes = router.finalize(&dir, "job").unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].name, "left.outlet__to__right.inlet");
        assert!(!routes[0].shape.solid().is_empty());
    }

    #[test]
    fn autoroute_rejects_unknown_ports() {
        let mut parent = two_port_device();
        let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
        let err = router.autoroute_channel(
            "left.nope",
            "right.inlet",
            "main",
            Duration::from_secs(5),
            10.0,
            2.0,
            vec![Axis::X],
        );
        assert!(matches!(err, Err(RouterError::PortNotFound(_))));
    }

    #[test]
    fn fractional_path_rejects_unnormalised_deltas() {
        let mut parent = two_port_device();
        let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
        let err = router.route_with_fractional_path(
            "left.outlet",
            "right.inlet",
            "main",
            vec![(0.5, 1.0, 1.0), (0.25, 0.0, 0.0)],
        );
        assert!(matches!(err, Err(RouterError::FractionalPathNotNormalized { axis: 0, .. })));
    }

    #[test]
    fn fractional_path_materialises_without_planning() {
        let mut parent = two_port_device();
        let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
        router
            .route_with_fractional_path("left.outlet", "right.inlet", "main", vec![(0.5, 0.0, 0.0), (0.5, 1.0, 1.0)])
            .unwrap();

        let dir = std::env::temp_dir().join(format!("mfd_router_test_fractional_{:p}", &parent));
        let routes = router.finalize(&dir, "job").unwrap();
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(routes.len(), 1);
        assert!(!routes[0].shape.solid().is_empty());
    }

    #[test]
    fn a_cached_autoroute_path_is_reused_without_replanning() {
        let mut parent = two_port_device();
        let dir = std::env::temp_dir().join(format!("mfd_router_test_cache_{:p}", &parent));
        let _ = std::fs::remove_dir_all(&dir);

        {
            let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
            router
                .autoroute_channel("left.outlet", "right.inlet", "main", Duration::from_secs(5), 10.0, 2.0, vec![Axis::X])
                .unwrap();
            let routes = router.finalize(&dir, "job").unwrap();
            assert_eq!(routes.len(), 1);
        }

        let cache_path = RouteCache::cache_path(&dir, "job", "device");
        assert!(RouteCache::load(&cache_path).unwrap().routes.contains_key("left.outlet__to__right.inlet"));

        {
            let mut router = Router::new(&mut parent, (1, 1, 1), (0.0, 0.0, 0.0));
            router
                .autoroute_channel("left.outlet", "right.inlet", "main", Duration::from_secs(5), 10.0, 2.0, vec![Axis::X])
                .unwrap();
            let routes = router.finalize(&dir, "job").unwrap();
            assert_eq!(routes.len(), 1);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }
}
