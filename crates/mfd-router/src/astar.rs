//! 3D grid A* over the keepout index.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use crate::keepout::{add_margin, is_inside, KeepoutIndex};

/// An integer grid cell.
pub type Cell = (i64, i64, i64);

const AXIS_DIRECTIONS: [[Cell; 2]; 3] = [[(1, 0, 0), (-1, 0, 0)], [(0, 1, 0), (0, -1, 0)], [(0, 0, 1), (0, 0, -1)]];

/// Which cardinal axis a direction-preference letter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// X.
    X,
    /// Y.
    Y,
    /// Z.
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Tuning parameters for one A* search.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Wall-clock deadline for the search.
    pub timeout: Duration,
    /// Weight on the Manhattan heuristic.
    pub heuristic_weight: f64,
    /// Weight on the accumulated turn count.
    pub turn_weight: f64,
    /// Tie-break order when the dynamic largest-delta rule is ambiguous.
    pub direction_preference: Vec<Axis>,
    /// Cross-section of the channel being routed (pixels/layers).
    pub channel_size: Cell,
    /// Margin added around the channel cross-section when validating.
    pub channel_margin: (f64, f64, f64),
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            heuristic_weight: 10.0,
            turn_weight: 2.0,
            direction_preference: vec![Axis::X, Axis::Y, Axis::Z],
            channel_size: (0, 0, 0),
            channel_margin: (0.0, 0.0, 0.0),
        }
    }
}

struct Node {
    pos: Cell,
    parent: Option<usize>,
    cost: i64,
    turns: i64,
    direction: Option<Cell>,
}

struct HeapEntry {
    index: usize,
    priority: f64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for HeapEntry {}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; we want the lowest-priority node first.
        other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
    }
}

fn manhattan(a: Cell, b: Cell) -> i64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs() + (a.2 - b.2).abs()
}

fn cell_bbox(pos: Cell, size: Cell) -> (f64, f64, f64, f64, f64, f64) {
    (
        pos.0 as f64,
        pos.1 as f64,
        pos.2 as f64,
        (pos.0 + size.0) as f64,
        (pos.1 + size.1) as f64,
        (pos.2 + size.2) as f64,
    )
}

/// Whether a cell is routable: its channel-sized box, expanded by the
/// margin, fits inside `bounds`, and a 1px-shrunk version of the unmargined
/// box has no keepout intersections.
fn is_valid_cell(
    pos: Cell,
    params: &SearchParams,
    bounds: (f64, f64, f64, f64, f64, f64),
    index: &KeepoutIndex,
) -> bool {
    let bbox = cell_bbox(pos, params.channel_size);
    let margined = add_margin(bbox, params.channel_margin);
    if !is_inside(margined, bounds, None) {
        return false;
    }
    index.shrunk_box_is_clear(bbox)
}

/// Order the six cardinal directions for one expansion step: the axis with
/// the largest remaining Manhattan delta between `from` and `goal` goes
/// first; ties fall back to `direction_preference`. This implements the
/// dynamic-only resolution documented for the direction-preference choice.
fn ordered_directions(from: Cell, goal: Cell, preference: &[Axis]) -> Vec<Cell> {
    let deltas = [
        (from.0 - goal.0).abs(),
        (from.1 - goal.1).abs(),
        (from.2 - goal.2).abs(),
    ];
    let mut axes: Vec<usize> = (0..3).collect();
    axes.sort_by(|&a, &b| {
        deltas[b].cmp(&deltas[a]).then_with(|| {
            let pref_a = preference.iter().position(|ax| ax.index() == a).unwrap_or(a);
            let pref_b = preference.iter().position(|ax| ax.index() == b).unwrap_or(b);
            pref_a.cmp(&pref_b)
        })
    });
    let mut out = Vec::with_capacity(6);
    for axis in axes {
        out.extend_from_slice(&AXIS_DIRECTIONS[axis]);
    }
    out
}

/// Run A* from `start` to `goal`. Returns the full (unsimplified) cell
/// path, or `None` if unreachable or timed out.
pub fn a_star_3d(
    start: Cell,
    goal: Cell,
    bounds: (f64, f64, f64, f64, f64, f64),
    index: &KeepoutIndex,
    params: &SearchParams,
) -> Option<Vec<Cell>> {
    let deadline = Instant::now() + params.timeout;
    let mut arena: Vec<Node> = vec![Node { pos: start, parent: None, cost: 0, turns: 0, direction: None }];
    let mut heap = BinaryHeap::new();
    heap.push(HeapEntry { index: 0, priority: heuristic_priority(0, &arena, goal, params) });
    let mut visited: HashMap<Cell, (i64, i64)> = HashMap::new();

    while let Some(HeapEntry { index: current_idx, .. }) = heap.pop() {
        if Instant::now() > deadline {
            return None;
        }
        let current_pos = arena[current_idx].pos;
        if current_pos == goal {
            return Some(reconstruct_path(&arena, current_idx));
        }
        let current_cost = arena[current_idx].cost;
        let current_turns = arena[current_idx].turns;
        if let Some(&(c, t)) = visited.get(&current_pos) {
            if c <= current_cost && t <= current_turns {
                continue;
            }
        }
        visited.insert(current_pos, (current_cost, current_turns));

        let directions = ordered_directions(current_pos, goal, &params.direction_preference);
        for d in directions {
            let neighbor_pos = (current_pos.0 + d.0, current_pos.1 + d.1, current_pos.2 + d.2);
            if !is_valid_cell(neighbor_pos, params, bounds, index) {
                continue;
            }
            let current_direction = arena[current_idx].direction;
            let is_turn = current_direction.is_some() && current_direction != Some(d);
            let turns = current_turns + i64::from(is_turn);
            let cost = current_cost + 1;
            let node_index = arena.len();
            arena.push(Node { pos: neighbor_pos, parent: Some(current_idx), cost, turns, direction: Some(d) });
            heap.push(HeapEntry { index: node_index, priority: priority_of(cost, turns, manhattan(neighbor_pos, goal), params) });
        }
    }
    None
}

fn heuristic_priority(index: usize, arena: &[Node], goal: Cell, params: &SearchParams) -> f64 {
    let node = &arena[index];
    priority_of(node.cost, node.turns, manhattan(node.pos, goal), params)
}

fn priority_of(cost: i64, turns: i64, heuristic: i64, params: &SearchParams) -> f64 {
    cost as f64 + params.heuristic_weight * heuristic as f64 + params.turn_weight * turns as f64
}

fn reconstruct_path(arena: &[Node], mut index: usize) -> Vec<Cell> {
    let mut path = Vec::new();
    loop {
        path.push(arena[index].pos);
        match arena[index].parent {
            Some(parent) => index = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Collapse consecutive duplicates, then collapse runs of collinear points
/// to just their endpoints.
pub fn simplify_cardinal_path(points: &[Cell]) -> Vec<Cell> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut deduped = vec![points[0]];
    for &p in &points[1..] {
        if p != *deduped.last().unwrap() {
            deduped.push(p);
        }
    }
    if deduped.len() <= 2 {
        return deduped;
    }
    let mut simplified = vec![deduped[0], deduped[1]];
    let delta = |a: Cell, b: Cell| (a.0 - b.0, a.1 - b.1, a.2 - b.2);
    let mut dir = delta(simplified[1], simplified[0]);
    for &p in &deduped[2..] {
        let last = *simplified.last().unwrap();
        let ndir = delta(p, last);
        if ndir != dir {
            simplified.push(p);
            dir = ndir;
        } else {
            simplified.pop();
            simplified.push(p);
        }
    }
    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_search_finds_direct_path() {
        let bounds = (0.0, 0.0, 0.0, 100.0, 100.0, 100.0);
        let index = KeepoutIndex::new();
        let params = SearchParams::default();
        let path = a_star_3d((0, 0, 0), (5, 0, 0), bounds, &index, &params).unwrap();
        assert_eq!(*path.last().unwrap(), (5, 0, 0));
        assert_eq!(path[0], (0, 0, 0));
    }

    #[test]
    fn search_routes_around_a_keepout() {
        use crate::keepout::{KeepoutEntry, KeepoutKind};
        let bounds = (0.0, 0.0, 0.0, 20.0, 20.0, 20.0);
        let mut index = KeepoutIndex::new();
        index.insert(KeepoutEntry {
            key: "block".into(),
            kind: KeepoutKind::Shape,
            bbox: (2.0, -5.0, -5.0, 8.0, 5.0, 5.0),
        });
        let params = SearchParams::default();
        let path = a_star_3d((0, 0, 0), (10, 0, 0), bounds, &index, &params);
        assert!(path.is_some());
    }

    #[test]
    fn simplify_cardinal_path_collapses_straight_runs() {
        let path = vec![(0, 0, 0), (1, 0, 0), (2, 0, 0), (3, 0, 0), (3, 1, 0), (3, 2, 0)];
        let simplified = simplify_cardinal_path(&path);
        assert_eq!(simplified, vec![(0, 0, 0), (3, 0, 0), (3, 2, 0)]);
    }

    #[test]
    fn simplify_cardinal_path_dedupes_repeats() {
        let path = vec![(0, 0, 0), (0, 0, 0), (1, 0, 0)];
        assert_eq!(simplify_cardinal_path(&path), vec![(0, 0, 0), (1, 0, 0)]);
    }

    proptest::proptest! {
        /// With `turn_weight = 0` and no keepouts, A* always finds a
        /// Manhattan-minimum path between two in-bounds cells.
        #[test]
        fn finds_a_manhattan_optimal_path_with_no_keepouts(
            start in (0i64..15, 0i64..15, 0i64..15),
            goal in (0i64..15, 0i64..15, 0i64..15),
        ) {
            let bounds = (0.0, 0.0, 0.0, 20.0, 20.0, 20.0);
            let index = KeepoutIndex::new();
            let params = SearchParams { turn_weight: 0.0, ..SearchParams::default() };

            let path = a_star_3d(start, goal, bounds, &index, &params).unwrap();
            prop_assert_eq!(path[0], start);
            prop_assert_eq!(*path.last().unwrap(), goal);
            prop_assert_eq!((path.len() - 1) as i64, manhattan(start, goal));
        }
    }
}
