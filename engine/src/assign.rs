//! C6: cable assignment (spec §4.6).
//!
//! Once a network's Steiner tree has been split into sections, every cable
//! of that network still needs its own point-to-point route through those
//! sections (the tree is shared infrastructure; a cable only occupies the
//! sub-path between its own two terminals). This module builds the
//! quotient graph over section endpoints and walks it with a BFS, then
//! classifies each cable's actual route length against its declared length.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::model::{CableStatus, Point, ProblematicCable, CELL_SIZE_METRES};
use crate::sections::Section;

/// Adjacency over section endpoints: two endpoints are neighbours if some
/// section of the network connects them directly.
struct QuotientGraph {
    adjacency: HashMap<Point, Vec<Point>>,
}

impl QuotientGraph {
    fn build(sections: &[&Section]) -> Self {
        let mut adjacency: HashMap<Point, Vec<Point>> = HashMap::new();
        for section in sections {
            let [a, b] = section.points;
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        Self { adjacency }
    }

    /// Shortest path by hop count, tie-broken deterministically by
    /// preferring the lexicographically smallest neighbour at each step.
    fn shortest_path(&self, start: Point, goal: Point) -> Option<Vec<Point>> {
        if start == goal {
            return Some(vec![start]);
        }
        let mut queue = VecDeque::new();
        let mut came_from: HashMap<Point, Point> = HashMap::new();
        let mut visited = std::collections::HashSet::new();
        queue.push_back(start);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            let mut neighbours = self.adjacency.get(&current).cloned().unwrap_or_default();
            neighbours.sort();
            for next in neighbours {
                if visited.insert(next) {
                    came_from.insert(next, current);
                    if next == goal {
                        let mut path = vec![goal];
                        let mut cur = goal;
                        while let Some(&prev) = came_from.get(&cur) {
                            path.push(prev);
                            cur = prev;
                        }
                        path.reverse();
                        return Some(path);
                    }
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

/// Route for one cable through its network's already-built sections, plus
/// the route's physical length in metres.
pub struct CableRoute {
    pub path: Vec<Point>,
    pub length_metres: f64,
}

pub fn path_length_metres(path: &[Point]) -> f64 {
    path.windows(2).map(|w| w[0].manhattan(w[1]) as f64 * CELL_SIZE_METRES).sum()
}

/// Finds each cable's route between its source and target through the
/// network's sections. Returns `None` for a cable whose source/target
/// aren't both present in the section graph (spec §7:
/// `UnroutedReason::NoFeasiblePath`).
pub fn assign_routes(
    sections: &[&Section],
    cable_terminals: &BTreeMap<String, (Point, Point)>,
) -> BTreeMap<String, Option<CableRoute>> {
    let graph = QuotientGraph::build(sections);
    let mut routes = BTreeMap::new();
    for (cable_label, &(source, target)) in cable_terminals {
        let route = graph
            .shortest_path(source, target)
            .map(|path| CableRoute { length_metres: path_length_metres(&path), path });
        routes.insert(cable_label.clone(), route);
    }
    routes
}

/// Margin (specified minus routed, metres) above which a cable is `good`
/// rather than merely `warning` (spec §4.6).
const GOOD_MARGIN_METRES: f64 = 3.0;

/// Compares a cable's declared length against its routed length, spec §4.6's
/// status classification: `good` when `specified - route >= 3m`, `warning`
/// when that margin is positive but under 3m, `error` when the route
/// actually exceeds the specified length, `default` when no length was
/// specified at all. `excess_length`/`excess_percentage` are only meaningful
/// (and only spec-mandated) once the route exceeds the specified length.
pub fn classify_cable(
    cable_label: &str,
    source: &str,
    target: &str,
    specified_length: Option<f64>,
    route_length: f64,
    theoretical_min_length: f64,
) -> ProblematicCable {
    let Some(specified_length) = specified_length else {
        return ProblematicCable {
            cable_label: cable_label.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            specified_length: 0.0,
            route_length,
            theoretical_min_length,
            excess_length: 0.0,
            excess_percentage: 0.0,
            status: CableStatus::Default,
        };
    };

    let margin = specified_length - route_length;
    let excess_length = route_length - specified_length;
    let excess_percentage = if specified_length > 0.0 { (excess_length / specified_length) * 100.0 } else { 0.0 };

    let status = if margin < 0.0 {
        CableStatus::Error
    } else if margin >= GOOD_MARGIN_METRES {
        CableStatus::Good
    } else {
        CableStatus::Warning
    };

    ProblematicCable {
        cable_label: cable_label.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        specified_length,
        route_length,
        theoretical_min_length,
        excess_length,
        excess_percentage,
        status,
    }
}
