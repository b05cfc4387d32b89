//! C3: pathfinding (spec §4.3, §4.4).
//!
//! `find_path` is a turn-aware A* over the blocked grid: state includes the
//! direction the route arrived from, so the turn penalty can be charged
//! exactly once per direction change. When `max_turns` is set the state
//! additionally tracks how many turns have been spent, pruning any branch
//! that would exceed the budget — spec §4.4's turn-limited trunk search.
//! When no turn-limited path exists, the caller falls back to a synthesized
//! L-shaped two-segment path via [`l_shaped_fallback`].
//!
//! Grounded on the diagram router's `StateKey`/`PqEntry` design in
//! `other_examples` (tie-broken `Ord`, explicit `came_from` reconstruction),
//! adapted from that router's lane-based model to this engine's plain
//! 4-connected grid.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::cancel::CancellationToken;
use crate::cost::{Occupancy, ProximityField, TURN_PENALTY, reuse_cost};
use crate::error::EngineError;
use crate::geometry::Direction;
use crate::grid::BlockedGrid;
use crate::model::Point;

/// Smallest possible per-step cost (same-network reuse at the most
/// favourable proximity multiplier), used to scale the Manhattan-distance
/// heuristic so it never overestimates the true remaining cost.
const HEURISTIC_WEIGHT: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct StateKey {
    point: Point,
    last_direction: Option<Direction>,
    turns_used: u8,
}

#[derive(Debug, Clone, Copy)]
struct PqEntry {
    f_cost: f64,
    g_cost: f64,
    state: StateKey,
}

impl PartialEq for PqEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.g_cost == other.g_cost && self.state == other.state
    }
}
impl Eq for PqEntry {}

impl PartialOrd for PqEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PqEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the natural float order so the
        // lowest f_cost pops first, then tie-break fully deterministically
        // (spec §5: identical input always yields an identical route).
        other
            .f_cost
            .partial_cmp(&self.f_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.g_cost.partial_cmp(&self.g_cost).unwrap_or(Ordering::Equal))
            .then_with(|| self.state.point.cmp(&other.state.point))
            .then_with(|| direction_rank(self.state.last_direction).cmp(&direction_rank(other.state.last_direction)))
            .then_with(|| self.state.turns_used.cmp(&other.state.turns_used))
    }
}

fn direction_rank(direction: Option<Direction>) -> u8 {
    match direction {
        None => 0,
        Some(Direction::North) => 1,
        Some(Direction::South) => 2,
        Some(Direction::East) => 3,
        Some(Direction::West) => 4,
    }
}

pub struct PathQuery<'a, F: Fn(Point) -> Occupancy> {
    pub grid: &'a BlockedGrid,
    pub occupancy: F,
    pub proximity: &'a ProximityField,
    pub start: Point,
    pub goal: Point,
    /// `Some(n)` restricts the route to at most `n` direction changes
    /// (spec §4.4's turn-budgeted trunk search, `n` = 2 in practice).
    pub max_turns: Option<u8>,
}

fn heuristic(from: Point, goal: Point) -> f64 {
    from.manhattan(goal) as f64 * HEURISTIC_WEIGHT
}

pub fn find_path<F: Fn(Point) -> Occupancy>(
    query: &PathQuery<F>,
    cancel: &CancellationToken,
) -> Result<Option<Vec<Point>>, EngineError> {
    if query.start == query.goal {
        return Ok(Some(vec![query.start]));
    }
    if query.grid.is_blocked(query.start) || query.grid.is_blocked(query.goal) {
        return Ok(None);
    }

    let mut open = BinaryHeap::new();
    let mut best_g: HashMap<StateKey, f64> = HashMap::new();
    let mut came_from: HashMap<StateKey, StateKey> = HashMap::new();

    let start_state = StateKey { point: query.start, last_direction: None, turns_used: 0 };
    best_g.insert(start_state, 0.0);
    open.push(PqEntry { f_cost: heuristic(query.start, query.goal), g_cost: 0.0, state: start_state });

    while let Some(current) = open.pop() {
        cancel.check()?;

        if best_g.get(&current.state).is_some_and(|&known| current.g_cost > known) {
            continue;
        }
        if current.state.point == query.goal {
            return Ok(Some(reconstruct_path(&came_from, current.state)));
        }

        for direction in Direction::ALL {
            let next_point = direction.step(current.state.point);
            if query.grid.is_blocked(next_point) {
                continue;
            }

            let is_turn = current.state.last_direction.is_some_and(|prev| direction.is_turn_from(prev));
            let arriving_at_goal = next_point == query.goal;
            let turns_used = if is_turn { current.state.turns_used + 1 } else { current.state.turns_used };
            if let Some(limit) = query.max_turns {
                if turns_used > limit {
                    continue;
                }
            }

            let step_cost = reuse_cost((query.occupancy)(next_point))
                * query.proximity.proximity_multiplier(direction, current.state.point, next_point);
            // The turn penalty is never charged on the very first step (no
            // prior direction yet) or on the step that lands on the goal
            // (spec §4.3: "exempted at path start/end").
            let turn_cost = if is_turn && !arriving_at_goal { TURN_PENALTY } else { 0.0 };
            let tentative_g = current.g_cost + step_cost + turn_cost;

            let next_state = StateKey { point: next_point, last_direction: Some(direction), turns_used };
            let improves = best_g.get(&next_state).is_none_or(|&known| tentative_g < known);
            if improves {
                best_g.insert(next_state, tentative_g);
                came_from.insert(next_state, current.state);
                open.push(PqEntry {
                    f_cost: tentative_g + heuristic(next_point, query.goal),
                    g_cost: tentative_g,
                    state: next_state,
                });
            }
        }
    }

    Ok(None)
}

fn reconstruct_path(came_from: &HashMap<StateKey, StateKey>, goal_state: StateKey) -> Vec<Point> {
    let mut path = vec![goal_state.point];
    let mut current = goal_state;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev.point);
        current = prev;
    }
    path.reverse();
    path
}

/// Defensive fallback for when a turn-limited search finds nothing: a
/// straight two-segment L-shape (horizontal-then-vertical) through the
/// corner `(goal.x, start.y)`. Ignores obstacles; callers only reach for
/// this once the budgeted A* has already failed and an unblocked result is
/// no longer guaranteed to exist anyway.
pub fn l_shaped_fallback(start: Point, goal: Point) -> Vec<Point> {
    if start.x == goal.x || start.y == goal.y {
        return vec![start, goal];
    }
    let corner = Point::new(goal.x, start.y);
    vec![start, corner, goal]
}
