//! Cost functional for C3 pathfinding (spec §4.3): reuse discount, turn
//! penalty, and the proximity bonus/penalty that nudges new runs toward
//! (but not on top of) an already-routed trunk.

use std::collections::VecDeque;

use crate::geometry::{Direction, Orientation};
use crate::grid::BlockedGrid;
use crate::model::Point;

/// Per-step cost of moving onto a cell already carrying a section of the
/// same network.
pub const REUSE_SAME_NETWORK: f64 = 0.01;
/// Per-step cost of moving onto a cell carrying a section of a different
/// network.
pub const REUSE_OTHER_NETWORK: f64 = 0.1;
/// Per-step cost of moving onto a cell with no existing section.
pub const REUSE_NONE: f64 = 1.0;
/// Added once per direction change, never charged at the start or end of a
/// route (spec §4.3).
pub const TURN_PENALTY: f64 = 2.5;

/// Occupancy a cell may carry from sections already placed by prior networks
/// or earlier cables in the same network's pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupancy {
    SameNetwork,
    OtherNetwork,
    None,
}

pub fn reuse_cost(occupancy: Occupancy) -> f64 {
    match occupancy {
        Occupancy::SameNetwork => REUSE_SAME_NETWORK,
        Occupancy::OtherNetwork => REUSE_OTHER_NETWORK,
        Occupancy::None => REUSE_NONE,
    }
}

/// Distance-transform grid giving, for every cell, the Manhattan distance to
/// the nearest cell already occupied by an existing section, plus that
/// nearest section's orientation. Computed once per network's routing pass
/// (not rescanned per A* step) via a multi-source BFS, grounded on the same
/// "precompute a distance field once" approach the quadratic proximity term
/// implies is too expensive to inline.
pub struct ProximityField {
    width: i32,
    height: i32,
    distance: Vec<i32>,
    orientation: Vec<Option<Orientation>>,
}

impl ProximityField {
    pub fn build(grid: &BlockedGrid, occupied: &[(Point, Orientation)]) -> Self {
        let width = grid.width();
        let height = grid.height();
        let cell_count = (width.max(0) as usize) * (height.max(0) as usize);
        let mut distance = vec![i32::MAX; cell_count];
        let mut orientation = vec![None; cell_count];
        let mut queue = VecDeque::new();

        for &(p, orient) in occupied {
            if !grid.in_bounds(p) {
                continue;
            }
            let idx = p.grid_index(width);
            if distance[idx] != 0 {
                distance[idx] = 0;
            }
            orientation[idx] = Some(orient);
            queue.push_back(p);
        }

        while let Some(p) = queue.pop_front() {
            let idx = p.grid_index(width);
            let d = distance[idx];
            let orient = orientation[idx];
            for dir in Direction::ALL {
                let next = dir.step(p);
                if !grid.in_bounds(next) {
                    continue;
                }
                let next_idx = next.grid_index(width);
                if distance[next_idx] > d + 1 {
                    distance[next_idx] = d + 1;
                    orientation[next_idx] = orient;
                    queue.push_back(next);
                }
            }
        }

        Self { width, height, distance, orientation }
    }

    pub fn empty(width: i32, height: i32) -> Self {
        let cell_count = (width.max(0) as usize) * (height.max(0) as usize);
        Self { width, height, distance: vec![i32::MAX; cell_count], orientation: vec![None; cell_count] }
    }

    fn distance_at(&self, p: Point) -> i32 {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return i32::MAX;
        }
        self.distance[p.grid_index(self.width)]
    }

    fn orientation_at(&self, p: Point) -> Option<Orientation> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        self.orientation[p.grid_index(self.width)]
    }

    /// Multiplier applied to the base step cost of moving `from -> to` along
    /// `direction`, based on how close the destination is to an existing
    /// path and whether this step runs parallel to it or toward/away from
    /// it (spec §4.3's proximity bonus/penalty).
    pub fn proximity_multiplier(&self, direction: Direction, from: Point, to: Point) -> f64 {
        let dist_to = self.distance_at(to);
        if dist_to == i32::MAX {
            return 1.0;
        }
        if dist_to > 3 {
            let d = dist_to as f64;
            return 1.0 + (d / 3.0).powi(2);
        }

        let nearest_orientation = self.orientation_at(to);
        let parallel = nearest_orientation == Some(direction.orientation());
        if parallel {
            if dist_to <= 1 { 0.2 } else { 8.0 }
        } else {
            let dist_from = self.distance_at(from);
            let toward = dist_from != i32::MAX && dist_to < dist_from;
            if toward { 0.1 } else { 5.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuse_discount_orders_same_other_none() {
        assert!(reuse_cost(Occupancy::SameNetwork) < reuse_cost(Occupancy::OtherNetwork));
        assert!(reuse_cost(Occupancy::OtherNetwork) < reuse_cost(Occupancy::None));
    }

    #[test]
    fn distance_zero_at_occupied_cell() {
        let grid = BlockedGrid::new(10, 10, &[], &[]);
        let field = ProximityField::build(&grid, &[(Point::new(5, 5), Orientation::Horizontal)]);
        assert_eq!(field.distance_at(Point::new(5, 5)), 0);
        assert_eq!(field.distance_at(Point::new(6, 5)), 1);
    }

    #[test]
    fn far_cells_use_quadratic_term() {
        let grid = BlockedGrid::new(20, 20, &[], &[]);
        let field = ProximityField::build(&grid, &[(Point::new(0, 0), Orientation::Horizontal)]);
        let multiplier = field.proximity_multiplier(Direction::East, Point::new(9, 0), Point::new(10, 0));
        assert!((multiplier - (1.0 + (10.0f64 / 3.0).powi(2))).abs() < 1e-9);
    }

    #[test]
    fn empty_field_never_biases_cost() {
        let field = ProximityField::empty(10, 10);
        let multiplier = field.proximity_multiplier(Direction::East, Point::new(0, 0), Point::new(1, 0));
        assert_eq!(multiplier, 1.0);
    }
}
