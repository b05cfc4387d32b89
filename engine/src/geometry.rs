//! Shared directional helpers used by C3 (pathfinding) and by the cost
//! functional in [`crate::cost`]. Grounded on the `other_examples` diagram
//! router's `Lane`/direction handling, adapted to this engine's plain
//! 4-connected grid (no lanes).

use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    pub fn step(self, from: Point) -> Point {
        match self {
            Direction::North => Point::new(from.x, from.y - 1),
            Direction::South => Point::new(from.x, from.y + 1),
            Direction::East => Point::new(from.x + 1, from.y),
            Direction::West => Point::new(from.x - 1, from.y),
        }
    }

    pub fn between(from: Point, to: Point) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            (1, 0) => Some(Direction::East),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Direction::North | Direction::South => Orientation::Vertical,
            Direction::East | Direction::West => Orientation::Horizontal,
        }
    }

    pub fn is_turn_from(self, previous: Direction) -> bool {
        self.orientation() != previous.orientation()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Orientation of the segment connecting two adjacent points, if any.
pub fn segment_orientation(a: Point, b: Point) -> Option<Orientation> {
    Direction::between(a, b).map(Direction::orientation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_and_between_are_inverse() {
        let p = Point::new(4, 4);
        for dir in Direction::ALL {
            let stepped = dir.step(p);
            assert_eq!(Direction::between(p, stepped), Some(dir));
        }
    }

    #[test]
    fn turn_detection_is_orientation_based() {
        assert!(Direction::North.is_turn_from(Direction::East));
        assert!(!Direction::North.is_turn_from(Direction::South));
    }
}
