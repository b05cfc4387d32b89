//! C4: Steiner-tree approximation with shared-trunk bias (spec §4.4).
//!
//! Builds one rectilinear tree per network by growing it one terminal at a
//! time: always connect the terminal closest to the tree so far, routed
//! with [`crate::pathfind::find_path`] against a proximity field built from
//! the tree's own cells. Because the occupancy closure reports already-tree
//! cells as `Occupancy::SameNetwork`, the reuse discount in [`crate::cost`]
//! does the actual trunk-sharing work — new branches are cheap to land on
//! an existing trunk and expensive to strike out alone.

use std::collections::HashSet;

use crate::cancel::CancellationToken;
use crate::cost::{Occupancy, ProximityField};
use crate::error::EngineError;
use crate::geometry::segment_orientation;
use crate::grid::BlockedGrid;
use crate::model::Point;
use crate::pathfind::{PathQuery, find_path, l_shaped_fallback};

pub struct SteinerTree {
    /// Each element is one connecting path, in the order it was grown.
    pub segments: Vec<Vec<Point>>,
    /// Non-terminal points where a later branch joined the tree.
    pub steiner_points: Vec<Point>,
}

/// Builds a Steiner tree connecting every point in `terminals` (deduplicated,
/// first occurrence wins as the tree's root). `other_occupancy` reports
/// occupancy from sections already placed by earlier networks in this pass.
pub fn build_steiner_tree<F>(
    grid: &BlockedGrid,
    terminals: &[Point],
    mut other_occupancy: F,
    cancel: &CancellationToken,
) -> Result<SteinerTree, EngineError>
where
    F: FnMut(Point) -> Occupancy,
{
    let mut unique_terminals = Vec::new();
    for &t in terminals {
        if !unique_terminals.contains(&t) {
            unique_terminals.push(t);
        }
    }

    let mut tree = SteinerTree { segments: Vec::new(), steiner_points: Vec::new() };
    if unique_terminals.len() <= 1 {
        return Ok(tree);
    }

    let mut tree_cells: HashSet<Point> = HashSet::new();
    let mut tree_edges: Vec<(Point, crate::geometry::Orientation)> = Vec::new();
    let root = unique_terminals[0];
    tree_cells.insert(root);

    let mut remaining: Vec<Point> = unique_terminals[1..].to_vec();

    while !remaining.is_empty() {
        cancel.check()?;

        // Deterministic: pick the terminal closest to the tree, tie-broken
        // by coordinate (spec §5 reproducibility).
        let mut tree_points: Vec<Point> = tree_cells.iter().copied().collect();
        tree_points.sort();
        let (pick_idx, anchor) = remaining
            .iter()
            .enumerate()
            .map(|(idx, &terminal)| {
                let nearest = tree_points.iter().min_by_key(|p| p.manhattan(terminal)).copied().unwrap();
                (idx, terminal, nearest, nearest.manhattan(terminal))
            })
            .min_by_key(|&(idx, terminal, _, dist)| (dist, terminal, idx))
            .map(|(idx, _, nearest, _)| (idx, nearest))
            .expect("remaining is non-empty");
        let terminal = remaining.remove(pick_idx);

        let proximity = ProximityField::build(grid, &tree_edges);
        let occupancy = |p: Point| if tree_cells.contains(&p) { Occupancy::SameNetwork } else { other_occupancy(p) };
        // Spec §4.3/§4.4 step b: a trunk connection is capped at 2 turns;
        // when no such path exists, fall back to the two-segment L-shape
        // rather than admitting an unbounded number of turns.
        let query =
            PathQuery { grid, occupancy, proximity: &proximity, start: anchor, goal: terminal, max_turns: Some(2) };
        let path = find_path(&query, cancel)?.unwrap_or_else(|| l_shaped_fallback(anchor, terminal));

        // `anchor` is a genuine Steiner point only if it isn't itself one of
        // the original terminals; the final retain below filters those out.
        tree.steiner_points.push(anchor);

        for window in path.windows(2) {
            if let Some(orientation) = segment_orientation(window[0], window[1]) {
                tree_edges.push((window[0], orientation));
                tree_edges.push((window[1], orientation));
            }
        }
        for &p in &path {
            tree_cells.insert(p);
        }
        tree.segments.push(path);
    }

    tree.steiner_points.sort();
    tree.steiner_points.dedup();
    tree.steiner_points.retain(|p| !unique_terminals.contains(p));
    Ok(tree)
}
