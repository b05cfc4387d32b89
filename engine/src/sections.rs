//! C5: section store (spec §4.5).
//!
//! A `Section` is a maximal straight or pre-split run of grid cells shared
//! by one or more cables of one network. `SectionStore` owns the running
//! set of sections for a single `optimize_paths` call: callers register a
//! tree's raw path segments, then ask the store to split at T-junctions,
//! detect perpendicular intersections, and merge collinear overlaps so the
//! output has no two sections covering the same stretch of the same
//! network twice.

use std::collections::{BTreeSet, HashMap};

use crate::geometry::segment_orientation;
use crate::model::Point;

#[derive(Debug, Clone)]
pub struct Section {
    pub network: String,
    /// Always exactly two points: the section's two endpoints. Interior
    /// cells are implied by the straight line between them.
    pub points: [Point; 2],
    pub cables: BTreeSet<String>,
}

impl Section {
    fn is_horizontal(&self) -> bool {
        self.points[0].y == self.points[1].y
    }

    fn is_vertical(&self) -> bool {
        self.points[0].x == self.points[1].x
    }

    fn contains_point(&self, p: Point) -> bool {
        let (lo, hi) = crate::model::canonical_pair(self.points[0], self.points[1]);
        if self.is_horizontal() {
            p.y == lo.y && p.x >= lo.x && p.x <= hi.x
        } else if self.is_vertical() {
            p.x == lo.x && p.y >= lo.y && p.y <= hi.y
        } else {
            false
        }
    }
}

#[derive(Default)]
pub struct SectionStore {
    sections: Vec<Section>,
}

impl SectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every unit-length edge of `path` as its own section of
    /// `network`, with no cable yet attached (C4 builds the shared trunk
    /// before any individual cable is assigned to it — cable membership is
    /// attached later by [`Self::mark_cable`] once C6 walks each cable's
    /// own route through the finished tree). Idempotent: re-registering an
    /// edge that already exists (same network, same endpoints, either
    /// orientation) is a no-op.
    pub fn register_path(&mut self, network: &str, path: &[Point]) {
        for window in path.windows(2) {
            let (a, b) = (window[0], window[1]);
            if segment_orientation(a, b).is_none() {
                continue;
            }
            if self.find_exact_mut(network, a, b).is_some() {
                continue;
            }
            self.sections.push(Section { network: network.to_string(), points: [a, b], cables: BTreeSet::new() });
        }
    }

    /// Attaches `cable` to the section spanning `a`-`b` on `network` (C6
    /// step 3). The section must already exist — callers walk a route that
    /// was found through the network's own quotient graph.
    pub fn mark_cable(&mut self, network: &str, a: Point, b: Point, cable: &str) {
        if let Some(section) = self.find_exact_mut(network, a, b) {
            section.cables.insert(cable.to_string());
        }
    }

    fn find_exact_mut(&mut self, network: &str, a: Point, b: Point) -> Option<&mut Section> {
        let (lo, hi) = crate::model::canonical_pair(a, b);
        self.sections
            .iter_mut()
            .find(|s| s.network == network && crate::model::canonical_pair(s.points[0], s.points[1]) == (lo, hi))
    }

    /// Splits every section that passes through `point` without ending
    /// there into two sections meeting at `point` (a T-junction where
    /// another branch joins mid-span, spec §4.5).
    pub fn split_at(&mut self, network: &str, point: Point) {
        let mut to_add = Vec::new();
        for section in self.sections.iter_mut().filter(|s| s.network == network) {
            if section.points.contains(&point) || !section.contains_point(point) {
                continue;
            }
            let (a, b) = (section.points[0], section.points[1]);
            let cables = section.cables.clone();
            section.points = [a, point];
            to_add.push(Section { network: network.to_string(), points: [point, b], cables });
        }
        self.sections.extend(to_add);
    }

    /// Merges adjacent, collinear, same-network sections that share an
    /// endpoint and no other section touches the shared endpoint (so the
    /// merge doesn't erase a real junction).
    pub fn merge_overlaps(&mut self) {
        loop {
            let mut merged_any = false;
            let mut endpoint_uses: HashMap<(String, Point), usize> = HashMap::new();
            for section in &self.sections {
                for &p in &section.points {
                    *endpoint_uses.entry((section.network.clone(), p)).or_insert(0) += 1;
                }
            }

            'outer: for i in 0..self.sections.len() {
                for j in (i + 1)..self.sections.len() {
                    if self.sections[i].network != self.sections[j].network {
                        continue;
                    }
                    if let Some(merged) = try_merge(&self.sections[i], &self.sections[j], &endpoint_uses) {
                        let mut cables = self.sections[i].cables.clone();
                        cables.extend(self.sections[j].cables.iter().cloned());
                        let network = self.sections[i].network.clone();
                        self.sections.remove(j);
                        self.sections.remove(i);
                        self.sections.push(Section { network, points: merged, cables });
                        merged_any = true;
                        break 'outer;
                    }
                }
            }

            if !merged_any {
                break;
            }
        }
    }

    /// Detects sections of different networks that cross at a single
    /// perpendicular point and returns those crossing points, so callers
    /// can split both sections there if the layout calls for a junction.
    pub fn detect_intersections(&self) -> Vec<Point> {
        let mut crossings = BTreeSet::new();
        for i in 0..self.sections.len() {
            for j in (i + 1)..self.sections.len() {
                let a = &self.sections[i];
                let b = &self.sections[j];
                if a.is_horizontal() == b.is_horizontal() {
                    continue;
                }
                let (horizontal, vertical) = if a.is_horizontal() { (a, b) } else { (b, a) };
                let (h_lo, h_hi) = crate::model::canonical_pair(horizontal.points[0], horizontal.points[1]);
                let (v_lo, v_hi) = crate::model::canonical_pair(vertical.points[0], vertical.points[1]);
                let candidate = Point::new(v_lo.x, h_lo.y);
                if candidate.x >= h_lo.x
                    && candidate.x <= h_hi.x
                    && candidate.y >= v_lo.y
                    && candidate.y <= v_hi.y
                {
                    crossings.insert(candidate);
                }
            }
        }
        crossings.into_iter().collect()
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

fn try_merge(a: &Section, b: &Section, endpoint_uses: &HashMap<(String, Point), usize>) -> Option<[Point; 2]> {
    let orient_a = segment_orientation(a.points[0], a.points[1])?;
    let orient_b = segment_orientation(b.points[0], b.points[1])?;
    if orient_a != orient_b {
        return None;
    }

    let shared = [a.points[0], a.points[1]].into_iter().find(|p| b.points.contains(p))?;
    if endpoint_uses.get(&(a.network.clone(), shared)).copied().unwrap_or(0) > 2 {
        return None;
    }

    let other_a = if a.points[0] == shared { a.points[1] } else { a.points[0] };
    let other_b = if b.points[0] == shared { b.points[1] } else { b.points[0] };
    if segment_orientation(other_a, other_b).is_none() {
        return None;
    }

    // spec §4.5: the merged polyline is re-ordered by `order_for_continuity`
    // rather than hand-assembled — both legs already meet at `shared`, so no
    // corner synthesis is needed here, but this is the same traversal the
    // function performs for a longer, not-yet-adjacent chain of segments.
    let merged = order_for_continuity(vec![(other_a, shared), (shared, other_b)]);
    Some([*merged.first()?, *merged.last()?])
}

/// Reorders an unordered bag of point-to-point segments into one continuous
/// polyline, synthesizing an L-shaped corner between two segments that
/// don't already share an endpoint. Collinear-overlap merges reduce to a
/// plain two-point section in the common case; this general reordering
/// exists for the rarer case of assembling a multi-section cable route
/// (spec §4.5, §4.6) out of pieces that may not already be given in
/// traversal order.
pub fn order_for_continuity(mut segments: Vec<(Point, Point)>) -> Vec<Point> {
    if segments.is_empty() {
        return Vec::new();
    }
    let (first_a, first_b) = segments.remove(0);
    let mut path = vec![first_a, first_b];

    while !segments.is_empty() {
        let tail = *path.last().unwrap();
        let best = segments
            .iter()
            .enumerate()
            .min_by_key(|(_, &(a, b))| tail.manhattan(a).min(tail.manhattan(b)))
            .map(|(idx, _)| idx)
            .unwrap();
        let (a, b) = segments.remove(best);

        if a == tail {
            path.push(b);
        } else if b == tail {
            path.push(a);
        } else {
            // No shared endpoint: synthesize an L-shaped intermediate
            // corner rather than silently dropping the gap.
            let nearer = if tail.manhattan(a) <= tail.manhattan(b) { a } else { b };
            let farther = if nearer == a { b } else { a };
            if tail.x != nearer.x && tail.y != nearer.y {
                path.push(Point::new(nearer.x, tail.y));
            }
            path.push(nearer);
            path.push(farther);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_path_produces_unit_edges() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 0), Point::new(0, 1), Point::new(0, 2)]);
        assert_eq!(store.sections().len(), 2);
    }

    #[test]
    fn mark_cable_accumulates_on_shared_edge() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 0), Point::new(0, 1)]);
        store.mark_cable("N1", Point::new(0, 0), Point::new(0, 1), "c1");
        store.mark_cable("N1", Point::new(0, 1), Point::new(0, 0), "c2");
        assert_eq!(store.sections().len(), 1);
        assert_eq!(store.sections()[0].cables.len(), 2);
    }

    #[test]
    fn split_at_breaks_a_through_section() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 0), Point::new(0, 1)]);
        store.sections[0].points = [Point::new(0, 0), Point::new(0, 3)];
        store.split_at("N1", Point::new(0, 1));
        assert_eq!(store.sections().len(), 2);
    }

    #[test]
    fn merge_overlaps_collapses_collinear_runs() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 0), Point::new(0, 1), Point::new(0, 2)]);
        store.merge_overlaps();
        assert_eq!(store.sections().len(), 1);
        let (lo, hi) = crate::model::canonical_pair(store.sections()[0].points[0], store.sections()[0].points[1]);
        assert_eq!((lo, hi), (Point::new(0, 0), Point::new(0, 2)));
    }

    #[test]
    fn merge_does_not_erase_a_real_junction() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 0), Point::new(0, 1)]);
        store.register_path("N1", &[Point::new(0, 1), Point::new(0, 2)]);
        store.register_path("N1", &[Point::new(0, 1), Point::new(1, 1)]);
        store.merge_overlaps();
        // The branch at (0,1) means the two vertical pieces must not merge.
        assert!(store.sections().iter().any(|s| s.points.contains(&Point::new(0, 1))));
    }

    #[test]
    fn detect_intersections_finds_perpendicular_crossing() {
        let mut store = SectionStore::new();
        store.register_path("N1", &[Point::new(0, 2), Point::new(4, 2)]);
        store.sections[0].points = [Point::new(0, 2), Point::new(4, 2)];
        store.register_path("N2", &[Point::new(2, 0), Point::new(2, 4)]);
        store.sections[1].points = [Point::new(2, 0), Point::new(2, 4)];
        let crossings = store.detect_intersections();
        assert_eq!(crossings, vec![Point::new(2, 2)]);
    }

    #[test]
    fn order_for_continuity_links_disjoint_segments_with_a_corner() {
        let path = order_for_continuity(vec![(Point::new(0, 0), Point::new(2, 0)), (Point::new(2, 3), Point::new(5, 3))]);
        assert_eq!(path.first(), Some(&Point::new(0, 0)));
        assert_eq!(path.last(), Some(&Point::new(5, 3)));
    }
}
