//! C7: output assembly (spec §4.7).
//!
//! Takes the finished section store, per-cable routes, and per-cable length
//! classifications and assembles the wire-shaped [`OptimizeResponse`].

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::model::{
    CableRecord, CableWire, HananGrid, NetworkWire, OptimizeResponse, Point, ProblematicCable, SectionType,
    SectionView, UnroutedCable,
};
use crate::sections::Section;

/// A section's type is advisory (spec §3): `Source`/`Target` mark the
/// section touching a cable's own terminal, everything else collapses to
/// `Trunk`. A merged section that absorbs both a source-adjacent and a
/// trunk run is reported as `Trunk` — the more specific tag doesn't survive
/// a merge, and re-deriving it per-cable would contradict the section being
/// shared across cables with different endpoints.
fn classify_section_type(section: &Section, terminal_points: &HashSet<Point>) -> SectionType {
    let touches_terminal = section.points.iter().any(|p| terminal_points.contains(p));
    if touches_terminal { SectionType::Source } else { SectionType::Trunk }
}

pub struct AssembleInputs<'a> {
    pub sections: &'a [Section],
    pub networks_by_id: &'a HashMap<String, &'a NetworkWire>,
    pub cables_by_label: &'a HashMap<String, &'a CableWire>,
    pub terminal_points: &'a HashSet<Point>,
    pub cable_routes: BTreeMap<String, Vec<Point>>,
    pub hanan_grid: HananGrid,
    pub steiner_points: Vec<Point>,
    pub problematic_cables: Vec<ProblematicCable>,
    pub unrouted_cables: Vec<UnroutedCable>,
}

pub fn assemble_response(inputs: AssembleInputs<'_>) -> OptimizeResponse {
    let mut sections = Vec::with_capacity(inputs.sections.len());

    for (index, section) in inputs.sections.iter().enumerate() {
        // spec §3 invariant: no section leaves the engine with an empty
        // cable set (a bridging trunk segment no cable ultimately traverses
        // is internal bookkeeping, not part of the response). spec §7: this
        // degrades to a logged warning with the section omitted, not a hard
        // error — a single orphaned section shouldn't fail the whole request.
        if section.cables.is_empty() {
            tracing::warn!(network = %section.network, a = ?section.points[0], b = ?section.points[1], "dropping section with no assigned cables");
            continue;
        }

        let network = inputs.networks_by_id.get(&section.network);
        let color = network.map(|n| n.display_color()).unwrap_or_else(|| crate::model::DEFAULT_NETWORK_COLOR.to_string());

        let mut details = BTreeMap::new();
        for cable_label in &section.cables {
            if let Some(&cable) = inputs.cables_by_label.get(cable_label) {
                details.insert(cable_label.clone(), CableRecord::from(cable));
            }
        }

        sections.push(SectionView {
            key: format!("section-{index}"),
            points: vec![section.points[0], section.points[1]],
            network: section.network.clone(),
            color,
            cables: section.cables.iter().cloned().collect(),
            details,
            section_type: classify_section_type(section, inputs.terminal_points),
        });
    }

    OptimizeResponse {
        sections,
        cable_routes: inputs.cable_routes,
        hanan_grid: inputs.hanan_grid,
        steiner_points: inputs.steiner_points,
        problematic_cables: inputs.problematic_cables,
        unrouted_cables: inputs.unrouted_cables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn section_touching_terminal_is_tagged_source() {
        let mut cables = BTreeSet::new();
        cables.insert("c1".to_string());
        let section = Section { network: "N1".to_string(), points: [Point::new(0, 0), Point::new(1, 0)], cables };
        let mut terminals = HashSet::new();
        terminals.insert(Point::new(0, 0));
        assert_eq!(classify_section_type(&section, &terminals), SectionType::Source);
    }

    #[test]
    fn section_away_from_terminals_is_trunk() {
        let mut cables = BTreeSet::new();
        cables.insert("c1".to_string());
        let section = Section { network: "N1".to_string(), points: [Point::new(5, 5), Point::new(6, 5)], cables };
        let terminals = HashSet::new();
        assert_eq!(classify_section_type(&section, &terminals), SectionType::Trunk);
    }
}
