//! C2: cable/network grouping (spec §4.2).
//!
//! Two different failure modes are at play here, and the spec is explicit
//! that they are handled at different layers (§4.2 vs §7):
//!
//! - A malformed *network list* (two networks claiming the same function)
//!   is a structural config error: the whole request is rejected
//!   (`EngineError::InputInvalid`, 400 at the HTTP boundary).
//! - A single *cable* that can't be resolved (unknown function, missing
//!   machine, source == target) does not fail the request — it is pulled
//!   out into the `unrouted` list (spec §4.2, §7 "the request does not
//!   fail") and every other cable still routes.

use std::collections::{BTreeMap, HashMap};

use crate::error::EngineError;
use crate::model::{CableWire, NetworkWire, Point, UnroutedCable, UnroutedReason};

/// Checks that network function sets are pairwise disjoint (spec §3
/// invariant). Returns `InputInvalid` naming the first collision found.
pub fn validate_networks(networks: &[NetworkWire]) -> Result<(), EngineError> {
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for net in networks {
        for function in &net.functions {
            match owner.get(function.as_str()) {
                Some(existing) if *existing != net.id.as_str() => {
                    return Err(EngineError::input_invalid(format!(
                        "function '{function}' is claimed by both network '{existing}' and network '{}'",
                        net.id
                    )));
                }
                _ => {
                    owner.insert(function.as_str(), net.id.as_str());
                }
            }
        }
    }
    Ok(())
}

pub struct Grouping {
    /// Network id -> cables of that network, in input order. A `BTreeMap`
    /// gives lexicographic network-id iteration for free, matching the
    /// deterministic cross-network processing order spec §5 requires.
    pub by_network: BTreeMap<String, Vec<CableWire>>,
    pub unrouted: Vec<UnroutedCable>,
}

pub fn group_cables_by_network(
    cables: &[CableWire],
    networks: &[NetworkWire],
    machine_positions: &HashMap<String, Point>,
) -> Grouping {
    let mut function_to_network: HashMap<&str, &str> = HashMap::new();
    for net in networks {
        for function in &net.functions {
            function_to_network.insert(function.as_str(), net.id.as_str());
        }
    }

    let mut by_network: BTreeMap<String, Vec<CableWire>> = BTreeMap::new();
    let mut unrouted = Vec::new();

    for cable in cables {
        if cable.source == cable.target {
            tracing::warn!(cable = %cable.cable_label, machine = %cable.source, "cable has identical source and target");
            unrouted.push(UnroutedCable {
                cable_label: cable.cable_label.clone(),
                source: cable.source.clone(),
                target: cable.target.clone(),
                reason: UnroutedReason::SameSourceAndTarget,
            });
            continue;
        }
        if !machine_positions.contains_key(&cable.source) {
            tracing::warn!(cable = %cable.cable_label, machine = %cable.source, "cable references unknown machine");
            unrouted.push(UnroutedCable {
                cable_label: cable.cable_label.clone(),
                source: cable.source.clone(),
                target: cable.target.clone(),
                reason: UnroutedReason::MissingMachine { machine: cable.source.clone() },
            });
            continue;
        }
        if !machine_positions.contains_key(&cable.target) {
            tracing::warn!(cable = %cable.cable_label, machine = %cable.target, "cable references unknown machine");
            unrouted.push(UnroutedCable {
                cable_label: cable.cable_label.clone(),
                source: cable.source.clone(),
                target: cable.target.clone(),
                reason: UnroutedReason::MissingMachine { machine: cable.target.clone() },
            });
            continue;
        }
        match function_to_network.get(cable.cable_function.as_str()) {
            Some(&network_id) => by_network.entry(network_id.to_string()).or_default().push(cable.clone()),
            None => {
                tracing::warn!(cable = %cable.cable_label, function = %cable.cable_function, "cable function matches no network");
                unrouted.push(UnroutedCable {
                    cable_label: cable.cable_label.clone(),
                    source: cable.source.clone(),
                    target: cable.target.clone(),
                    reason: UnroutedReason::UnknownNetwork,
                });
            }
        }
    }

    Grouping { by_network, unrouted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(id: &str, functions: &[&str]) -> NetworkWire {
        NetworkWire {
            id: id.to_string(),
            name: id.to_string(),
            functions: functions.iter().map(|s| s.to_string()).collect(),
            color: None,
        }
    }

    fn cable(label: &str, source: &str, target: &str, function: &str) -> CableWire {
        CableWire {
            id: label.to_string(),
            cable_label: label.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            cable_type: "generic".to_string(),
            cable_function: function.to_string(),
            diameter: 10.0,
            length: None,
            tray_level: None,
            original_source: None,
            original_target: None,
        }
    }

    #[test]
    fn disjoint_functions_validate() {
        let nets = vec![network("N1", &["Power"]), network("N2", &["Control"])];
        assert!(validate_networks(&nets).is_ok());
    }

    #[test]
    fn overlapping_functions_are_rejected() {
        let nets = vec![network("N1", &["Power"]), network("N2", &["Power"])];
        assert!(validate_networks(&nets).is_err());
    }

    #[test]
    fn unknown_function_is_unrouted_not_fatal() {
        let nets = vec![network("N1", &["Power"])];
        let machines = HashMap::from([("A".to_string(), Point::new(0, 0)), ("B".to_string(), Point::new(1, 1))]);
        let cables = vec![cable("c1", "A", "B", "Mystery")];
        let grouping = group_cables_by_network(&cables, &nets, &machines);
        assert!(grouping.by_network.is_empty());
        assert_eq!(grouping.unrouted.len(), 1);
        assert!(matches!(grouping.unrouted[0].reason, UnroutedReason::UnknownNetwork));
    }

    #[test]
    fn missing_machine_is_unrouted() {
        let nets = vec![network("N1", &["Power"])];
        let machines = HashMap::from([("A".to_string(), Point::new(0, 0))]);
        let cables = vec![cable("c1", "A", "Ghost", "Power")];
        let grouping = group_cables_by_network(&cables, &nets, &machines);
        assert_eq!(grouping.unrouted.len(), 1);
        assert!(matches!(&grouping.unrouted[0].reason, UnroutedReason::MissingMachine { machine } if machine == "Ghost"));
    }

    #[test]
    fn same_source_and_target_is_unrouted() {
        let nets = vec![network("N1", &["Power"])];
        let machines = HashMap::from([("A".to_string(), Point::new(0, 0))]);
        let cables = vec![cable("c1", "A", "A", "Power")];
        let grouping = group_cables_by_network(&cables, &nets, &machines);
        assert_eq!(grouping.unrouted.len(), 1);
        assert!(matches!(grouping.unrouted[0].reason, UnroutedReason::SameSourceAndTarget));
    }

    #[test]
    fn networks_iterate_lexicographically() {
        let nets = vec![network("Zeta", &["Z"]), network("Alpha", &["A"])];
        let machines = HashMap::from([("A".to_string(), Point::new(0, 0)), ("B".to_string(), Point::new(1, 1))]);
        let cables = vec![cable("c1", "A", "B", "Z"), cable("c2", "A", "B", "A")];
        let grouping = group_cables_by_network(&cables, &nets, &machines);
        let ids: Vec<&String> = grouping.by_network.keys().collect();
        assert_eq!(ids, vec!["Alpha", "Zeta"]);
    }
}
