//! Shared fixture builders for `engine`'s and `server`'s test suites.
//! Mirrors the teacher repo's own `testing_utils` path dependency used from
//! its `engine`/`cli` crates.

use std::collections::HashMap;

use tray_router_engine::model::{CableWire, MachineWire, NetworkWire, OptimizeRequest, Point};

pub struct MachineSpec {
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
}

pub struct CableSpec {
    pub label: &'static str,
    pub source: &'static str,
    pub target: &'static str,
    pub function: &'static str,
    pub length: Option<f64>,
}

pub struct NetworkSpec {
    pub id: &'static str,
    pub functions: &'static [&'static str],
}

/// Builds an [`OptimizeRequest`] from plain specs, filling in the wire
/// fields a fixture rarely needs to vary (diameter, tray level, walls).
pub fn layout(
    width: i32,
    height: i32,
    machines: &[MachineSpec],
    cables: &[CableSpec],
    networks: &[NetworkSpec],
) -> OptimizeRequest {
    layout_with_walls(width, height, &[], &[], machines, cables, networks)
}

pub fn layout_with_walls(
    width: i32,
    height: i32,
    walls: &[Point],
    perforations: &[Point],
    machines: &[MachineSpec],
    cables: &[CableSpec],
    networks: &[NetworkSpec],
) -> OptimizeRequest {
    let machines = machines
        .iter()
        .map(|m| (m.name.to_string(), MachineWire { x: m.x, y: m.y, description: None, merged_history: None }))
        .collect::<HashMap<_, _>>();

    let cables = cables
        .iter()
        .enumerate()
        .map(|(index, c)| CableWire {
            id: index.to_string(),
            cable_label: c.label.to_string(),
            source: c.source.to_string(),
            target: c.target.to_string(),
            cable_type: "generic".to_string(),
            cable_function: c.function.to_string(),
            diameter: 10.0,
            length: c.length,
            tray_level: None,
            original_source: None,
            original_target: None,
        })
        .collect();

    let networks = networks
        .iter()
        .map(|n| NetworkWire {
            id: n.id.to_string(),
            name: n.id.to_string(),
            functions: n.functions.iter().map(|f| f.to_string()).collect(),
            color: None,
        })
        .collect();

    OptimizeRequest {
        width,
        height,
        walls: walls.to_vec(),
        trays: Vec::new(),
        perforations: perforations.to_vec(),
        machines,
        cables,
        networks,
    }
}

/// Scenario S1 (spec §8): two machines, empty grid, single cable.
pub fn scenario_s1_two_machines() -> OptimizeRequest {
    layout(
        10,
        10,
        &[MachineSpec { name: "A", x: 1, y: 1 }, MachineSpec { name: "B", x: 8, y: 8 }],
        &[CableSpec { label: "cab-1", source: "A", target: "B", function: "F", length: None }],
        &[NetworkSpec { id: "N", functions: &["F"] }],
    )
}

/// Scenario S2 (spec §8): three-terminal shared trunk, one network.
pub fn scenario_s2_shared_trunk() -> OptimizeRequest {
    layout(
        10,
        10,
        &[
            MachineSpec { name: "A", x: 1, y: 1 },
            MachineSpec { name: "B", x: 9, y: 1 },
            MachineSpec { name: "C", x: 5, y: 9 },
        ],
        &[
            CableSpec { label: "ab", source: "A", target: "B", function: "F", length: None },
            CableSpec { label: "ac", source: "A", target: "C", function: "F", length: None },
            CableSpec { label: "bc", source: "B", target: "C", function: "F", length: None },
        ],
        &[NetworkSpec { id: "N", functions: &["F"] }],
    )
}

/// Scenario S3 (spec §8): a perforated wall the route must pass through.
pub fn scenario_s3_wall_with_perforation() -> OptimizeRequest {
    let walls: Vec<Point> = (3..=7).map(|y| Point::new(5, y)).collect();
    layout_with_walls(
        10,
        10,
        &walls,
        &[Point::new(5, 5)],
        &[MachineSpec { name: "A", x: 1, y: 5 }, MachineSpec { name: "B", x: 9, y: 5 }],
        &[CableSpec { label: "ab", source: "A", target: "B", function: "F", length: None }],
        &[NetworkSpec { id: "N", functions: &["F"] }],
    )
}

/// Scenario S4 (spec §8): two networks routed in an adjacent corridor.
pub fn scenario_s4_two_networks() -> OptimizeRequest {
    layout(
        10,
        10,
        &[
            MachineSpec { name: "A", x: 1, y: 1 },
            MachineSpec { name: "B", x: 1, y: 9 },
            MachineSpec { name: "C", x: 2, y: 2 },
            MachineSpec { name: "D", x: 2, y: 8 },
        ],
        &[
            CableSpec { label: "ab", source: "A", target: "B", function: "F1", length: None },
            CableSpec { label: "cd", source: "C", target: "D", function: "F2", length: None },
        ],
        &[NetworkSpec { id: "N1", functions: &["F1"] }, NetworkSpec { id: "N2", functions: &["F2"] }],
    )
}

/// Scenario S5 (spec §8): a cable specified too short for its actual route.
pub fn scenario_s5_insufficient_length() -> OptimizeRequest {
    layout(
        12,
        12,
        &[MachineSpec { name: "A", x: 0, y: 0 }, MachineSpec { name: "B", x: 10, y: 10 }],
        &[CableSpec { label: "ab", source: "A", target: "B", function: "F", length: Some(1.0) }],
        &[NetworkSpec { id: "N", functions: &["F"] }],
    )
}
