//! Data model (spec §3): the wire request/response shapes and the plain
//! domain types the rest of the engine operates on.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

/// Distance between grid cells, in metres per cell (spec §3: "10 cm per
/// cell").
pub const CELL_SIZE_METRES: f64 = 0.1;

/// A grid coordinate. Equality is exact: every point that ever reaches the
/// engine is an integer grid cell (the spec's epsilon-0.1 comparison exists
/// in the source to guard against float midpoints; our projections are
/// clamped to integer cells before they're ever compared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Point) -> i64 {
        (self.x as i64 - other.x as i64).abs() + (self.y as i64 - other.y as i64).abs()
    }

    /// Interned grid index (`y * width + x`), used everywhere a hash map
    /// keyed by stringified coordinates would otherwise appear (spec §9).
    pub fn grid_index(self, width: i32) -> usize {
        (self.y as i64 * width as i64 + self.x as i64) as usize
    }
}

/// Canonical ordering of an unordered pair of endpoints (lexicographic on
/// `(x, y)`). Used as the stable half of every section/path cache key.
pub fn canonical_pair(a: Point, b: Point) -> (Point, Point) {
    if a <= b { (a, b) } else { (b, a) }
}

fn deserialize_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }
    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

fn deserialize_optional_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeNumOrStr {
        Num(f64),
        Str(String),
        None,
    }
    match Option::<MaybeNumOrStr>::deserialize(deserializer)? {
        None | Some(MaybeNumOrStr::None) => Ok(None),
        Some(MaybeNumOrStr::Num(n)) => Ok(Some(n)),
        Some(MaybeNumOrStr::Str(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse::<f64>().map(Some).map_err(serde::de::Error::custom)
            }
        }
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdWire {
        Str(String),
        Num(serde_json::Number),
    }
    match IdWire::deserialize(deserializer)? {
        IdWire::Str(s) => Ok(s),
        IdWire::Num(n) => Ok(n.to_string()),
    }
}

/// A machine position as given on the wire. `description`/`mergedHistory`
/// are accepted but not consulted by the engine (spec §3: "In the engine,
/// only the map name → cell position is required").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineWire {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub merged_history: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CableWire {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub cable_label: String,
    pub source: String,
    pub target: String,
    pub cable_type: String,
    pub cable_function: String,
    pub diameter: f64,
    #[serde(default, deserialize_with = "deserialize_optional_number_or_string")]
    pub length: Option<f64>,
    #[serde(default)]
    pub tray_level: Option<String>,
    #[serde(default)]
    pub original_source: Option<String>,
    #[serde(default)]
    pub original_target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkWire {
    pub id: String,
    pub name: String,
    pub functions: Vec<String>,
    /// Not part of the illustrative wire shape in spec §6, but §3 lists
    /// "display color" as a Network attribute that sections must carry.
    /// Color *generation* is an out-of-scope UI concern (spec §1); the
    /// engine only ever propagates a color it was given.
    #[serde(default)]
    pub color: Option<String>,
}

/// Fallback used when a network carries no `color` (spec §1 excludes color
/// generation from engine scope; this is a fixed placeholder, not a
/// per-network derivation).
pub const DEFAULT_NETWORK_COLOR: &str = "#888888";

impl NetworkWire {
    pub fn display_color(&self) -> String {
        self.color.clone().unwrap_or_else(|| DEFAULT_NETWORK_COLOR.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub walls: Vec<Point>,
    #[serde(default)]
    pub trays: Vec<Point>,
    #[serde(default)]
    pub perforations: Vec<Point>,
    pub machines: HashMap<String, MachineWire>,
    pub cables: Vec<CableWire>,
    pub networks: Vec<NetworkWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCableLengthRequest {
    pub cable_label: String,
    #[serde(deserialize_with = "deserialize_number_or_string")]
    pub new_length: f64,
    pub full_layout: OptimizeRequest,
}

// --- Response shapes -------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Source,
    Trunk,
    Target,
}

/// The full cable record preserved in a section's side map (spec §3:
/// "side map from cable label to the full cable record").
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CableRecord {
    pub id: String,
    pub cable_label: String,
    pub source: String,
    pub target: String,
    pub cable_type: String,
    pub cable_function: String,
    pub diameter: f64,
    pub length: Option<f64>,
    pub tray_level: Option<String>,
}

impl From<&CableWire> for CableRecord {
    fn from(c: &CableWire) -> Self {
        Self {
            id: c.id.clone(),
            cable_label: c.cable_label.clone(),
            source: c.source.clone(),
            target: c.target.clone(),
            cable_type: c.cable_type.clone(),
            cable_function: c.cable_function.clone(),
            diameter: c.diameter,
            length: c.length,
            tray_level: c.tray_level.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub key: String,
    pub points: Vec<Point>,
    pub network: String,
    pub color: String,
    pub cables: Vec<String>,
    /// A `BTreeMap` rather than a `HashMap` so the serialized object's key
    /// order is deterministic across runs (spec §8 property 5).
    pub details: BTreeMap<String, CableRecord>,
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

#[derive(Debug, Clone, Serialize)]
pub struct HananGrid {
    #[serde(rename = "xCoords")]
    pub x_coords: Vec<i32>,
    #[serde(rename = "yCoords")]
    pub y_coords: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CableStatus {
    Good,
    Warning,
    Error,
    Default,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblematicCable {
    pub cable_label: String,
    pub source: String,
    pub target: String,
    pub specified_length: f64,
    pub route_length: f64,
    pub theoretical_min_length: f64,
    pub excess_length: f64,
    pub excess_percentage: f64,
    pub status: CableStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnroutedReason {
    UnknownNetwork,
    MissingMachine { machine: String },
    SameSourceAndTarget,
    NoFeasiblePath,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnroutedCable {
    pub cable_label: String,
    pub source: String,
    pub target: String,
    pub reason: UnroutedReason,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub sections: Vec<SectionView>,
    /// A `BTreeMap` rather than a `HashMap` so the serialized object's key
    /// order is deterministic across runs (spec §8 property 5).
    pub cable_routes: BTreeMap<String, Vec<Point>>,
    pub hanan_grid: HananGrid,
    pub steiner_points: Vec<Point>,
    pub problematic_cables: Vec<ProblematicCable>,
    pub unrouted_cables: Vec<UnroutedCable>,
}
