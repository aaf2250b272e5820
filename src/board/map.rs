//! Map graph: provinces, terrain and adjacency.
//!
//! The adjudicator only reads the map through the [`MapGraph`] trait. The
//! concrete [`GameMap`] is deserialized from a JSON definition; the standard
//! 75-province map is embedded in the binary and parsed once on first use.
//!
//! Edges are tagged with the unit types that may cross them, so a coastal
//! pair like `gas`/`mar` can be army-only while `nth`/`nwy` is fleet-only.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::province::{Power, ProvinceCode, ProvinceKind};
use super::unit::UnitType;

static STANDARD_JSON: &str = include_str!("../../maps/standard.json");

static STANDARD: LazyLock<GameMap> = LazyLock::new(|| {
    GameMap::from_json(STANDARD_JSON).expect("embedded standard map is valid")
});

/// Errors that can occur when loading a map definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("failed to read map file {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse map definition: {0}")]
    Parse(String),

    #[error("province '{0}' is defined more than once")]
    DuplicateProvince(ProvinceCode),

    #[error("province '{from}' lists unknown neighbor '{to}'")]
    UnknownNeighbor { from: ProvinceCode, to: ProvinceCode },

    #[error("adjacency {from} -> {to} has no matching reverse edge")]
    AsymmetricEdge { from: ProvinceCode, to: ProvinceCode },
}

/// Which unit types may cross an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<UnitType>", into = "Vec<UnitType>")]
pub struct Passage {
    pub army: bool,
    pub fleet: bool,
}

impl Passage {
    /// Returns true if a unit of the given type may cross.
    pub const fn allows(self, unit_type: UnitType) -> bool {
        match unit_type {
            UnitType::Army => self.army,
            UnitType::Fleet => self.fleet,
        }
    }
}

impl From<Vec<UnitType>> for Passage {
    fn from(types: Vec<UnitType>) -> Self {
        Passage {
            army: types.contains(&UnitType::Army),
            fleet: types.contains(&UnitType::Fleet),
        }
    }
}

impl From<Passage> for Vec<UnitType> {
    fn from(passage: Passage) -> Self {
        let mut types = Vec::with_capacity(2);
        if passage.army {
            types.push(UnitType::Army);
        }
        if passage.fleet {
            types.push(UnitType::Fleet);
        }
        types
    }
}

/// Neighbor table of one province, ordered by code.
pub type Adjacents = BTreeMap<ProvinceCode, Passage>;

/// Read-only view of a map used by the adjudicator.
pub trait MapGraph {
    /// Terrain of a province, or `None` if the map does not know it.
    fn province_kind(&self, province: ProvinceCode) -> Option<ProvinceKind>;

    /// Neighbors of a province with the unit types allowed on each edge.
    fn adjacents(&self, province: ProvinceCode) -> Option<&Adjacents>;

    /// Returns true if the map defines the province.
    fn contains(&self, province: ProvinceCode) -> bool {
        self.province_kind(province).is_some()
    }

    /// Returns true if a unit of the given type may move directly between
    /// the two provinces. `None` accepts an edge of any type.
    fn is_adjacent(&self, from: ProvinceCode, to: ProvinceCode, unit_type: Option<UnitType>) -> bool {
        self.adjacents(from)
            .and_then(|adj| adj.get(&to))
            .is_some_and(|passage| match unit_type {
                Some(t) => passage.allows(t),
                None => passage.army || passage.fleet,
            })
    }
}

/// Static data for one province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceData {
    pub code: ProvinceCode,
    pub name: String,
    pub kind: ProvinceKind,
    #[serde(default)]
    pub supply_center: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<Power>,
    pub adjacents: Adjacents,
}

#[derive(Debug, Deserialize)]
struct MapDefinition {
    name: String,
    provinces: Vec<ProvinceData>,
}

/// A validated map loaded from a JSON definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMap {
    name: String,
    provinces: BTreeMap<ProvinceCode, ProvinceData>,
}

impl GameMap {
    /// Returns the embedded standard Diplomacy map.
    pub fn standard() -> &'static GameMap {
        &STANDARD
    }

    /// Parses and validates a map definition from a JSON string.
    pub fn from_json(json: &str) -> Result<GameMap, MapError> {
        let def: MapDefinition =
            serde_json::from_str(json).map_err(|e| MapError::Parse(e.to_string()))?;
        GameMap::from_provinces(def.name, def.provinces)
    }

    /// Loads a map definition from a JSON file.
    pub fn load(path: &Path) -> Result<GameMap, MapError> {
        let data = fs::read_to_string(path).map_err(|e| MapError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        GameMap::from_json(&data)
    }

    /// Builds a map from province records, checking that every edge names a
    /// known province and has a reverse edge with the same passage.
    pub fn from_provinces(name: String, list: Vec<ProvinceData>) -> Result<GameMap, MapError> {
        let mut provinces = BTreeMap::new();
        for data in list {
            let code = data.code;
            if provinces.insert(code, data).is_some() {
                return Err(MapError::DuplicateProvince(code));
            }
        }

        for (from, data) in &provinces {
            for (to, passage) in &data.adjacents {
                let Some(neighbor) = provinces.get(to) else {
                    return Err(MapError::UnknownNeighbor { from: *from, to: *to });
                };
                if neighbor.adjacents.get(from) != Some(passage) {
                    return Err(MapError::AsymmetricEdge { from: *from, to: *to });
                }
            }
        }

        tracing::debug!(map = %name, provinces = provinces.len(), "map loaded");
        Ok(GameMap { name, provinces })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a province record.
    pub fn province(&self, code: ProvinceCode) -> Option<&ProvinceData> {
        self.provinces.get(&code)
    }

    /// Iterates over all provinces in code order.
    pub fn provinces(&self) -> impl Iterator<Item = &ProvinceData> {
        self.provinces.values()
    }

    /// Returns the number of supply centers on the map.
    pub fn supply_center_count(&self) -> usize {
        self.provinces.values().filter(|p| p.supply_center).count()
    }
}

impl MapGraph for GameMap {
    fn province_kind(&self, province: ProvinceCode) -> Option<ProvinceKind> {
        self.provinces.get(&province).map(|p| p.kind)
    }

    fn adjacents(&self, province: ProvinceCode) -> Option<&Adjacents> {
        self.provinces.get(&province).map(|p| &p.adjacents)
    }
}
