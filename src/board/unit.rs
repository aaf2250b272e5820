//! Unit types and ownership.
//!
//! Represents armies and fleets, their owning power, and their current
//! province.

use serde::{Deserialize, Serialize};

use super::province::{Power, ProvinceCode};

/// The type of a military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Army,
    Fleet,
}

impl UnitType {
    /// Returns the uppercase abbreviation used in order notation.
    pub const fn notation_char(self) -> char {
        match self {
            UnitType::Army => 'A',
            UnitType::Fleet => 'F',
        }
    }

    /// Returns the lowercase abbreviation used in compact order keys.
    pub const fn key_char(self) -> char {
        match self {
            UnitType::Army => 'a',
            UnitType::Fleet => 'f',
        }
    }

    /// Parses a unit type from its abbreviation, ignoring case.
    pub fn from_char(c: char) -> Option<UnitType> {
        match c.to_ascii_lowercase() {
            'a' => Some(UnitType::Army),
            'f' => Some(UnitType::Fleet),
            _ => None,
        }
    }
}

/// A military unit on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub unit_type: UnitType,
    pub power: Power,
    pub province: ProvinceCode,
}

impl Unit {
    pub fn new(unit_type: UnitType, power: Power, province: ProvinceCode) -> Self {
        Unit {
            unit_type,
            power,
            province,
        }
    }

    pub fn army(power: Power, province: ProvinceCode) -> Self {
        Unit::new(UnitType::Army, power, province)
    }

    pub fn fleet(power: Power, province: ProvinceCode) -> Self {
        Unit::new(UnitType::Fleet, power, province)
    }
}
