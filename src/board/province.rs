//! Province identifiers, terrain classification and the great powers.
//!
//! Provinces are addressed by their 3-letter lowercase code (`ber`, `lyo`).
//! The code is stored inline so it can be copied freely and used as an
//! index key without allocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string that is not a valid 3-letter province code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid province code '{0}'")]
pub struct InvalidProvinceCode(pub String);

/// A province code such as `ber` or `nth`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProvinceCode([u8; 3]);

impl ProvinceCode {
    /// Parses a province code. Accepts exactly three ASCII letters, any case.
    pub fn new(s: &str) -> Result<Self, InvalidProvinceCode> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(InvalidProvinceCode(s.to_string()));
        }
        Ok(ProvinceCode([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
            bytes[2].to_ascii_lowercase(),
        ]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // `new` only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for ProvinceCode {
    type Err = InvalidProvinceCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProvinceCode::new(s)
    }
}

impl TryFrom<String> for ProvinceCode {
    type Error = InvalidProvinceCode;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ProvinceCode::new(&s)
    }
}

impl From<ProvinceCode> for String {
    fn from(code: ProvinceCode) -> String {
        code.as_str().to_string()
    }
}

impl fmt::Display for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProvinceCode({})", self.as_str())
    }
}

/// Classifies a province by terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvinceKind {
    Inland,
    Coastal,
    Sea,
}

/// One of the seven great powers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    Austria,
    England,
    France,
    Germany,
    Italy,
    Russia,
    Turkey,
}

/// All seven powers in standard order.
pub const ALL_POWERS: [Power; 7] = [
    Power::Austria,
    Power::England,
    Power::France,
    Power::Germany,
    Power::Italy,
    Power::Russia,
    Power::Turkey,
];

impl Power {
    /// Returns the lowercase full name of this power.
    pub const fn name(self) -> &'static str {
        match self {
            Power::Austria => "austria",
            Power::England => "england",
            Power::France => "france",
            Power::Germany => "germany",
            Power::Italy => "italy",
            Power::Russia => "russia",
            Power::Turkey => "turkey",
        }
    }

    /// Returns the single-letter lowercase symbol (`a`, `e`, `f`, ...).
    pub const fn symbol(self) -> char {
        match self {
            Power::Austria => 'a',
            Power::England => 'e',
            Power::France => 'f',
            Power::Germany => 'g',
            Power::Italy => 'i',
            Power::Russia => 'r',
            Power::Turkey => 't',
        }
    }

    /// Parses a power from its full name or single-letter symbol, ignoring case.
    pub fn parse(s: &str) -> Option<Power> {
        let lower = s.to_ascii_lowercase();
        ALL_POWERS
            .iter()
            .copied()
            .find(|p| p.name() == lower || (lower.len() == 1 && lower.starts_with(p.symbol())))
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
