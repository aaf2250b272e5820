//! Runtime configuration for the command-line adjudicator.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::board::map::{GameMap, MapError};

/// How results are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per order, then standoffs and dislodgements.
    #[default]
    Text,
    /// The full resolution as a JSON document.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Adjudicator configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// JSON map definition to load instead of the embedded standard map.
    pub map_path: Option<PathBuf>,
    pub output: OutputFormat,
}

impl Config {
    /// Construct configuration from process environment variables.
    ///
    /// - `ADJUDICATOR_MAP` - path to a JSON map definition (default: standard map)
    /// - `ADJUDICATOR_OUTPUT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("ADJUDICATOR_MAP").filter(|p| !p.trim().is_empty()) {
            config.map_path = Some(PathBuf::from(path));
        }

        if let Some(output) = read_var::<OutputFormat>(&lookup, "ADJUDICATOR_OUTPUT") {
            config.output = output;
        }

        config
    }

    /// Loads the configured map.
    pub fn load_map(&self) -> Result<GameMap, MapError> {
        match &self.map_path {
            Some(path) => GameMap::load(path),
            None => Ok(GameMap::standard().clone()),
        }
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
{
    lookup(key)?.parse().ok()
}
