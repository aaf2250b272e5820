//! Board representation.
//!
//! Contains the map graph, province codes, units and the order model
//! consumed by the adjudicator.

pub mod map;
pub mod order;
pub mod province;
pub mod unit;

pub use map::{Adjacents, GameMap, MapError, MapGraph, Passage, ProvinceData};
pub use order::{KeyError, Order, OrderKey, OrderKind, OrderStatus};
pub use province::{InvalidProvinceCode, Power, ProvinceCode, ProvinceKind, ALL_POWERS};
pub use unit::{Unit, UnitType};
