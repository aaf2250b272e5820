//! Text protocol handling.
//!
//! Parsing and formatting of orders in power-prefixed notation, used by the
//! command-line front end and by tests to write scenarios compactly.

pub mod notation;

pub use notation::{format_order, format_orders, parse_order, parse_orders, NotationError};
