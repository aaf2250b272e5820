//! Diplomacy movement-phase adjudicator.
//!
//! Exposes the board representation, the order resolver, order notation and
//! runtime configuration for use by integration tests and the binary entry
//! point.

pub mod board;
pub mod config;
pub mod protocol;
pub mod resolve;
