//! Order resolution.
//!
//! Resolves a set of simultaneous movement orders into outcomes (succeeded,
//! failed, dislodged, cut, ...) with a fixed sequence of passes followed by
//! a fixpoint over the remaining contested provinces.

pub mod adjudicator;
pub mod reach;

pub use adjudicator::{
    adjudicate, adjudicate_batch, AdjudicationError, Adjudicator, DislodgedUnit, Resolution,
};
pub use reach::{can_convoy, reachable_coasts};
