//! Statement storage and the four positional indexes
//!
//! Statements live once in a [`StatementArena`]; the [`QuadIndex`] holds
//! lightweight [`StatementId`] handles bucketed by the canonical key of each
//! position.

mod arena;
mod quad_index;

pub use arena::StatementArena;
pub use quad_index::QuadIndex;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a statement in the arena
///
/// Handles grow monotonically and are never reused, so sorting handles
/// sorts statements by insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementId(pub u64);

impl StatementId {
    pub fn new(id: u64) -> Self {
        StatementId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatementId({})", self.0)
    }
}

impl From<u64> for StatementId {
    fn from(id: u64) -> Self {
        StatementId(id)
    }
}
