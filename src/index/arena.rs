//! Insertion-ordered statement storage

use super::StatementId;
use crate::statement::Statement;

/// Slot arena of statements
///
/// Removing a statement empties its slot; slots are not recycled so handles
/// stay unique until the arena is cleared.
#[derive(Debug, Clone, Default)]
pub struct StatementArena {
    slots: Vec<Option<Statement>>,
    live: usize,
}

impl StatementArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a statement and return its handle
    pub fn insert(&mut self, statement: Statement) -> StatementId {
        let id = StatementId(self.slots.len() as u64);
        self.slots.push(Some(statement));
        self.live += 1;
        id
    }

    pub fn get(&self, id: StatementId) -> Option<&Statement> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: StatementId) -> bool {
        self.get(id).is_some()
    }

    /// Take a statement out, leaving its slot empty
    pub fn remove(&mut self, id: StatementId) -> Option<Statement> {
        let removed = self.slots.get_mut(id.0 as usize).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    /// Number of live statements
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live statements in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (StatementId, &Statement)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|st| (StatementId(i as u64), st)))
    }

    pub fn ids(&self) -> impl Iterator<Item = StatementId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}
