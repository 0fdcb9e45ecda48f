//! Subject, predicate, object and graph indexes

use super::StatementId;
use crate::factory::Indexable;
use crate::statement::Position;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use tracing::trace;

type Buckets = FxHashMap<Indexable, Vec<StatementId>>;

/// Four maps from canonical term key to the statements using that term in
/// the corresponding position. Buckets are kept sorted by handle.
#[derive(Debug, Clone, Default)]
pub struct QuadIndex {
    buckets: [Buckets; 4],
}

impl QuadIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handle to the bucket for `key`
    pub fn insert(&mut self, position: Position, key: Indexable, id: StatementId) {
        let bucket = self.buckets[position.index()].entry(key).or_default();
        // New handles are the largest, so this is almost always a push
        match bucket.last() {
            Some(&last) if last >= id => {
                if let Err(at) = bucket.binary_search(&id) {
                    bucket.insert(at, id);
                }
            }
            _ => bucket.push(id),
        }
    }

    /// Remove a handle from a bucket. Returns false if the bucket or the
    /// handle was missing.
    pub fn remove(&mut self, position: Position, key: &Indexable, id: StatementId) -> bool {
        let map = &mut self.buckets[position.index()];
        let Some(bucket) = map.get_mut(key) else {
            return false;
        };
        let Ok(at) = bucket.binary_search(&id) else {
            return false;
        };
        bucket.remove(at);
        if bucket.is_empty() {
            map.remove(key);
        }
        true
    }

    /// Handles filed under `key`, in insertion order
    pub fn bucket(&self, position: Position, key: &Indexable) -> &[StatementId] {
        self.buckets[position.index()]
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_bucket(&self, position: Position, key: &Indexable) -> bool {
        self.buckets[position.index()].contains_key(key)
    }

    /// Keys with a non-empty bucket at this position
    pub fn keys(&self, position: Position) -> impl Iterator<Item = &Indexable> {
        self.buckets[position.index()].keys()
    }

    pub fn buckets(&self, position: Position) -> impl Iterator<Item = (&Indexable, &[StatementId])> {
        self.buckets[position.index()]
            .iter()
            .map(|(k, v)| (k, v.as_slice()))
    }

    /// Move every bucket filed under `old` onto `new` in all four indexes
    pub fn rekey(&mut self, old: &Indexable, new: &Indexable) {
        if old == new {
            return;
        }
        for map in self.buckets.iter_mut() {
            move_bucket(map, old, new);
        }
    }

    pub fn clear(&mut self) {
        for map in self.buckets.iter_mut() {
            map.clear();
        }
    }
}

/// Move the handles under `old` onto `new`, merging with what is there
fn move_bucket(map: &mut Buckets, old: &Indexable, new: &Indexable) {
    let Some(moved) = map.remove(old) else {
        return;
    };
    trace!("Moving {} entries from {} to {}", moved.len(), old, new);
    match map.remove(new) {
        Some(existing) => {
            map.insert(new.clone(), merge_sorted(existing, moved));
        }
        None => {
            map.insert(new.clone(), moved);
        }
    }
}

/// Merge two sorted vectors, dropping duplicates
fn merge_sorted<T: Ord>(a: Vec<T>, b: Vec<T>) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut a = a.into_iter().peekable();
    let mut b = b.into_iter().peekable();
    loop {
        let order = match (a.peek(), b.peek()) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => break,
        };
        match order {
            Ordering::Less => out.extend(a.next()),
            Ordering::Greater => out.extend(b.next()),
            Ordering::Equal => {
                out.extend(a.next());
                b.next();
            }
        }
    }
    out
}
