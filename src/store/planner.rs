//! Pattern matching over the four indexes
//!
//! One bound position is answered straight from its bucket. With several
//! bound positions the shortest of their buckets is scanned and filtered on
//! the others; real graphs have skewed fan-out, so one of the buckets is
//! usually small.

use super::IndexedFormula;
use crate::factory::Indexable;
use crate::index::StatementId;
use crate::statement::{Position, QuadPattern};
use crate::term::Term;

impl IndexedFormula {
    /// Handles of the statements matching `pattern`, in insertion order.
    ///
    /// The result is an owned snapshot, safe to use while mutating the
    /// store. `just_one` allows stopping after the first match.
    pub fn match_ids(&self, pattern: &QuadPattern, just_one: bool) -> Vec<StatementId> {
        let given: Vec<(Position, &Term, Indexable)> = pattern
            .given()
            .map(|(position, term)| {
                let canonical = self.canon_ref(term);
                (position, canonical, self.factory.id(canonical))
            })
            .collect();

        let limit = if just_one { 1 } else { usize::MAX };
        match given.as_slice() {
            [] => self.arena.ids().take(limit).collect(),
            [(position, _, key)] => self
                .index
                .bucket(*position, key)
                .iter()
                .take(limit)
                .copied()
                .collect(),
            _ => {
                let mut best: Option<(usize, &[StatementId])> = None;
                for (i, (position, _, key)) in given.iter().enumerate() {
                    let bucket = self.index.bucket(*position, key);
                    if bucket.is_empty() {
                        return Vec::new();
                    }
                    if best.map_or(true, |(_, b)| bucket.len() < b.len()) {
                        best = Some((i, bucket));
                    }
                }
                let Some((best_index, candidates)) = best else {
                    return Vec::new();
                };
                let checks: Vec<&(Position, &Term, Indexable)> = given
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != best_index)
                    .map(|(_, g)| g)
                    .collect();

                candidates
                    .iter()
                    .copied()
                    .filter(|&id| {
                        self.arena.get(id).is_some_and(|st| {
                            checks
                                .iter()
                                .all(|(position, term, _)| self.canon_ref(st.term(*position)) == *term)
                        })
                    })
                    .take(limit)
                    .collect()
            }
        }
    }

    /// Number of statements a pattern would scan, without filtering
    pub fn candidate_count(&self, pattern: &QuadPattern) -> usize {
        pattern
            .given()
            .map(|(position, term)| self.index.bucket(position, &self.canon_id(term)).len())
            .min()
            .unwrap_or_else(|| self.arena.len())
    }
}
