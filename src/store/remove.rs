//! Statement removal and the consistency self-check

use super::{IndexedFormula, StoreError, StoreResult};
use crate::index::StatementId;
use crate::statement::{Position, QuadPattern, Statement};
use crate::term::Term;
use tracing::{debug, warn};

impl IndexedFormula {
    /// Remove one statement equal to `statement` (under smushing).
    ///
    /// Fails with [`StoreError::NotFound`] when nothing matches.
    pub fn remove(&mut self, statement: &Statement) -> StoreResult<()> {
        let pattern = QuadPattern::new(
            Some(statement.subject.clone()),
            Some(statement.predicate.clone()),
            Some(statement.object.clone()),
            Some(statement.graph.clone()),
        );
        let id = self
            .match_ids(&pattern, true)
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(statement.to_nq()))?;
        self.remove_statement(id)?;
        Ok(())
    }

    /// [`remove`](Self::remove) each statement in turn. Stops at the first
    /// missing one; earlier removals stay done.
    pub fn remove_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> StoreResult<()> {
        for statement in statements {
            self.remove(&statement)?;
        }
        Ok(())
    }

    pub fn remove_statements(&mut self, statements: &[Statement]) -> StoreResult<()> {
        for statement in statements {
            self.remove(statement)?;
        }
        Ok(())
    }

    /// Remove the statement stored under `id` and hand it back
    pub fn remove_statement(&mut self, id: StatementId) -> StoreResult<Statement> {
        let statement = self
            .arena
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let keys = Position::ALL.map(|position| self.canon_id(statement.term(position)));
        for (position, key) in Position::ALL.into_iter().zip(keys) {
            if !self.index.remove(position, &key, id) {
                warn!("Statement removal: no {} index entry for {}", position, id);
            }
        }
        self.arena
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Remove up to `limit` statements matching the pattern. Returns how
    /// many were removed; an empty match is not an error.
    pub fn remove_many(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
        limit: Option<usize>,
    ) -> StoreResult<usize> {
        let pattern = QuadPattern::new(
            subject.cloned(),
            predicate.cloned(),
            object.cloned(),
            graph.cloned(),
        );
        let mut doomed = self.match_ids(&pattern, false);
        if let Some(limit) = limit {
            doomed.truncate(limit);
        }
        for id in &doomed {
            self.remove_statement(*id)?;
        }
        debug!("Removed {} statements", doomed.len());
        Ok(doomed.len())
    }

    /// Remove every statement matching the pattern
    pub fn remove_matches(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> StoreResult<usize> {
        self.remove_many(subject, predicate, object, graph, None)
    }

    /// Remove every statement in the given graph
    pub fn remove_document(&mut self, doc: &Term) -> StoreResult<usize> {
        self.remove_many(None, None, None, Some(doc), None)
    }

    /// Verify that the statement list and the four indexes agree: every
    /// stored statement is filed once under the canonical key of each of
    /// its terms, and every filed handle is a stored statement filed under
    /// the right key.
    pub fn check(&self) -> StoreResult<()> {
        for (id, statement) in self.arena.iter() {
            for position in Position::ALL {
                let key = self.canon_id(statement.term(position));
                if self.index.bucket(position, &key).binary_search(&id).is_err() {
                    return Err(StoreError::Consistency(format!(
                        "{} index does not have statement {} under {}",
                        position, statement, key
                    )));
                }
            }
        }
        for position in Position::ALL {
            for (key, bucket) in self.index.buckets(position) {
                if bucket.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(StoreError::Consistency(format!(
                        "{} index bucket {} is not strictly ordered",
                        position, key
                    )));
                }
                for &id in bucket {
                    let statement = self.arena.get(id).ok_or_else(|| {
                        StoreError::Consistency(format!(
                            "{} index holds removed statement {} under {}",
                            position, id, key
                        ))
                    })?;
                    if &self.canon_id(statement.term(position)) != key {
                        return Err(StoreError::Consistency(format!(
                            "Statement {} misfiled under {} in {} index",
                            statement, key, position
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::term::NamedNode;

    fn sym(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new(iri).unwrap())
    }

    #[test]
    fn test_remove_missing_fails() {
        let mut kb = IndexedFormula::new();
        let st = Statement::new(sym("ex:a"), sym("ex:p"), sym("ex:b"), kb.default_graph()).unwrap();
        assert!(matches!(kb.remove(&st), Err(StoreError::NotFound(_))));

        kb.add_statement(st.clone()).unwrap();
        kb.remove(&st).unwrap();
        assert!(kb
            .statements_matching(Some(&sym("ex:a")), Some(&sym("ex:p")), Some(&sym("ex:b")), None)
            .is_empty());
        kb.check().unwrap();
    }

    #[test]
    fn test_remove_statement_twice() {
        let mut kb = IndexedFormula::new();
        let id = kb
            .add(sym("ex:a"), sym("ex:p"), sym("ex:b"))
            .unwrap()
            .id()
            .unwrap();
        assert_eq!(kb.remove_statement(id).unwrap().subject, sym("ex:a"));
        assert!(kb.remove_statement(id).is_err());
    }

    #[test]
    fn test_remove_many_with_limit() {
        let mut kb = IndexedFormula::new();
        for o in ["ex:1", "ex:2", "ex:3"] {
            kb.add(sym("ex:a"), sym("ex:p"), sym(o)).unwrap();
        }
        kb.add(sym("ex:b"), sym("ex:p"), sym("ex:1")).unwrap();

        let removed = kb.remove_many(Some(&sym("ex:a")), None, None, None, Some(2)).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(kb.len(), 2);
        assert_eq!(kb.remove_matches(Some(&sym("ex:zzz")), None, None, None).unwrap(), 0);
        kb.check().unwrap();
    }

    #[test]
    fn test_remove_document() {
        let mut kb = IndexedFormula::new();
        kb.add_in(sym("ex:a"), sym("ex:p"), sym("ex:b"), sym("ex:doc1")).unwrap();
        kb.add_in(sym("ex:c"), sym("ex:p"), sym("ex:d"), sym("ex:doc1")).unwrap();
        kb.add_in(sym("ex:e"), sym("ex:p"), sym("ex:f"), sym("ex:doc2")).unwrap();
        assert_eq!(kb.remove_document(&sym("ex:doc1")).unwrap(), 2);
        assert_eq!(kb.len(), 1);
        kb.check().unwrap();
    }

    #[test]
    fn test_remove_through_alias() {
        let mut kb = IndexedFormula::new();
        kb.add(sym("ex:b"), sym("ex:p"), sym("ex:o")).unwrap();
        kb.equate(&sym("ex:a"), &sym("ex:b")).unwrap();
        let st = Statement::new(sym("ex:a"), sym("ex:p"), sym("ex:o"), kb.default_graph()).unwrap();
        kb.remove(&st).unwrap();
        assert_eq!(kb.whether(None, Some(&sym("ex:p")), None, None), 0);
        kb.check().unwrap();
    }
}
