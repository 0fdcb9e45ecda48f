//! Patches and node copying

use super::{IndexedFormula, StoreError, StoreResult};
use crate::index::StatementId;
use crate::statement::{QuadPattern, Statement};
use crate::term::Term;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Statements to delete from and insert into one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub delete: Vec<Statement>,
    pub insert: Vec<Statement>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delete(mut self, statements: impl IntoIterator<Item = Statement>) -> Self {
        self.delete.extend(statements);
        self
    }

    pub fn with_insert(mut self, statements: impl IntoIterator<Item = Statement>) -> Self {
        self.insert.extend(statements);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.insert.is_empty()
    }
}

/// Options for [`IndexedFormula::copy_to`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFlag {
    /// Also copy statements with the template as object
    TwoDirection,
    /// Remove the template's statements after copying
    Delete,
}

impl IndexedFormula {
    /// Apply a patch to the document `target`.
    ///
    /// Every statement to delete must be found in `target`, otherwise the
    /// patch fails before anything is changed. Inserted statements are put
    /// in `target` whatever graph they carry.
    pub fn apply_patch(&mut self, patch: &Patch, target: &Term) -> StoreResult<()> {
        let mut doomed = Vec::with_capacity(patch.delete.len());
        let mut missing = Vec::new();
        for statement in &patch.delete {
            let pattern = QuadPattern::new(
                Some(statement.subject.clone()),
                Some(statement.predicate.clone()),
                Some(statement.object.clone()),
                Some(target.clone()),
            );
            match self.match_ids(&pattern, true).first() {
                Some(&id) => doomed.push(id),
                None => missing.push(statement.to_nt()),
            }
        }
        if !missing.is_empty() {
            return Err(StoreError::Patch(format!(
                "Could not find to delete: {}",
                missing.join("\n or ")
            )));
        }

        doomed.sort_unstable();
        doomed.dedup();
        for id in doomed {
            self.remove_statement(id)?;
        }
        for statement in &patch.insert {
            self.add_in(
                statement.subject.clone(),
                statement.predicate.clone(),
                statement.object.clone(),
                target.clone(),
            )?;
        }
        debug!(
            "Patched {}: -{} +{}",
            target,
            patch.delete.len(),
            patch.insert.len()
        );
        Ok(())
    }

    /// Give `target` the properties of `template`.
    ///
    /// Copied statements go in the default graph. Blank node and collection
    /// objects are copied fresh, so the target shares no anonymous structure
    /// with the template. With [`CopyFlag::TwoDirection`] statements pointing
    /// at the template are copied to point at the target too; with
    /// [`CopyFlag::Delete`] the template's statements are removed afterwards.
    pub fn copy_to(&mut self, template: &Term, target: &Term, flags: &[CopyFlag]) -> StoreResult<()> {
        let mut copies = FxHashMap::default();
        copies.insert(template.clone(), target.clone());
        self.copy_into(template, target, flags, &mut copies)
    }

    fn copy_into(
        &mut self,
        template: &Term,
        target: &Term,
        flags: &[CopyFlag],
        copies: &mut FxHashMap<Term, Term>,
    ) -> StoreResult<()> {
        let outgoing = self.match_ids(&QuadPattern::any().with_subject(template.clone()), false);
        let incoming = if flags.contains(&CopyFlag::TwoDirection) {
            self.match_ids(&QuadPattern::any().with_object(template.clone()), false)
        } else {
            Vec::new()
        };

        let snapshot = |kb: &Self, ids: &[StatementId]| -> Vec<Statement> {
            ids.iter().filter_map(|&id| kb.get(id).cloned()).collect()
        };
        let outgoing_statements = snapshot(self, &outgoing);
        let incoming_statements = snapshot(self, &incoming);

        for statement in &outgoing_statements {
            let object = self.copy_term(&statement.object, copies)?;
            self.add(target.clone(), statement.predicate.clone(), object)?;
        }
        for statement in &incoming_statements {
            self.add(statement.subject.clone(), statement.predicate.clone(), target.clone())?;
        }

        if flags.contains(&CopyFlag::Delete) {
            // a self-loop shows up in both directions
            let mut doomed = outgoing;
            doomed.extend(incoming);
            doomed.sort_unstable();
            doomed.dedup();
            for id in doomed {
                if self.get(id).is_some() {
                    self.remove_statement(id)?;
                }
            }
        }
        Ok(())
    }

    /// The copy of an object term: blank nodes and collections get fresh
    /// counterparts, everything else is shared.
    fn copy_term(&mut self, term: &Term, copies: &mut FxHashMap<Term, Term>) -> StoreResult<Term> {
        let anonymous = matches!(term, Term::BlankNode(_) | Term::Collection(_));
        if let Some(copy) = copies.get(term).filter(|_| anonymous) {
            return Ok(copy.clone());
        }
        match term {
            Term::BlankNode(_) => {
                let fresh = self.bnode(None);
                copies.insert(term.clone(), fresh.clone());
                self.copy_into(term, &fresh, &[], copies)?;
                Ok(fresh)
            }
            Term::Collection(list) => {
                let elements = list.elements().to_vec();
                let mut copied = Vec::with_capacity(elements.len());
                for element in &elements {
                    copied.push(self.copy_term(element, copies)?);
                }
                let fresh = self.collection(copied)?;
                copies.insert(term.clone(), fresh.clone());
                Ok(fresh)
            }
            other => Ok(other.clone()),
        }
    }
}
