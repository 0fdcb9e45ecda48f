//! Canonicalization and equating of terms

use super::{IndexedFormula, StoreResult};
use crate::factory::Indexable;
use crate::namespace::link;
use crate::statement::Position;
use crate::term::{Literal, Term};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use tracing::debug;

impl IndexedFormula {
    /// The term `term` has been merged into, or `term` itself
    pub fn canon(&self, term: &Term) -> Term {
        self.canon_ref(term).clone()
    }

    pub(super) fn canon_ref<'a>(&'a self, term: &'a Term) -> &'a Term {
        if self.redirections.is_empty() {
            return term;
        }
        self.redirections
            .get(&self.factory.id(term))
            .unwrap_or(term)
    }

    /// Index key of the canonical form of `term`
    pub fn canon_id(&self, term: &Term) -> Indexable {
        let key = self.factory.id(term);
        match self.redirections.get(&key) {
            Some(survivor) => self.factory.id(survivor),
            None => key,
        }
    }

    /// Record that two terms denote the same thing.
    ///
    /// The smaller term in the total term order survives; the other is
    /// redirected to it and its statements are refiled under the survivor.
    /// Always returns true.
    pub fn equate(&mut self, a: &Term, b: &Term) -> StoreResult<bool> {
        let a = self.canon(a);
        let b = self.canon(b);
        match a.compare_term(&b) {
            Ordering::Equal => Ok(true),
            Ordering::Less => self.replace_with(&b, &a),
            Ordering::Greater => self.replace_with(&a, &b),
        }
    }

    /// Redirect `big` to `small`. Both must already be canonical.
    fn replace_with(&mut self, big: &Term, small: &Term) -> StoreResult<bool> {
        debug!("Replacing {} with {}", big, small);
        let old = self.factory.id(big);
        let new = self.factory.id(small);

        self.index.rekey(&old, &new);
        self.redirections.insert(old.clone(), small.clone());

        let mut absorbed = self.aliases.remove(&old).unwrap_or_default();
        for alias in &absorbed {
            let key = self.factory.id(alias);
            self.redirections.insert(key, small.clone());
        }
        let aliases = self.aliases.entry(new.clone()).or_default();
        aliases.push(big.clone());
        aliases.append(&mut absorbed);

        move_actions(&mut self.class_actions, &old, &new);
        move_actions(&mut self.property_actions, &old, &new);

        if let Term::NamedNode(iri) = big {
            if Position::Subject.accepts(small.kind()) {
                self.add(
                    small.clone(),
                    Term::NamedNode(link::uri()),
                    Term::Literal(Literal::new_simple(iri.as_str())),
                )?;
            }
            if let Some(fetcher) = self.fetcher.as_mut() {
                fetcher.now_known_as(big, small);
            }
        }
        debug!("{} is now known as {}", big, small);
        Ok(true)
    }

    /// The canonical term followed by every term merged into it
    pub fn all_aliases(&self, term: &Term) -> Vec<Term> {
        let canonical = self.canon(term);
        let mut all = self
            .aliases
            .get(&self.factory.id(&canonical))
            .cloned()
            .unwrap_or_default();
        all.push(canonical);
        all
    }

    /// Whether two terms are equal or have been equated
    pub fn same_things(&self, a: &Term, b: &Term) -> bool {
        a == b || self.canon_ref(a) == self.canon_ref(b)
    }

    /// Every IRI the term is known by, canonical one first
    pub fn uris(&self, term: &Term) -> Vec<String> {
        let canonical = self.canon_ref(term);
        let mut uris = Vec::new();
        if canonical.is_named_node() {
            uris.push(canonical.value().to_string());
        }
        if let Some(aliases) = self.aliases.get(&self.factory.id(canonical)) {
            uris.extend(
                aliases
                    .iter()
                    .filter(|t| t.is_named_node())
                    .map(|t| t.value().to_string()),
            );
        }
        uris
    }

    /// Number of terms redirected to another
    pub fn redirection_count(&self) -> usize {
        self.redirections.len()
    }
}

/// Move an action list onto the survivor's key, absorbed term's actions
/// first
fn move_actions<A>(table: &mut FxHashMap<Indexable, Vec<A>>, old: &Indexable, new: &Indexable) {
    let Some(mut moved) = table.remove(old) else {
        return;
    };
    if let Some(existing) = table.remove(new) {
        moved.extend(existing);
    }
    table.insert(new.clone(), moved);
}
