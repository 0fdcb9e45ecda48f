//! Factory assigning integer surrogate ids

use super::{DataFactory, FactoryFeature, Indexable};
use crate::term::{BlankNode, Collection, Term, TermResult};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, PoisonError};

/// Wraps another factory and replaces its string ids with dense integers.
///
/// Surrogates are handed out on first sight of a canonical form and never
/// reused, so they are stable for the life of the factory.
#[derive(Debug)]
pub struct InterningDataFactory<F> {
    inner: F,
    table: Mutex<FxHashMap<Indexable, u64>>,
}

impl<F: DataFactory> InterningDataFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            table: Mutex::new(FxHashMap::default()),
        }
    }

    /// Number of distinct terms seen so far
    pub fn interned(&self) -> usize {
        self.table.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<F: DataFactory> DataFactory for InterningDataFactory<F> {
    fn blank_node(&self, label: Option<&str>) -> BlankNode {
        self.inner.blank_node(label)
    }

    fn default_graph(&self) -> Term {
        self.inner.default_graph()
    }

    fn collection(&self, elements: Vec<Term>) -> TermResult<Collection> {
        self.inner.collection(elements)
    }

    fn id(&self, term: &Term) -> Indexable {
        let key = self.inner.id(term);
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let next = table.len() as u64;
        Indexable::Surrogate(*table.entry(key).or_insert(next))
    }

    fn supports(&self, feature: FactoryFeature) -> bool {
        self.inner.supports(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::CanonicalDataFactory;
    use crate::term::NamedNode;

    #[test]
    fn test_surrogates_are_stable() {
        let factory = InterningDataFactory::new(CanonicalDataFactory::new());
        let a = Term::NamedNode(NamedNode::new("ex:a").unwrap());
        let b = Term::NamedNode(NamedNode::new("ex:b").unwrap());

        assert_eq!(factory.id(&a), Indexable::Surrogate(0));
        assert_eq!(factory.id(&b), Indexable::Surrogate(1));
        assert_eq!(factory.id(&a.clone()), Indexable::Surrogate(0));
        assert_eq!(factory.interned(), 2);
    }
}
