//! String-keyed term factories

use super::{DataFactory, FactoryFeature, Indexable};
use crate::term::{BlankNode, Collection, NamedNode, Term, TermError, TermResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Graph IRI used for statements added without a graph
pub const DEFAULT_GRAPH_URI: &str = "chrome:theSession";

/// Factory keying terms by their N-Triples form. Does not mint collections.
///
/// Fresh blank nodes are labelled `n0`, `n1`, ... from a counter owned by
/// the factory, so two stores with their own factories never share state.
#[derive(Debug)]
pub struct CanonicalDataFactory {
    next_id: AtomicU64,
    default_graph: Term,
}

impl CanonicalDataFactory {
    pub fn new() -> Self {
        Self::with_default_graph(Term::NamedNode(NamedNode::new_unchecked(DEFAULT_GRAPH_URI)))
    }

    pub fn with_default_graph(default_graph: Term) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            default_graph,
        }
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for CanonicalDataFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFactory for CanonicalDataFactory {
    fn blank_node(&self, label: Option<&str>) -> BlankNode {
        match label {
            Some(label) => BlankNode::new(label),
            None => BlankNode::new(format!("n{}", self.next_id())),
        }
    }

    fn default_graph(&self) -> Term {
        self.default_graph.clone()
    }

    fn collection(&self, _elements: Vec<Term>) -> TermResult<Collection> {
        Err(TermError::CollectionsUnsupported)
    }

    fn id(&self, term: &Term) -> Indexable {
        match term {
            // Collections print like blank nodes, so they need a key of their own
            Term::Collection(c) => Indexable::Text(Arc::from(format!("({})", c.id()))),
            other => Indexable::Text(Arc::from(other.to_nt())),
        }
    }

    fn supports(&self, feature: FactoryFeature) -> bool {
        match feature {
            FactoryFeature::Collections | FactoryFeature::ReversibleIdentity => false,
            FactoryFeature::DefaultGraphType
            | FactoryFeature::EqualsMethod
            | FactoryFeature::Identity
            | FactoryFeature::VariableType => true,
        }
    }
}

/// [`CanonicalDataFactory`] plus collection support
#[derive(Debug, Default)]
pub struct ExtendedDataFactory {
    inner: CanonicalDataFactory,
}

impl ExtendedDataFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_graph(default_graph: Term) -> Self {
        Self {
            inner: CanonicalDataFactory::with_default_graph(default_graph),
        }
    }
}

impl DataFactory for ExtendedDataFactory {
    fn blank_node(&self, label: Option<&str>) -> BlankNode {
        self.inner.blank_node(label)
    }

    fn default_graph(&self) -> Term {
        self.inner.default_graph()
    }

    fn collection(&self, elements: Vec<Term>) -> TermResult<Collection> {
        Ok(Collection::new(self.inner.next_id(), elements))
    }

    fn id(&self, term: &Term) -> Indexable {
        self.inner.id(term)
    }

    fn supports(&self, feature: FactoryFeature) -> bool {
        feature == FactoryFeature::Collections || self.inner.supports(feature)
    }
}
