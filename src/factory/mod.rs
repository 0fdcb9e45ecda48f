//! Term factories
//!
//! A knowledge base mints every term through a pluggable [`DataFactory`].
//! The factory decides how terms are identified for indexing ([`Indexable`]),
//! owns the counter behind fresh blank nodes and collections, and advertises
//! optional capabilities through [`FactoryFeature`] flags.

mod canonical;
mod interning;

pub use canonical::{CanonicalDataFactory, ExtendedDataFactory, DEFAULT_GRAPH_URI};
pub use interning::InterningDataFactory;

use crate::statement::Statement;
use crate::term::{BlankNode, Collection, Literal, NamedNode, Term, TermResult, Variable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Index key of a term
///
/// Either the term's canonical string form or an integer surrogate assigned
/// by the factory. Equal keys mean equal terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indexable {
    Text(Arc<str>),
    Surrogate(u64),
}

impl fmt::Display for Indexable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indexable::Text(s) => f.write_str(s),
            Indexable::Surrogate(n) => write!(f, "#{}", n),
        }
    }
}

/// Optional factory capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactoryFeature {
    /// Can mint [`Collection`] terms
    Collections,
    /// Has a dedicated default graph term
    DefaultGraphType,
    /// Terms compare by value
    EqualsMethod,
    /// Provides [`DataFactory::id`]
    Identity,
    /// Ids can be turned back into terms
    ReversibleIdentity,
    /// Has a variable term type
    VariableType,
}

/// Creates terms and statements and assigns them index keys
pub trait DataFactory: fmt::Debug + Send + Sync {
    fn named_node(&self, iri: &str) -> TermResult<NamedNode> {
        NamedNode::new(iri)
    }

    /// A blank node with the given label, or a fresh one
    fn blank_node(&self, label: Option<&str>) -> BlankNode;

    /// A literal whose second argument is either a language tag or, when it
    /// contains a `:`, a datatype IRI.
    fn literal(&self, value: &str, language_or_datatype: Option<&str>) -> TermResult<Literal> {
        match language_or_datatype {
            Some(dt) if dt.contains(':') => Ok(Literal::new_typed(value, self.named_node(dt)?)),
            Some(lang) => Ok(Literal::new(value, Some(lang), None)),
            None => Ok(Literal::new_simple(value)),
        }
    }

    fn variable(&self, name: &str) -> Variable {
        Variable::new(name)
    }

    /// The graph statements land in when none is given
    fn default_graph(&self) -> Term;

    /// A new collection with a fresh id
    fn collection(&self, elements: Vec<Term>) -> TermResult<Collection>;

    /// Build a statement, defaulting the graph
    fn quad(&self, subject: Term, predicate: Term, object: Term, graph: Option<Term>) -> TermResult<Statement> {
        let graph = graph.unwrap_or_else(|| self.default_graph());
        Statement::new(subject, predicate, object, graph)
    }

    /// Index key for a term. Must be deterministic for the factory's
    /// lifetime and equal exactly for equal terms.
    fn id(&self, term: &Term) -> Indexable;

    fn supports(&self, feature: FactoryFeature) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_language_or_datatype() {
        let factory = CanonicalDataFactory::new();
        let tagged = factory.literal("chat", Some("fr")).unwrap();
        assert_eq!(tagged.language(), Some("fr"));

        let typed = factory
            .literal("5", Some("http://www.w3.org/2001/XMLSchema#integer"))
            .unwrap();
        assert_eq!(typed.datatype().as_str(), "http://www.w3.org/2001/XMLSchema#integer");

        let plain = factory.literal("x", None).unwrap();
        assert_eq!(plain.language(), None);
    }

    #[test]
    fn test_quad_defaults_graph() {
        let factory = CanonicalDataFactory::new();
        let st = factory
            .quad(
                Term::NamedNode(factory.named_node("ex:s").unwrap()),
                Term::NamedNode(factory.named_node("ex:p").unwrap()),
                Term::NamedNode(factory.named_node("ex:o").unwrap()),
                None,
            )
            .unwrap();
        assert_eq!(st.graph, factory.default_graph());
    }
}
