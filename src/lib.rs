//! rdfkb - in-memory RDF knowledge base
//!
//! A quad store with four positional indexes, pattern matching that scans
//! the shortest candidate bucket, and identity "smushing": when
//! `owl:sameAs`, a functional property or an inverse functional property
//! shows two terms denote the same resource, they are merged so lookups by
//! either see every statement about both.
//!
//! # Layout
//!
//! - [`term`]: named nodes, blank nodes, literals, variables, collections
//! - [`statement`]: quads and quad patterns
//! - [`factory`]: pluggable term factories and index keys
//! - [`index`]: statement arena and the four positional indexes
//! - [`store`]: [`IndexedFormula`], the indexed store
//! - [`formula`]: the shared read API and RDFS helpers
//! - [`serialization`]: N-Triples and N-Quads
//! - [`config`]: store configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use rdfkb::{Formula, IndexedFormula, Term};
//! use rdfkb::namespace::owl;
//!
//! let mut kb = IndexedFormula::new();
//! let a = kb.sym("http://example.org/a").unwrap();
//! let a2 = kb.sym("http://example.org/a2").unwrap();
//! let age = kb.sym("http://example.org/age").unwrap();
//!
//! kb.add(a.clone(), Term::NamedNode(owl::same_as()), a2.clone()).unwrap();
//! kb.add(a2.clone(), age.clone(), 30i64).unwrap();
//!
//! // a2 was merged into a
//! assert_eq!(kb.canon(&a2), a);
//! assert_eq!(kb.statements_matching(Some(&a), Some(&age), None, None).len(), 1);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod factory;
pub mod formula;
pub mod index;
pub mod namespace;
pub mod serialization;
pub mod statement;
pub mod store;
pub mod term;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, SmushFeature, StoreConfig};

pub use factory::{
    CanonicalDataFactory, DataFactory, ExtendedDataFactory, FactoryFeature, Indexable,
    InterningDataFactory, DEFAULT_GRAPH_URI,
};

pub use formula::{Formula, ListFormula, RdfsReasoning};

pub use index::StatementId;

pub use namespace::NamespaceManager;

pub use serialization::{ParseError, RdfFormat, SerializeError};

pub use statement::{Position, QuadPattern, Statement};

pub use store::{
    AddOutcome, ClassAction, CopyFlag, Fetcher, IndexedFormula, Patch, PropertyAction,
    StoreError, StoreResult,
};

pub use term::{
    BlankNode, Bindings, Collection, Literal, NamedNode, Term, TermError, TermKind, TermResult,
    Value, Variable,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
