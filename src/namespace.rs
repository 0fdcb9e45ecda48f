//! Vocabulary constants and namespace prefix management

use crate::term::NamedNode;
use indexmap::IndexMap;
use thiserror::Error;

/// Prefix errors
#[derive(Error, Debug)]
pub enum PrefixError {
    /// Unknown prefix
    #[error("Unknown prefix: {0}")]
    UnknownPrefix(String),

    /// Invalid compact IRI
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type PrefixResult<T> = Result<T, PrefixError>;

macro_rules! vocab_terms {
    ($($fn_name:ident => $const_name:ident = $iri:expr;)*) => {
        $(
            pub const $const_name: &str = $iri;

            pub fn $fn_name() -> NamedNode {
                NamedNode::new_unchecked($const_name)
            }
        )*
    };
}

/// RDF vocabulary
pub mod rdf {
    use super::NamedNode;

    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    vocab_terms! {
        type_ => TYPE = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
        first => FIRST = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
        rest => REST = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
        nil => NIL = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
        lang_string => LANG_STRING = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
    }
}

/// RDF Schema vocabulary
pub mod rdfs {
    use super::NamedNode;

    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    vocab_terms! {
        sub_class_of => SUB_CLASS_OF = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
        domain => DOMAIN = "http://www.w3.org/2000/01/rdf-schema#domain";
        range => RANGE = "http://www.w3.org/2000/01/rdf-schema#range";
        resource => RESOURCE = "http://www.w3.org/2000/01/rdf-schema#Resource";
    }
}

/// XML Schema datatypes
pub mod xsd {
    use super::NamedNode;

    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    vocab_terms! {
        string => STRING = "http://www.w3.org/2001/XMLSchema#string";
        boolean => BOOLEAN = "http://www.w3.org/2001/XMLSchema#boolean";
        integer => INTEGER = "http://www.w3.org/2001/XMLSchema#integer";
        decimal => DECIMAL = "http://www.w3.org/2001/XMLSchema#decimal";
        float => FLOAT = "http://www.w3.org/2001/XMLSchema#float";
        double => DOUBLE = "http://www.w3.org/2001/XMLSchema#double";
        date => DATE = "http://www.w3.org/2001/XMLSchema#date";
        date_time => DATE_TIME = "http://www.w3.org/2001/XMLSchema#dateTime";
    }
}

/// OWL vocabulary
pub mod owl {
    use super::NamedNode;

    pub const NS: &str = "http://www.w3.org/2002/07/owl#";

    vocab_terms! {
        same_as => SAME_AS = "http://www.w3.org/2002/07/owl#sameAs";
        functional_property => FUNCTIONAL_PROPERTY = "http://www.w3.org/2002/07/owl#FunctionalProperty";
        inverse_functional_property => INVERSE_FUNCTIONAL_PROPERTY = "http://www.w3.org/2002/07/owl#InverseFunctionalProperty";
        thing => THING = "http://www.w3.org/2002/07/owl#Thing";
    }
}

/// Link ontology, used to record the IRIs a smushed node was known by
pub mod link {
    use super::NamedNode;

    pub const NS: &str = "http://www.w3.org/2007/ont/link#";

    vocab_terms! {
        uri => URI = "http://www.w3.org/2007/ont/link#uri";
    }
}

/// Prefix → namespace IRI table, kept in registration order
#[derive(Debug, Clone, Default)]
pub struct NamespaceManager {
    prefixes: IndexMap<String, String>,
}

impl NamespaceManager {
    /// Create an empty prefix table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prefix table with the common RDF/RDFS/XSD/OWL prefixes
    pub fn with_common_prefixes() -> Self {
        let mut mgr = Self::new();
        mgr.add_prefix("rdf", rdf::NS);
        mgr.add_prefix("rdfs", rdfs::NS);
        mgr.add_prefix("xsd", xsd::NS);
        mgr.add_prefix("owl", owl::NS);
        mgr.add_prefix("link", link::NS);
        mgr
    }

    /// Add a prefix unconditionally
    pub fn add_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    /// Record a prefix seen in a document, skipping generated ones
    /// (`ns*`, `default*`) and never replacing an existing `tab`.
    ///
    /// Returns whether the prefix was recorded.
    pub fn set_prefix_for_uri(&mut self, prefix: &str, ns_uri: &str) -> bool {
        if prefix == "tab" && self.prefixes.contains_key("tab") {
            return false;
        }
        if prefix.starts_with("ns") || prefix.starts_with("default") {
            return false;
        }
        self.add_prefix(prefix, ns_uri);
        true
    }

    /// Get IRI for a prefix
    pub fn get_iri(&self, prefix: &str) -> PrefixResult<&str> {
        self.prefixes
            .get(prefix)
            .map(|s| s.as_str())
            .ok_or_else(|| PrefixError::UnknownPrefix(prefix.to_string()))
    }

    /// Expand a compact IRI (prefix:local) to full IRI
    pub fn expand(&self, compact_iri: &str) -> PrefixResult<String> {
        let (prefix, local) = compact_iri
            .split_once(':')
            .ok_or_else(|| PrefixError::InvalidIri(compact_iri.to_string()))?;
        Ok(format!("{}{}", self.get_iri(prefix)?, local))
    }

    /// Compact an IRI with the first registered matching prefix
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.prefixes.iter().find_map(|(prefix, ns)| {
            iri.strip_prefix(ns.as_str())
                .map(|local| format!("{}:{}", prefix, local))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
