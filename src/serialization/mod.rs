//! RDF serialization formats
//!
//! Supports:
//! - N-Triples (NT)
//! - N-Quads (NQ)
//!
//! Both directions go through `rio_turtle`; statements come back ready for
//! [`IndexedFormula::add_all`](crate::IndexedFormula::add_all).

mod ntriples;

pub use ntriples::{
    parse_nquads, parse_ntriples, read_file, write_nquads, write_nquads_to, write_ntriples,
    write_ntriples_to,
};

use crate::term::TermError;
use std::path::Path;
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// N-Triples format (.nt)
    NTriples,
    /// N-Quads format (.nq)
    NQuads,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "nt" => Some(RdfFormat::NTriples),
            "nq" => Some(RdfFormat::NQuads),
            _ => None,
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Syntax error reported by the parser
    #[error("Parse error: {0}")]
    Syntax(#[from] rio_turtle::TurtleError),

    /// Parsed term rejected by the term model
    #[error("Invalid term: {0}")]
    Term(#[from] TermError),

    /// Construct the term model can not hold
    #[error("Unsupported construct: {0}")]
    Unsupported(String),

    /// Unknown file type
    #[error("Unsupported format for {0}")]
    UnknownFormat(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Term with no N-Triples representation
    #[error("Can not serialize {term} as {position}")]
    Unsupported { term: String, position: &'static str },

    /// Output was not UTF-8
    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;
