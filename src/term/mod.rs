//! RDF term model
//!
//! This module provides the value types a knowledge base is built from:
//! - Named nodes (IRIs)
//! - Blank nodes
//! - Literals (with language tag or datatype)
//! - Variables (pattern placeholders)
//! - The default graph marker
//! - Collections (ordered lists of terms)
//!
//! Every term kind has a fixed "class order" used to pick a survivor when two
//! terms are smushed together, and a canonical N-Triples form used as its
//! index key.

mod blank_node;
mod collection;
mod literal;
mod named_node;
mod value;
mod variable;

pub use blank_node::BlankNode;
pub use collection::Collection;
pub use literal::Literal;
pub use named_node::NamedNode;
pub use value::Value;
pub use variable::Variable;

use crate::statement::Position;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Term construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TermError {
    /// Empty IRI
    #[error("Missing IRI for NamedNode")]
    MissingIri,

    /// IRI without a scheme separator
    #[error("NamedNode IRI \"{0}\" must be absolute")]
    RelativeIri(String),

    /// IRI containing a raw space
    #[error("NamedNode IRI \"{0}\" must not contain unencoded spaces")]
    UnencodedSpace(String),

    /// IRI without an authority part
    #[error("URI <{0}> does not have a web site part (origin)")]
    NoOrigin(String),

    /// Unparseable canonical form
    #[error("Can't convert from NT: {0}")]
    InvalidNt(String),

    /// Value that can not become a literal
    #[error("Can't make literal from {0}")]
    InvalidLiteral(String),

    /// Term kind not allowed at a statement position
    #[error("{position} can not be a {kind}")]
    InvalidPosition {
        /// Statement position that was rejected
        position: Position,
        /// Kind of the offending term
        kind: TermKind,
    },

    /// Factory without collection support
    #[error("Collections are not supported by this term factory")]
    CollectionsUnsupported,
}

pub type TermResult<T> = Result<T, TermError>;

/// Variable bindings, keyed by the variable's N-Triples form (`?name`)
pub type Bindings = FxHashMap<String, Term>;

/// Discriminant of a [`Term`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    NamedNode,
    BlankNode,
    Literal,
    Variable,
    DefaultGraph,
    Collection,
}

impl TermKind {
    /// Precedence of this kind in the total term order. Lower sorts first
    /// and survives a smush.
    pub fn class_order(self) -> u8 {
        match self {
            TermKind::Literal => 1,
            TermKind::Collection => 3,
            TermKind::DefaultGraph => 4,
            TermKind::NamedNode => 5,
            TermKind::BlankNode => 6,
            TermKind::Variable => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TermKind::NamedNode => "NamedNode",
            TermKind::BlankNode => "BlankNode",
            TermKind::Literal => "Literal",
            TermKind::Variable => "Variable",
            TermKind::DefaultGraph => "DefaultGraph",
            TermKind::Collection => "Collection",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any RDF value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
    /// Pattern variable
    Variable(Variable),
    /// The default graph
    DefaultGraph,
    /// Ordered list of terms
    Collection(Collection),
}

impl Term {
    pub fn kind(&self) -> TermKind {
        match self {
            Term::NamedNode(_) => TermKind::NamedNode,
            Term::BlankNode(_) => TermKind::BlankNode,
            Term::Literal(_) => TermKind::Literal,
            Term::Variable(_) => TermKind::Variable,
            Term::DefaultGraph => TermKind::DefaultGraph,
            Term::Collection(_) => TermKind::Collection,
        }
    }

    /// The lexical value: IRI, blank node label, literal lexical form or
    /// variable name. Empty for the default graph and for collections.
    pub fn value(&self) -> &str {
        match self {
            Term::NamedNode(n) => n.as_str(),
            Term::BlankNode(b) => b.as_str(),
            Term::Literal(l) => l.value(),
            Term::Variable(v) => v.name(),
            Term::DefaultGraph | Term::Collection(_) => "",
        }
    }

    pub fn is_named_node(&self) -> bool {
        matches!(self, Term::NamedNode(_))
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Term::NamedNode(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Term::Collection(c) => Some(c),
            _ => None,
        }
    }

    /// Total order over terms: class order first, then lexical value.
    ///
    /// Literals that share a lexical form are further ordered by language and
    /// datatype, collections by id, so only `==` terms compare `Equal`.
    pub fn compare_term(&self, other: &Term) -> Ordering {
        self.kind()
            .class_order()
            .cmp(&other.kind().class_order())
            .then_with(|| match (self, other) {
                (Term::Literal(a), Term::Literal(b)) => a
                    .value()
                    .cmp(b.value())
                    .then_with(|| a.language().cmp(&b.language()))
                    .then_with(|| a.datatype().as_str().cmp(b.datatype().as_str())),
                (Term::Collection(a), Term::Collection(b)) => a.id().cmp(&b.id()),
                _ => self.value().cmp(other.value()),
            })
    }

    /// Canonical N-Triples form, also the default index key
    pub fn to_nt(&self) -> String {
        match self {
            Term::NamedNode(n) => n.to_nt(),
            Term::BlankNode(b) => b.to_nt(),
            Term::Literal(l) => l.to_nt(),
            Term::Variable(v) => v.to_nt(),
            Term::DefaultGraph => String::new(),
            Term::Collection(c) => c.to_nt(),
        }
    }

    /// Decode a term from the canonical forms produced by [`Term::to_nt`].
    ///
    /// Blank nodes are taken at face value; this is meant for strings the
    /// program generated itself, not for external documents.
    pub fn from_nt(s: &str) -> TermResult<Term> {
        let invalid = || TermError::InvalidNt(s.to_string());
        match s.chars().next() {
            Some('<') => {
                let iri = s
                    .strip_prefix('<')
                    .and_then(|rest| rest.strip_suffix('>'))
                    .ok_or_else(invalid)?;
                Ok(Term::NamedNode(NamedNode::new(iri)?))
            }
            Some('"') => {
                let k = s.rfind('"').filter(|&k| k > 0).ok_or_else(invalid)?;
                let lexical = literal::unescape(&s[1..k]);
                let suffix = &s[k + 1..];
                if suffix.is_empty() {
                    Ok(Term::Literal(Literal::new_simple(lexical)))
                } else if let Some(lang) = suffix.strip_prefix('@') {
                    Ok(Term::Literal(Literal::new_language_tagged(lexical, lang)))
                } else if let Some(dt) = suffix.strip_prefix("^^") {
                    match Term::from_nt(dt)? {
                        Term::NamedNode(datatype) => {
                            Ok(Term::Literal(Literal::new_typed(lexical, datatype)))
                        }
                        _ => Err(invalid()),
                    }
                } else {
                    Err(invalid())
                }
            }
            Some('_') => s
                .strip_prefix("_:")
                .map(|label| Term::BlankNode(BlankNode::new(label)))
                .ok_or_else(invalid),
            Some('?') => Ok(Term::Variable(Variable::new(&s[1..]))),
            _ => Err(invalid()),
        }
    }

    /// Replace variables bound in `bindings`
    pub fn substitute(&self, bindings: &Bindings) -> Term {
        match self {
            Term::Variable(v) => bindings.get(&v.to_nt()).cloned().unwrap_or_else(|| self.clone()),
            Term::Collection(c) => Term::Collection(c.substitute(bindings)),
            _ => self.clone(),
        }
    }

    /// Convert to the closest native value (booleans, numbers, dates,
    /// strings). Non-literal terms come back wrapped as [`Value::Term`].
    pub fn to_native(&self) -> Value {
        match self {
            Term::Literal(l) => l.to_native(),
            Term::Collection(c) => Value::List(c.elements().iter().map(Term::to_native).collect()),
            other => Value::Term(other.clone()),
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_term(other)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Collection(c) => write!(f, "{}", c),
            other => f.write_str(&other.to_nt()),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

impl From<Variable> for Term {
    fn from(var: Variable) -> Self {
        Term::Variable(var)
    }
}

impl From<Collection> for Term {
    fn from(collection: Collection) -> Self {
        Term::Collection(collection)
    }
}
