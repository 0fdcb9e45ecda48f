//! Collections (ordered lists of terms)

use super::{Bindings, Term};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An ordered list of terms, identified by a factory-assigned id.
///
/// Two collections are the same term iff they share an id; the elements are
/// content, not identity.
#[derive(Debug, Clone)]
pub struct Collection {
    id: u64,
    elements: Vec<Term>,
    closed: bool,
}

impl Collection {
    pub fn new(id: u64, elements: Vec<Term>) -> Self {
        Self {
            id,
            elements,
            closed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn elements(&self) -> &[Term] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Append an element, returning the new length
    pub fn append(&mut self, element: Term) -> usize {
        self.elements.push(element);
        self.elements.len()
    }

    /// Prepend an element, returning the new length
    pub fn unshift(&mut self, element: Term) -> usize {
        self.elements.insert(0, element);
        self.elements.len()
    }

    /// Remove and return the first element
    pub fn shift(&mut self) -> Option<Term> {
        if self.elements.is_empty() {
            None
        } else {
            Some(self.elements.remove(0))
        }
    }

    pub fn close(&mut self) -> bool {
        self.closed = true;
        self.closed
    }

    /// Collections serialize as anonymous nodes
    pub fn to_nt(&self) -> String {
        format!("_:n{}", self.id)
    }

    /// Substitute bindings into the elements. The result keeps this id.
    pub fn substitute(&self, bindings: &Bindings) -> Collection {
        Collection {
            id: self.id,
            elements: self.elements.iter().map(|e| e.substitute(bindings)).collect(),
            closed: self.closed,
        }
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Collection {}

impl Hash for Collection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str(")")
    }
}
