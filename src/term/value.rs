//! Native values and their coercion into terms

use super::{BlankNode, Collection, Literal, NamedNode, Term, TermResult, Variable};
use crate::factory::DataFactory;
use crate::statement::Position;
use chrono::{DateTime, Utc};

/// A term or a native value that can be coerced into one
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Already a term, passed through unchanged
    Term(Term),
    /// A string: a named node in subject position, a plain literal elsewhere
    Str(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    /// Becomes a collection
    List(Vec<Value>),
}

impl Value {
    /// Coerce into a term for the given statement position.
    ///
    /// Strings are only read as IRIs in subject position; everywhere else
    /// they are literals, so the position check in the caller decides
    /// whether that is acceptable.
    pub fn into_term(self, position: Position, factory: &dyn DataFactory) -> TermResult<Term> {
        match self {
            Value::Term(term) => Ok(term),
            Value::Str(s) if position == Position::Subject => {
                Ok(Term::NamedNode(factory.named_node(&s)?))
            }
            Value::List(items) => {
                let elements = items
                    .into_iter()
                    .map(|item| item.into_term(Position::Object, factory))
                    .collect::<TermResult<Vec<_>>>()?;
                Ok(Term::Collection(factory.collection(elements)?))
            }
            other => other.into_literal().map(Term::Literal),
        }
    }

    /// Coerce a scalar into a literal
    pub fn into_literal(self) -> TermResult<Literal> {
        match self {
            Value::Term(Term::Literal(l)) => Ok(l),
            Value::Str(s) => Ok(Literal::new_simple(s)),
            Value::Bool(b) => Ok(Literal::from_bool(b)),
            Value::Integer(n) => Ok(Literal::from_i64(n)),
            Value::Float(n) => Ok(Literal::from_f64(n)),
            Value::DateTime(d) => Ok(Literal::from_datetime(d)),
            other => Err(super::TermError::InvalidLiteral(format!("{:?}", other))),
        }
    }
}

impl From<Term> for Value {
    fn from(term: Term) -> Self {
        Value::Term(term)
    }
}

impl From<&Term> for Value {
    fn from(term: &Term) -> Self {
        Value::Term(term.clone())
    }
}

impl From<NamedNode> for Value {
    fn from(node: NamedNode) -> Self {
        Value::Term(Term::NamedNode(node))
    }
}

impl From<&NamedNode> for Value {
    fn from(node: &NamedNode) -> Self {
        Value::Term(Term::NamedNode(node.clone()))
    }
}

impl From<BlankNode> for Value {
    fn from(node: BlankNode) -> Self {
        Value::Term(Term::BlankNode(node))
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Value::Term(Term::Literal(lit))
    }
}

impl From<Variable> for Value {
    fn from(var: Variable) -> Self {
        Value::Term(Term::Variable(var))
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::Term(Term::Collection(collection))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::DateTime(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{CanonicalDataFactory, ExtendedDataFactory};
    use crate::namespace::xsd;
    use crate::term::TermError;

    #[test]
    fn test_string_is_iri_only_as_subject() {
        let factory = CanonicalDataFactory::new();
        let subject = Value::from("http://example.org/a")
            .into_term(Position::Subject, &factory)
            .unwrap();
        assert!(subject.is_named_node());

        let object = Value::from("http://example.org/a")
            .into_term(Position::Object, &factory)
            .unwrap();
        assert!(object.is_literal());
    }

    #[test]
    fn test_scalars_become_typed_literals() {
        let factory = CanonicalDataFactory::new();
        let n = Value::from(42).into_term(Position::Object, &factory).unwrap();
        assert_eq!(n.as_literal().unwrap().datatype(), &xsd::integer());
        let b = Value::from(true).into_term(Position::Object, &factory).unwrap();
        assert_eq!(b.as_literal().unwrap().datatype(), &xsd::boolean());
    }

    #[test]
    fn test_lists_need_collection_support() {
        let canonical = CanonicalDataFactory::new();
        let err = Value::from(vec![1, 2])
            .into_term(Position::Object, &canonical)
            .unwrap_err();
        assert_eq!(err, TermError::CollectionsUnsupported);

        let extended = ExtendedDataFactory::new();
        let list = Value::from(vec![1, 2])
            .into_term(Position::Object, &extended)
            .unwrap();
        assert_eq!(list.as_collection().unwrap().len(), 2);
    }
}
