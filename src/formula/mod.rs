//! Read API shared by every statement container
//!
//! [`Formula`] is implemented by the indexed store and by the unindexed
//! [`ListFormula`]. Implementors provide statement iteration and pattern
//! matching; the convenience lookups are built on top of those.

mod list;
mod schema;

pub use list::ListFormula;
pub use schema::RdfsReasoning;

use crate::factory::DataFactory;
use crate::statement::{Position, QuadPattern, Statement};
use crate::term::{Term, TermResult, Value};
use tracing::error;

/// A set of statements that can be queried by pattern
pub trait Formula {
    /// Factory used to mint terms for this formula
    fn factory(&self) -> &dyn DataFactory;

    /// All statements, in insertion order
    fn statements(&self) -> Box<dyn Iterator<Item = &Statement> + '_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Statements matching a pattern. With `just_one` the search may stop
    /// after the first hit.
    fn statements_matching_with(&self, pattern: &QuadPattern, just_one: bool) -> Vec<&Statement>;

    /// Statements matching the given positions; `None` is a wildcard
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Vec<&Statement> {
        self.statements_matching_with(&pattern(subject, predicate, object, graph), false)
    }

    fn any_statement_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Option<&Statement> {
        self.statements_matching_with(&pattern(subject, predicate, object, graph), true)
            .into_iter()
            .next()
    }

    /// The term at the first wildcard of subject, predicate, object in some
    /// matching statement
    fn any(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Option<Term> {
        let wildcard = first_wildcard(subject, predicate, object)?;
        self.any_statement_matching(subject, predicate, object, graph)
            .map(|st| st.term(wildcard).clone())
    }

    /// Lexical value of [`Formula::any`]
    fn any_value(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Option<String> {
        self.any(subject, predicate, object, graph)
            .map(|t| t.value().to_string())
    }

    /// Native value of [`Formula::any`]
    fn any_native(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Option<Value> {
        self.any(subject, predicate, object, graph)
            .map(|t| t.to_native())
    }

    /// Like [`Formula::any`] but logs an error when nothing is found
    fn the(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Option<Term> {
        let found = self.any(subject, predicate, object, graph);
        if found.is_none() {
            error!(
                "No value found for the() {{{} {} {}}}",
                display_or_wildcard(subject),
                display_or_wildcard(predicate),
                display_or_wildcard(object)
            );
        }
        found
    }

    /// Terms at the first wildcard position of every matching statement
    fn each(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Vec<Term> {
        let wildcard = first_wildcard(subject, predicate, object).or(match graph {
            None => Some(Position::Graph),
            Some(_) => None,
        });
        let Some(wildcard) = wildcard else {
            return Vec::new();
        };
        self.statements_matching(subject, predicate, object, graph)
            .into_iter()
            .map(|st| st.term(wildcard).clone())
            .collect()
    }

    fn holds(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> bool {
        self.any_statement_matching(subject, predicate, object, graph)
            .is_some()
    }

    fn holds_statement(&self, statement: &Statement) -> bool {
        self.holds(
            Some(&statement.subject),
            Some(&statement.predicate),
            Some(&statement.object),
            Some(&statement.graph),
        )
    }

    /// Number of matching statements
    fn whether(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> usize {
        self.statements_matching(subject, predicate, object, graph)
            .len()
    }

    /// Decode a term from its canonical N-Triples form
    fn from_nt(&self, s: &str) -> TermResult<Term> {
        Term::from_nt(s)
    }

    /// The whole formula as `{st1\nst2...}`
    fn to_nt(&self) -> String {
        let lines: Vec<String> = self.statements().map(Statement::to_nt).collect();
        format!("{{{}}}", lines.join("\n"))
    }
}

fn pattern(
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
    graph: Option<&Term>,
) -> QuadPattern {
    QuadPattern::new(
        subject.cloned(),
        predicate.cloned(),
        object.cloned(),
        graph.cloned(),
    )
}

fn first_wildcard(subject: Option<&Term>, predicate: Option<&Term>, object: Option<&Term>) -> Option<Position> {
    if subject.is_none() {
        Some(Position::Subject)
    } else if predicate.is_none() {
        Some(Position::Predicate)
    } else if object.is_none() {
        Some(Position::Object)
    } else {
        None
    }
}

fn display_or_wildcard(term: Option<&Term>) -> String {
    term.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Literal, NamedNode};

    fn sym(iri: &str) -> Term {
        Term::NamedNode(NamedNode::new(iri).unwrap())
    }

    fn sample() -> ListFormula {
        let mut f = ListFormula::new();
        f.add(sym("ex:alice"), sym("ex:knows"), sym("ex:bob"), None).unwrap();
        f.add(sym("ex:alice"), sym("ex:knows"), sym("ex:carol"), None).unwrap();
        f.add(
            sym("ex:alice"),
            sym("ex:age"),
            Term::Literal(Literal::from_i64(30)),
            None,
        )
        .unwrap();
        f
    }

    #[test]
    fn test_any_returns_first_wildcard() {
        let f = sample();
        let who = f.any(Some(&sym("ex:alice")), Some(&sym("ex:knows")), None, None);
        assert_eq!(who, Some(sym("ex:bob")));

        let subject = f.any(None, Some(&sym("ex:knows")), Some(&sym("ex:carol")), None);
        assert_eq!(subject, Some(sym("ex:alice")));

        let fully_bound = f.any(
            Some(&sym("ex:alice")),
            Some(&sym("ex:knows")),
            Some(&sym("ex:bob")),
            None,
        );
        assert_eq!(fully_bound, None);
    }

    #[test]
    fn test_each_and_whether() {
        let f = sample();
        let known = f.each(Some(&sym("ex:alice")), Some(&sym("ex:knows")), None, None);
        assert_eq!(known, vec![sym("ex:bob"), sym("ex:carol")]);
        assert_eq!(f.whether(Some(&sym("ex:alice")), None, None, None), 3);
    }

    #[test]
    fn test_any_native_and_value() {
        let f = sample();
        let age = f.any_native(Some(&sym("ex:alice")), Some(&sym("ex:age")), None, None);
        assert_eq!(age, Some(Value::Integer(30)));
        let age = f.any_value(Some(&sym("ex:alice")), Some(&sym("ex:age")), None, None);
        assert_eq!(age.as_deref(), Some("30"));
    }

    #[test]
    fn test_the_missing_is_none() {
        let f = sample();
        assert!(f.the(Some(&sym("ex:bob")), Some(&sym("ex:age")), None, None).is_none());
    }

    #[test]
    fn test_holds_statement() {
        let f = sample();
        let st = f.statements().next().unwrap().clone();
        assert!(f.holds_statement(&st));
        assert!(f.to_nt().starts_with("{<ex:alice> <ex:knows> <ex:bob> ."));
    }
}
