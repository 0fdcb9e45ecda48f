//! Statements (quads) and quad patterns

use crate::term::{Bindings, Term, TermError, TermKind, TermResult};
use std::fmt;

/// The four positions of a statement, in index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Subject,
        Position::Predicate,
        Position::Object,
        Position::Graph,
    ];

    pub fn index(self) -> usize {
        match self {
            Position::Subject => 0,
            Position::Predicate => 1,
            Position::Object => 2,
            Position::Graph => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::Subject => "subject",
            Position::Predicate => "predicate",
            Position::Object => "object",
            Position::Graph => "graph",
        }
    }

    /// Whether a term of this kind may stand in this position
    pub fn accepts(self, kind: TermKind) -> bool {
        use TermKind::*;
        match self {
            Position::Subject => matches!(kind, NamedNode | BlankNode | Variable),
            Position::Predicate => matches!(kind, NamedNode | Variable),
            Position::Object => matches!(kind, NamedNode | BlankNode | Literal | Variable | Collection),
            Position::Graph => matches!(kind, NamedNode | DefaultGraph | Variable),
        }
    }

    /// Check `term` against this position's type contract
    pub fn check(self, term: &Term) -> TermResult<()> {
        if self.accepts(term.kind()) {
            Ok(())
        } else {
            Err(TermError::InvalidPosition {
                position: self,
                kind: term.kind(),
            })
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RDF statement (subject, predicate, object, graph)
///
/// The graph is sometimes called "why": the document the statement came
/// from, or will be written to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    /// What the statement is about
    pub subject: Term,
    /// The relationship asserted
    pub predicate: Term,
    /// The related thing or value
    pub object: Term,
    /// Containing graph
    pub graph: Term,
}

impl Statement {
    /// Create a statement, checking every position's type contract
    pub fn new(subject: Term, predicate: Term, object: Term, graph: Term) -> TermResult<Self> {
        Position::Subject.check(&subject)?;
        Position::Predicate.check(&predicate)?;
        Position::Object.check(&object)?;
        Position::Graph.check(&graph)?;
        Ok(Self {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// Legacy name for the graph
    pub fn why(&self) -> &Term {
        &self.graph
    }

    pub fn term(&self, position: Position) -> &Term {
        match position {
            Position::Subject => &self.subject,
            Position::Predicate => &self.predicate,
            Position::Object => &self.object,
            Position::Graph => &self.graph,
        }
    }

    /// The statement with bindings substituted into every position
    pub fn substitute(&self, bindings: &Bindings) -> TermResult<Statement> {
        Statement::new(
            self.subject.substitute(bindings),
            self.predicate.substitute(bindings),
            self.object.substitute(bindings),
            self.graph.substitute(bindings),
        )
    }

    /// `s p o [g] .` with the graph omitted for the default graph
    pub fn to_canonical(&self) -> String {
        let mut terms = vec![
            self.subject.to_nt(),
            self.predicate.to_nt(),
            self.object.to_nt(),
        ];
        if self.graph != Term::DefaultGraph {
            terms.push(self.graph.to_nt());
        }
        format!("{} .", terms.join(" "))
    }

    /// N-Triples line (graph dropped)
    pub fn to_nt(&self) -> String {
        format!(
            "{} {} {} .",
            self.subject.to_nt(),
            self.predicate.to_nt(),
            self.object.to_nt()
        )
    }

    /// N-Quads line
    pub fn to_nq(&self) -> String {
        self.to_canonical()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nt())
    }
}

/// Quad pattern for queries (None = wildcard)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadPattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
    pub graph: Option<Term>,
}

impl QuadPattern {
    pub fn new(
        subject: Option<Term>,
        predicate: Option<Term>,
        object: Option<Term>,
        graph: Option<Term>,
    ) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// The all-wildcard pattern
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: impl Into<Term>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_graph(mut self, graph: impl Into<Term>) -> Self {
        self.graph = Some(graph.into());
        self
    }

    pub fn term(&self, position: Position) -> Option<&Term> {
        match position {
            Position::Subject => self.subject.as_ref(),
            Position::Predicate => self.predicate.as_ref(),
            Position::Object => self.object.as_ref(),
            Position::Graph => self.graph.as_ref(),
        }
    }

    /// Positions that are not wildcards
    pub fn given(&self) -> impl Iterator<Item = (Position, &Term)> {
        Position::ALL
            .into_iter()
            .filter_map(move |p| self.term(p).map(|t| (p, t)))
    }

    /// Plain structural match, no canonicalization
    pub fn matches(&self, statement: &Statement) -> bool {
        self.given().all(|(p, t)| statement.term(p) == t)
    }
}
