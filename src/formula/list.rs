//! Unindexed formula

use super::Formula;
use crate::factory::{CanonicalDataFactory, DataFactory};
use crate::statement::{QuadPattern, Statement};
use crate::term::{Term, TermResult};
use std::sync::Arc;

/// A plain list of statements matched by linear scan
///
/// No smushing, no deduplication. Useful for small scratch graphs such as
/// patch bodies, and as a reference when checking the indexed store.
#[derive(Debug, Clone)]
pub struct ListFormula {
    factory: Arc<dyn DataFactory>,
    statements: Vec<Statement>,
}

impl ListFormula {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(CanonicalDataFactory::new()))
    }

    pub fn with_factory(factory: Arc<dyn DataFactory>) -> Self {
        Self {
            factory,
            statements: Vec::new(),
        }
    }

    /// Append a statement built from the given terms
    pub fn add(&mut self, subject: Term, predicate: Term, object: Term, graph: Option<Term>) -> TermResult<&Statement> {
        let statement = self.factory.quad(subject, predicate, object, graph)?;
        self.statements.push(statement);
        Ok(&self.statements[self.statements.len() - 1])
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn add_all(&mut self, statements: impl IntoIterator<Item = Statement>) {
        self.statements.extend(statements);
    }

    pub fn as_slice(&self) -> &[Statement] {
        &self.statements
    }

    pub fn into_statements(self) -> Vec<Statement> {
        self.statements
    }
}

impl Default for ListFormula {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Statement> for ListFormula {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        let mut formula = ListFormula::new();
        formula.add_all(iter);
        formula
    }
}

impl Formula for ListFormula {
    fn factory(&self) -> &dyn DataFactory {
        self.factory.as_ref()
    }

    fn statements(&self) -> Box<dyn Iterator<Item = &Statement> + '_> {
        Box::new(self.statements.iter())
    }

    fn len(&self) -> usize {
        self.statements.len()
    }

    fn statements_matching_with(&self, pattern: &QuadPattern, just_one: bool) -> Vec<&Statement> {
        let matches = self.statements.iter().filter(|st| pattern.matches(st));
        if just_one {
            matches.take(1).collect()
        } else {
            matches.collect()
        }
    }
}
