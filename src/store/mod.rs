//! Indexed statement store with identity smushing
//!
//! [`IndexedFormula`] keeps every statement once in an arena and files a
//! handle to it under the canonical key of each of its four terms. When two
//! terms are found to denote the same thing (`owl:sameAs`, or a shared value
//! of a functional or inverse functional property) they are equated: the
//! larger one is redirected to the smaller and its index buckets are merged
//! into the survivor's, so lookups by either term see the same statements.
//!
//! The store is single-writer. Wrap it in a lock to share it across threads.

mod actions;
mod fetcher;
mod patch;
mod planner;
mod remove;
mod smush;

pub use actions::{ActionFn, ClassAction, PropertyAction};
pub use fetcher::Fetcher;
pub use patch::{CopyFlag, Patch};

use crate::config::{ConfigError, SmushFeature, StoreConfig};
use crate::factory::{DataFactory, ExtendedDataFactory, FactoryFeature, Indexable};
use crate::formula::Formula;
use crate::index::{QuadIndex, StatementArena, StatementId};
use crate::namespace::{rdf, NamespaceManager};
use crate::serialization::{self, ParseError};
use crate::statement::{Position, QuadPattern, Statement};
use crate::term::{Bindings, NamedNode, Term, TermError, TermResult, Value};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, trace};

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Term construction or position check failed
    #[error(transparent)]
    Term(#[from] TermError),

    /// Statement to remove is not in the store
    #[error("Statement to be removed is not on store: {0}")]
    NotFound(String),

    /// Statement list and indexes disagree
    #[error("Consistency check failed: {0}")]
    Consistency(String),

    /// Patch could not be applied; nothing was changed
    #[error("Patch failed: {0}")]
    Patch(String),

    /// A registered action reported a failure
    #[error("Action failed: {0}")]
    Action(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// What [`IndexedFormula::add`] did with a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored under this handle
    Inserted(StatementId),
    /// An equal statement already holds
    Duplicate,
    /// Used up by an `owl:sameAs` merge and not stored
    Consumed,
}

impl AddOutcome {
    pub fn id(&self) -> Option<StatementId> {
        match self {
            AddOutcome::Inserted(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, AddOutcome::Inserted(_))
    }
}

/// In-memory quad store with four indexes and smushing
#[derive(Debug)]
pub struct IndexedFormula {
    factory: Arc<dyn DataFactory>,
    arena: StatementArena,
    index: QuadIndex,
    /// Absorbed term key -> surviving term
    redirections: FxHashMap<Indexable, Term>,
    /// Surviving term key -> every term redirected to it
    aliases: FxHashMap<Indexable, Vec<Term>>,
    property_actions: FxHashMap<Indexable, Vec<PropertyAction>>,
    class_actions: FxHashMap<Indexable, Vec<ClassAction>>,
    namespaces: NamespaceManager,
    fetcher: Option<Box<dyn Fetcher>>,
    features: Vec<SmushFeature>,
    existentials: Vec<Term>,
    universals: Vec<Term>,
}

impl IndexedFormula {
    /// A store with collection support and every smushing feature
    pub fn new() -> Self {
        Self::with_factory(Arc::new(ExtendedDataFactory::new()), &SmushFeature::ALL)
    }

    pub fn with_features(features: &[SmushFeature]) -> Self {
        Self::with_factory(Arc::new(ExtendedDataFactory::new()), features)
    }

    pub fn with_factory(factory: Arc<dyn DataFactory>, features: &[SmushFeature]) -> Self {
        let mut store = Self {
            factory,
            arena: StatementArena::new(),
            index: QuadIndex::new(),
            redirections: FxHashMap::default(),
            aliases: FxHashMap::default(),
            property_actions: FxHashMap::default(),
            class_actions: FxHashMap::default(),
            namespaces: NamespaceManager::new(),
            fetcher: None,
            features: features.to_vec(),
            existentials: Vec::new(),
            universals: Vec::new(),
        };
        store.init_property_actions();
        store
    }

    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        let factory = config.build_factory()?;
        Ok(Self::with_factory(factory, &config.features))
    }

    /// An empty store with the same factory and features
    pub fn empty_like(&self) -> Self {
        Self::with_factory(Arc::clone(&self.factory), &self.features)
    }

    pub fn factory_arc(&self) -> Arc<dyn DataFactory> {
        Arc::clone(&self.factory)
    }

    pub fn features(&self) -> &[SmushFeature] {
        &self.features
    }

    pub fn namespaces(&self) -> &NamespaceManager {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut NamespaceManager {
        &mut self.namespaces
    }

    /// Record a prefix, ignoring generated `ns*`/`default*` prefixes and
    /// never replacing an existing `tab`
    pub fn set_prefix_for_uri(&mut self, prefix: &str, ns_uri: &str) -> bool {
        self.namespaces.set_prefix_for_uri(prefix, ns_uri)
    }

    pub fn set_fetcher(&mut self, fetcher: Box<dyn Fetcher>) {
        self.fetcher = Some(fetcher);
    }

    pub fn fetcher(&self) -> Option<&dyn Fetcher> {
        self.fetcher.as_deref()
    }

    pub fn take_fetcher(&mut self) -> Option<Box<dyn Fetcher>> {
        self.fetcher.take()
    }

    /// Graph used for statements added without one: the fetcher's
    /// application node if it has one, otherwise the factory default
    pub fn default_graph(&self) -> Term {
        self.fetcher
            .as_ref()
            .and_then(|f| f.app_node())
            .unwrap_or_else(|| self.factory.default_graph())
    }

    /// Index key of a term, without redirection
    pub fn id(&self, term: &Term) -> Indexable {
        self.factory.id(term)
    }

    pub fn get(&self, id: StatementId) -> Option<&Statement> {
        self.arena.get(id)
    }

    pub fn statement_ids(&self) -> impl Iterator<Item = StatementId> + '_ {
        self.arena.ids()
    }

    pub fn sym(&self, iri: &str) -> TermResult<Term> {
        self.factory.named_node(iri).map(Term::NamedNode)
    }

    pub fn bnode(&self, label: Option<&str>) -> Term {
        Term::BlankNode(self.factory.blank_node(label))
    }

    pub fn literal(&self, value: &str, language_or_datatype: Option<&str>) -> TermResult<Term> {
        self.factory
            .literal(value, language_or_datatype)
            .map(Term::Literal)
    }

    pub fn variable(&self, name: &str) -> Term {
        Term::Variable(self.factory.variable(name))
    }

    pub fn collection(&self, elements: Vec<Term>) -> TermResult<Term> {
        self.factory.collection(elements).map(Term::Collection)
    }

    /// Add a triple in the default graph.
    ///
    /// Native values are coerced: strings name a resource in subject
    /// position and are plain literals elsewhere, vectors become
    /// collections.
    pub fn add(
        &mut self,
        subject: impl Into<Value>,
        predicate: impl Into<Value>,
        object: impl Into<Value>,
    ) -> StoreResult<AddOutcome> {
        let (s, p, o) = self.coerce(subject.into(), predicate.into(), object.into())?;
        let graph = self.default_graph();
        self.insert(s, p, o, graph)
    }

    /// Add a quad
    pub fn add_in(
        &mut self,
        subject: impl Into<Value>,
        predicate: impl Into<Value>,
        object: impl Into<Value>,
        graph: impl Into<Value>,
    ) -> StoreResult<AddOutcome> {
        let (s, p, o) = self.coerce(subject.into(), predicate.into(), object.into())?;
        let g = graph.into().into_term(Position::Graph, self.factory.as_ref())?;
        self.insert(s, p, o, g)
    }

    pub fn add_statement(&mut self, statement: Statement) -> StoreResult<AddOutcome> {
        let Statement {
            subject,
            predicate,
            object,
            graph,
        } = statement;
        self.insert(subject, predicate, object, graph)
    }

    /// Add statements one by one. Returns how many were stored. Stops at the
    /// first error, keeping what was added before it.
    pub fn add_all(&mut self, statements: impl IntoIterator<Item = Statement>) -> StoreResult<usize> {
        let mut inserted = 0;
        for statement in statements {
            if self.add_statement(statement)?.is_inserted() {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Add every statement of another formula
    pub fn add_store(&mut self, other: &dyn Formula) -> StoreResult<usize> {
        let statements: Vec<Statement> = other.statements().cloned().collect();
        self.add_all(statements)
    }

    fn coerce(&self, subject: Value, predicate: Value, object: Value) -> TermResult<(Term, Term, Term)> {
        let factory = self.factory.as_ref();
        Ok((
            subject.into_term(Position::Subject, factory)?,
            predicate.into_term(Position::Predicate, factory)?,
            object.into_term(Position::Object, factory)?,
        ))
    }

    /// Two phases: run the predicate's actions to completion (they may
    /// equate terms), then file the statement under the keys canonical at
    /// that point.
    fn insert(&mut self, subject: Term, predicate: Term, object: Term, graph: Term) -> StoreResult<AddOutcome> {
        let statement = Statement::new(subject, predicate, object, graph)?;

        let predicate_key = self.canon_id(&statement.predicate);
        if self.run_property_actions(&predicate_key, &statement)? {
            trace!("Consumed {}", statement);
            return Ok(AddOutcome::Consumed);
        }

        if self.holds_statement(&statement) {
            return Ok(AddOutcome::Duplicate);
        }

        let keys = Position::ALL.map(|position| self.canon_id(statement.term(position)));
        trace!("Adding {}", statement);
        let id = self.arena.insert(statement);
        for (position, key) in Position::ALL.into_iter().zip(keys) {
            self.index.insert(position, key, id);
        }
        Ok(AddOutcome::Inserted(id))
    }

    /// Pattern match with native values coerced the way [`add`](Self::add)
    /// coerces them
    pub fn match_values(
        &self,
        subject: Option<Value>,
        predicate: Option<Value>,
        object: Option<Value>,
        graph: Option<Value>,
    ) -> StoreResult<Vec<&Statement>> {
        let factory = self.factory.as_ref();
        let coerce = |value: Option<Value>, position| -> TermResult<Option<Term>> {
            value.map(|v| v.into_term(position, factory)).transpose()
        };
        let pattern = QuadPattern::new(
            coerce(subject, Position::Subject)?,
            coerce(predicate, Position::Predicate)?,
            coerce(object, Position::Object)?,
            coerce(graph, Position::Graph)?,
        );
        Ok(self.statements_matching_with(&pattern, false))
    }

    /// Whether a named node is used as subject, predicate or object
    pub fn mentions_uri(&self, uri: &str) -> bool {
        let key = self.id(&Term::NamedNode(NamedNode::new_unchecked(uri)));
        [Position::Subject, Position::Predicate, Position::Object]
            .into_iter()
            .any(|position| self.index.has_bucket(position, &key))
    }

    /// First `doc#nN` not yet mentioned in the store
    pub fn next_symbol(&self, doc: &NamedNode) -> NamedNode {
        (0u64..)
            .map(|i| format!("{}#n{}", doc.as_str(), i))
            .find(|uri| !self.mentions_uri(uri))
            .map(NamedNode::new_unchecked)
            .unwrap_or_else(|| doc.clone())
    }

    /// A list term: a native collection when the factory supports them,
    /// otherwise an `rdf:first`/`rdf:rest` chain of fresh blank nodes added
    /// to the store
    pub fn list(&mut self, values: Vec<Value>) -> StoreResult<Term> {
        let factory = Arc::clone(&self.factory);
        let elements = values
            .into_iter()
            .map(|v| v.into_term(Position::Object, factory.as_ref()))
            .collect::<TermResult<Vec<_>>>()?;

        if factory.supports(FactoryFeature::Collections) {
            return Ok(Term::Collection(factory.collection(elements)?));
        }

        let nil = Term::NamedNode(rdf::nil());
        if elements.is_empty() {
            return Ok(nil);
        }
        let first = Term::NamedNode(rdf::first());
        let rest = Term::NamedNode(rdf::rest());
        let head = Term::BlankNode(factory.blank_node(None));
        let mut node = head.clone();
        let count = elements.len();
        for (i, element) in elements.into_iter().enumerate() {
            self.add(node.clone(), first.clone(), element)?;
            let next = if i + 1 == count {
                nil.clone()
            } else {
                Term::BlankNode(factory.blank_node(None))
            };
            self.add(node, rest.clone(), next.clone())?;
            node = next;
        }
        Ok(head)
    }

    /// Declare a blank node as existentially quantified
    pub fn declare_existential(&mut self, term: Term) -> Term {
        self.existentials.push(term.clone());
        term
    }

    /// A named existential, or a fresh blank node when no IRI is given
    pub fn new_existential(&mut self, uri: Option<&str>) -> TermResult<Term> {
        match uri {
            Some(uri) => {
                let term = self.sym(uri)?;
                Ok(self.declare_existential(term))
            }
            None => Ok(self.bnode(None)),
        }
    }

    pub fn new_universal(&mut self, uri: &str) -> TermResult<Term> {
        let term = self.sym(uri)?;
        self.universals.push(term.clone());
        Ok(term)
    }

    pub fn existentials(&self) -> &[Term] {
        &self.existentials
    }

    pub fn universals(&self) -> &[Term] {
        &self.universals
    }

    /// A new store holding every statement with `bindings` substituted
    pub fn substitute(&self, bindings: &Bindings) -> StoreResult<IndexedFormula> {
        let mut out = self.empty_like();
        for (_, statement) in self.arena.iter() {
            out.add_statement(statement.substitute(bindings)?)?;
        }
        Ok(out)
    }

    /// Parse N-Triples and add the statements. Returns how many were stored.
    pub fn load_ntriples(&mut self, input: &str) -> StoreResult<usize> {
        let statements = serialization::parse_ntriples(input, self.factory.as_ref())?;
        let parsed = statements.len();
        let inserted = self.add_all(statements)?;
        info!("Loaded {} N-Triples statements ({} new)", parsed, inserted);
        Ok(inserted)
    }

    /// Parse N-Quads and add the statements. Returns how many were stored.
    pub fn load_nquads(&mut self, input: &str) -> StoreResult<usize> {
        let statements = serialization::parse_nquads(input, self.factory.as_ref())?;
        let parsed = statements.len();
        let inserted = self.add_all(statements)?;
        info!("Loaded {} N-Quads statements ({} new)", parsed, inserted);
        Ok(inserted)
    }

    /// Drop every statement along with the smushing state and the
    /// existential and universal declarations. Registered actions, prefixes
    /// and the fetcher are kept.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.redirections.clear();
        self.aliases.clear();
        self.existentials.clear();
        self.universals.clear();
    }
}

impl Default for IndexedFormula {
    fn default() -> Self {
        Self::new()
    }
}

impl Formula for IndexedFormula {
    fn factory(&self) -> &dyn DataFactory {
        self.factory.as_ref()
    }

    fn statements(&self) -> Box<dyn Iterator<Item = &Statement> + '_> {
        Box::new(self.arena.iter().map(|(_, st)| st))
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn statements_matching_with(&self, pattern: &QuadPattern, just_one: bool) -> Vec<&Statement> {
        self.match_ids(pattern, just_one)
            .into_iter()
            .filter_map(|id| self.arena.get(id))
            .collect()
    }
}
