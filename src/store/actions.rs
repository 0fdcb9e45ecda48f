//! Hooks run when statements are added
//!
//! Property actions are keyed by predicate and run before a statement is
//! stored. The `rdf:type` action dispatches to class actions keyed by the
//! statement's object. Declaring a property functional or inverse
//! functional installs the matching smushing action on that property.

use super::{IndexedFormula, StoreResult};
use crate::config::SmushFeature;
use crate::factory::Indexable;
use crate::formula::Formula;
use crate::namespace::{owl, rdf};
use crate::statement::Statement;
use crate::term::Term;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// User hook: receives the store and the statement being added, returns
/// whether it acted on it
pub type ActionFn = Arc<dyn Fn(&mut IndexedFormula, &Statement) -> StoreResult<bool> + Send + Sync>;

/// Action run for statements with a given predicate
#[derive(Clone)]
pub enum PropertyAction {
    /// Equate subject and object; the statement is not stored
    SameAs,
    /// Run the class actions of the object
    RdfType,
    /// Equate this object with any earlier object for the same subject
    FunctionalProperty,
    /// Equate this subject with any earlier subject for the same object
    InverseFunctionalProperty,
    Custom(ActionFn),
}

/// Action run for `s rdf:type C` statements, keyed by `C`
#[derive(Clone)]
pub enum ClassAction {
    /// Install [`PropertyAction::FunctionalProperty`] on the subject
    DeclareFunctional,
    /// Install [`PropertyAction::InverseFunctionalProperty`] on the subject
    DeclareInverseFunctional,
    Custom(ActionFn),
}

impl PropertyAction {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut IndexedFormula, &Statement) -> StoreResult<bool> + Send + Sync + 'static,
    {
        PropertyAction::Custom(Arc::new(f))
    }

    fn run(&self, store: &mut IndexedFormula, statement: &Statement) -> StoreResult<bool> {
        match self {
            PropertyAction::SameAs => store.equate(&statement.subject, &statement.object),
            PropertyAction::RdfType => store.run_class_actions(statement),
            PropertyAction::FunctionalProperty => {
                let earlier = store.any(Some(&statement.subject), Some(&statement.predicate), None, None);
                match earlier {
                    Some(object) => store.equate(&object, &statement.object),
                    None => Ok(false),
                }
            }
            PropertyAction::InverseFunctionalProperty => {
                let earlier = store.any(None, Some(&statement.predicate), Some(&statement.object), None);
                match earlier {
                    Some(subject) => store.equate(&subject, &statement.subject),
                    None => Ok(false),
                }
            }
            PropertyAction::Custom(f) => f(store, statement),
        }
    }

    /// Whether a `true` result means the statement is used up
    fn consumes(&self) -> bool {
        matches!(self, PropertyAction::SameAs)
    }

    fn same_builtin(&self, other: &PropertyAction) -> bool {
        !matches!(self, PropertyAction::Custom(_))
            && std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl ClassAction {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut IndexedFormula, &Statement) -> StoreResult<bool> + Send + Sync + 'static,
    {
        ClassAction::Custom(Arc::new(f))
    }

    fn run(&self, store: &mut IndexedFormula, statement: &Statement) -> StoreResult<bool> {
        match self {
            ClassAction::DeclareFunctional => {
                store.new_property_action(&statement.subject, PropertyAction::FunctionalProperty)
            }
            ClassAction::DeclareInverseFunctional => {
                store.new_property_action(&statement.subject, PropertyAction::InverseFunctionalProperty)
            }
            ClassAction::Custom(f) => f(store, statement),
        }
    }
}

impl fmt::Debug for PropertyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyAction::SameAs => f.write_str("SameAs"),
            PropertyAction::RdfType => f.write_str("RdfType"),
            PropertyAction::FunctionalProperty => f.write_str("FunctionalProperty"),
            PropertyAction::InverseFunctionalProperty => f.write_str("InverseFunctionalProperty"),
            PropertyAction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Debug for ClassAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassAction::DeclareFunctional => f.write_str("DeclareFunctional"),
            ClassAction::DeclareInverseFunctional => f.write_str("DeclareInverseFunctional"),
            ClassAction::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl IndexedFormula {
    /// Install the built-in actions for the configured features
    pub(super) fn init_property_actions(&mut self) {
        let type_key = self.id(&Term::NamedNode(rdf::type_()));
        self.property_actions
            .insert(type_key, vec![PropertyAction::RdfType]);

        for feature in self.features.clone() {
            match feature {
                SmushFeature::SameAs => {
                    let key = self.id(&Term::NamedNode(owl::same_as()));
                    self.property_actions
                        .insert(key, vec![PropertyAction::SameAs]);
                }
                SmushFeature::InverseFunctionalProperty => {
                    let key = self.id(&Term::NamedNode(owl::inverse_functional_property()));
                    self.class_actions
                        .insert(key, vec![ClassAction::DeclareInverseFunctional]);
                }
                SmushFeature::FunctionalProperty => {
                    let key = self.id(&Term::NamedNode(owl::functional_property()));
                    self.class_actions
                        .insert(key, vec![ClassAction::DeclareFunctional]);
                }
            }
        }
    }

    /// Register an action for a predicate and run it over the statements
    /// already using that predicate. Returns whether any run acted.
    ///
    /// Registering a built-in action a second time on the same predicate
    /// does nothing.
    pub fn new_property_action(&mut self, predicate: &Term, action: PropertyAction) -> StoreResult<bool> {
        let key = self.canon_id(predicate);
        let actions = self.property_actions.entry(key).or_default();
        if actions.iter().any(|a| a.same_builtin(&action)) {
            return Ok(false);
        }
        debug!("New property action {:?} on {}", action, predicate);
        actions.push(action.clone());

        let existing: Vec<Statement> = self
            .statements_matching(None, Some(predicate), None, None)
            .into_iter()
            .cloned()
            .collect();
        let mut done = false;
        for statement in &existing {
            done |= action.run(self, statement)?;
        }
        Ok(done)
    }

    /// Register an action run when something is declared a member of
    /// `class`
    pub fn new_class_action(&mut self, class: &Term, action: ClassAction) {
        let key = self.canon_id(class);
        debug!("New class action {:?} on {}", action, class);
        self.class_actions.entry(key).or_default().push(action);
    }

    pub fn property_actions(&self, predicate: &Term) -> &[PropertyAction] {
        self.property_actions
            .get(&self.canon_id(predicate))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn class_actions(&self, class: &Term) -> &[ClassAction] {
        self.class_actions
            .get(&self.canon_id(class))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Run every action registered for the predicate, in registration order.
    /// Returns true only if the statement was consumed by a merge.
    pub(super) fn run_property_actions(&mut self, predicate_key: &Indexable, statement: &Statement) -> StoreResult<bool> {
        let Some(actions) = self.property_actions.get(predicate_key).cloned() else {
            return Ok(false);
        };
        let mut consumed = false;
        for action in &actions {
            let acted = action.run(self, statement)?;
            consumed |= acted && action.consumes();
        }
        Ok(consumed)
    }

    fn run_class_actions(&mut self, statement: &Statement) -> StoreResult<bool> {
        let key = self.canon_id(&statement.object);
        let Some(actions) = self.class_actions.get(&key).cloned() else {
            return Ok(false);
        };
        let mut done = false;
        for action in &actions {
            done |= action.run(self, statement)?;
        }
        Ok(done)
    }
}
