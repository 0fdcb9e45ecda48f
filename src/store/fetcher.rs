//! Hook for a document loader sitting on top of the store

use crate::term::Term;
use std::fmt;

/// Loader the store reports identity merges to.
///
/// When two IRIs are equated the loader is told, so a request for one can
/// be served by or redirected to the other.
pub trait Fetcher: fmt::Debug + Send + Sync {
    /// Graph to put statements in when the caller gives none
    fn app_node(&self) -> Option<Term> {
        None
    }

    /// `old` has been merged into `new`
    fn now_known_as(&mut self, old: &Term, new: &Term);
}
