//! Pattern variables

use std::fmt;
use std::sync::Arc;

/// A placeholder matched against terms by a query engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(Arc<str>);

impl Variable {
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        Self(Arc::from(name.strip_prefix('?').unwrap_or(name)))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn to_nt(&self) -> String {
        format!("?{}", self.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name())
    }
}
