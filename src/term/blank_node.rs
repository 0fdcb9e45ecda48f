//! Blank nodes (anonymous nodes)

use std::fmt;
use std::sync::Arc;

/// Blank node
///
/// Fresh labels are minted by a term factory, which owns the counter; see
/// [`crate::factory::DataFactory::blank_node`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(Arc<str>);

impl BlankNode {
    /// Create a blank node from a label (without the `_:` prefix)
    pub fn new(label: impl AsRef<str>) -> Self {
        let label = label.as_ref();
        Self(Arc::from(label.strip_prefix("_:").unwrap_or(label)))
    }

    /// Get the blank node label
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_nt(&self) -> String {
        format!("_:{}", self.0)
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_node() {
        let node = BlankNode::new("b1");
        assert_eq!(node.as_str(), "b1");
        assert_eq!(node.to_string(), "_:b1");
        assert_eq!(BlankNode::new("_:b1"), node);
    }
}
