//! Named nodes (IRIs)

use super::{TermError, TermResult};
use std::fmt;
use std::sync::Arc;

/// Named node (IRI)
///
/// The IRI must be absolute (contain a `:`) and must not contain raw spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode(Arc<str>);

impl NamedNode {
    /// Create a new named node from an IRI string
    pub fn new(iri: impl AsRef<str>) -> TermResult<Self> {
        let iri = iri.as_ref();
        if iri.is_empty() {
            return Err(TermError::MissingIri);
        }
        if !iri.contains(':') {
            return Err(TermError::RelativeIri(iri.to_string()));
        }
        if iri.contains(' ') {
            return Err(TermError::UnencodedSpace(iri.to_string()));
        }
        Ok(Self(Arc::from(iri)))
    }

    /// Create a named node without validating the IRI.
    ///
    /// Only for IRIs known to be absolute, such as vocabulary constants.
    pub fn new_unchecked(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// Get the IRI string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_nt(&self) -> String {
        format!("<{}>", self.0)
    }

    /// The containing directory, ending in a slash
    pub fn dir(&self) -> Option<NamedNode> {
        let s = self.without_fragment();
        let trimmed = &s[..s.len().saturating_sub(1)];
        let p = trimmed.rfind('/')?;
        if let Some(q) = s.find("//") {
            if p < q + 2 {
                return None;
            }
        }
        Some(NamedNode::new_unchecked(&s[..=p]))
    }

    /// The whole web site, ending in a slash
    pub fn site(&self) -> TermResult<NamedNode> {
        let s = self.without_fragment();
        let p = s
            .find("//")
            .ok_or_else(|| TermError::NoOrigin(self.0.to_string()))?;
        match s[p + 2..].find('/') {
            Some(q) => Ok(NamedNode::new_unchecked(&s[..p + 2 + q + 1])),
            None => Ok(NamedNode::new_unchecked(format!("{}/", s))),
        }
    }

    /// The document this IRI is part of (the IRI without its fragment)
    pub fn doc(&self) -> NamedNode {
        if self.0.contains('#') {
            NamedNode::new_unchecked(self.without_fragment())
        } else {
            self.clone()
        }
    }

    /// The local identifier within the document
    pub fn fragment(&self) -> Option<&str> {
        self.0.split_once('#').map(|(_, frag)| frag)
    }

    fn without_fragment(&self) -> &str {
        self.0.split('#').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl AsRef<str> for NamedNode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_node() {
        let node = NamedNode::new("http://example.org/alice").unwrap();
        assert_eq!(node.as_str(), "http://example.org/alice");
        assert_eq!(node.to_string(), "<http://example.org/alice>");
    }

    #[test]
    fn test_rejects_malformed_iri() {
        assert_eq!(NamedNode::new(""), Err(TermError::MissingIri));
        assert!(matches!(NamedNode::new("alice"), Err(TermError::RelativeIri(_))));
        assert!(matches!(
            NamedNode::new("http://example.org/a b"),
            Err(TermError::UnencodedSpace(_))
        ));
        assert!(NamedNode::new("ex:a").is_ok());
    }

    #[test]
    fn test_dir_site_doc() {
        let node = NamedNode::new("http://example.org/people/card#me").unwrap();
        assert_eq!(node.dir().unwrap().as_str(), "http://example.org/people/");
        assert_eq!(node.site().unwrap().as_str(), "http://example.org/");
        assert_eq!(node.doc().as_str(), "http://example.org/people/card");
        assert_eq!(node.fragment(), Some("me"));

        let origin = NamedNode::new("http://example.org").unwrap();
        assert_eq!(origin.site().unwrap().as_str(), "http://example.org/");
        assert!(origin.dir().is_none());

        let urn = NamedNode::new("urn:isbn:123").unwrap();
        assert!(matches!(urn.site(), Err(TermError::NoOrigin(_))));
        assert_eq!(urn.doc(), urn);
    }
}
