//! Store configuration

use crate::factory::{
    CanonicalDataFactory, DataFactory, ExtendedDataFactory, InterningDataFactory, DEFAULT_GRAPH_URI,
};
use crate::term::{NamedNode, Term};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid default graph IRI \"{0}\"")]
    InvalidDefaultGraph(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Automatic identity merging a store performs while loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SmushFeature {
    /// `A owl:sameAs B` merges A and B
    #[serde(rename = "sameAs")]
    SameAs,
    /// Two subjects sharing a value of an inverse functional property merge
    InverseFunctionalProperty,
    /// Two values of a functional property for one subject merge
    FunctionalProperty,
}

impl SmushFeature {
    pub const ALL: [SmushFeature; 3] = [
        SmushFeature::SameAs,
        SmushFeature::InverseFunctionalProperty,
        SmushFeature::FunctionalProperty,
    ];
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Smushing rules to install
    pub features: Vec<SmushFeature>,
    /// IRI of the graph statements land in when none is given
    pub default_graph: Option<String>,
    /// Whether the term factory mints native collections
    pub collections: bool,
    /// Index terms by integer surrogates instead of strings
    pub surrogate_ids: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            features: SmushFeature::ALL.to_vec(),
            default_graph: Some(DEFAULT_GRAPH_URI.to_string()),
            collections: true,
            surrogate_ids: false,
        }
    }
}

impl StoreConfig {
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn has_feature(&self, feature: SmushFeature) -> bool {
        self.features.contains(&feature)
    }

    /// The default graph term; `None` in the config means the RDF default
    /// graph itself
    pub fn default_graph_term(&self) -> ConfigResult<Term> {
        match &self.default_graph {
            Some(iri) => NamedNode::new(iri)
                .map(Term::NamedNode)
                .map_err(|_| ConfigError::InvalidDefaultGraph(iri.clone())),
            None => Ok(Term::DefaultGraph),
        }
    }

    /// Build the term factory this configuration describes
    pub fn build_factory(&self) -> ConfigResult<Arc<dyn DataFactory>> {
        let graph = self.default_graph_term()?;
        let factory: Arc<dyn DataFactory> = match (self.collections, self.surrogate_ids) {
            (true, false) => Arc::new(ExtendedDataFactory::with_default_graph(graph)),
            (true, true) => Arc::new(InterningDataFactory::new(
                ExtendedDataFactory::with_default_graph(graph),
            )),
            (false, false) => Arc::new(CanonicalDataFactory::with_default_graph(graph)),
            (false, true) => Arc::new(InterningDataFactory::new(
                CanonicalDataFactory::with_default_graph(graph),
            )),
        };
        Ok(factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{FactoryFeature, Indexable};

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.has_feature(SmushFeature::SameAs));
        assert_eq!(config.default_graph.as_deref(), Some("chrome:theSession"));
        assert!(config.build_factory().unwrap().supports(FactoryFeature::Collections));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = StoreConfig::from_json_str(r#"{"features": ["sameAs"], "surrogate_ids": true}"#).unwrap();
        assert_eq!(config.features, vec![SmushFeature::SameAs]);
        assert!(config.collections);

        let factory = config.build_factory().unwrap();
        let id = factory.id(&Term::NamedNode(NamedNode::new("ex:a").unwrap()));
        assert!(matches!(id, Indexable::Surrogate(_)));
    }

    #[test]
    fn test_invalid_default_graph() {
        let config = StoreConfig::from_json_str(r#"{"default_graph": "no scheme"}"#).unwrap();
        assert!(matches!(
            config.build_factory(),
            Err(ConfigError::InvalidDefaultGraph(_))
        ));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = StoreConfig {
            features: vec![SmushFeature::FunctionalProperty],
            default_graph: None,
            collections: false,
            surrogate_ids: false,
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, config.to_json().unwrap()).unwrap();
        assert_eq!(StoreConfig::from_json_file(&path).unwrap(), config);
    }
}
