use super::fields::NodeViews;
use crate::error::{BuildError, RegistryError};
use crate::model::DynamoNode;
use regex::Regex;
use serde_json::Value;

/// How a single field of a node record is compared.
#[derive(Debug, Clone)]
pub enum FieldMatcher {
    Equals(String),
    Pattern(Regex),
}

/// One discriminator check a node builder performs on a record.
#[derive(Debug, Clone)]
pub struct FieldRule {
    key: String,
    matcher: FieldMatcher,
}

impl FieldRule {
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matcher: FieldMatcher::Equals(value.into()),
        }
    }

    pub fn pattern(key: impl Into<String>, pattern: Regex) -> Self {
        Self {
            key: key.into(),
            matcher: FieldMatcher::Pattern(pattern),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, record: &Value) -> bool {
        let Some(value) = record.get(&self.key).and_then(Value::as_str) else {
            return false;
        };
        match &self.matcher {
            FieldMatcher::Equals(expected) => value == expected,
            FieldMatcher::Pattern(pattern) => pattern.is_match(value),
        }
    }
}

/// Defines the contract for recognising and building one node variant.
///
/// A builder without rules matches every record and acts as the fallback.
pub trait NodeBuilder: Send + Sync {
    fn name(&self) -> &str;

    fn rules(&self) -> &[FieldRule];

    fn is_fallback(&self) -> bool {
        self.rules().is_empty()
    }

    fn is_builder_for(&self, record: &Value) -> bool {
        self.rules().iter().all(|rule| rule.matches(record))
    }

    fn build(&self, record: &Value, views: &NodeViews<'_>) -> Result<DynamoNode, BuildError>;
}

/// An ordered list of node builders, tried first to last, with exactly one fallback at the end.
pub struct NodeBuilderRegistry {
    specific: Vec<Box<dyn NodeBuilder>>,
    fallback: Box<dyn NodeBuilder>,
}

impl NodeBuilderRegistry {
    /// Creates a registry, keeping the order of the specific builders and moving
    /// the fallback last.
    ///
    /// Fails unless exactly one of the builders is a fallback.
    pub fn new(builders: Vec<Box<dyn NodeBuilder>>) -> Result<Self, RegistryError> {
        let (fallbacks, specific): (Vec<_>, Vec<_>) =
            builders.into_iter().partition(|builder| builder.is_fallback());

        let found = fallbacks.len();
        let mut fallbacks = fallbacks.into_iter();
        match (fallbacks.next(), fallbacks.next()) {
            (Some(fallback), None) => Ok(Self { specific, fallback }),
            _ => Err(RegistryError::BuilderConfiguration { found }),
        }
    }

    /// Returns the first builder whose rules match the record.
    pub fn classify(&self, record: &Value) -> &dyn NodeBuilder {
        self.specific
            .iter()
            .find(|builder| builder.is_builder_for(record))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    pub fn classify_and_build(
        &self,
        record: &Value,
        views: &NodeViews<'_>,
    ) -> Result<DynamoNode, BuildError> {
        let builder = self.classify(record);
        tracing::trace!(
            node = record.get("Id").and_then(serde_json::Value::as_str).unwrap_or("?"),
            builder = builder.name(),
            "classified node record"
        );
        builder.build(record, views)
    }

    /// Builder names in the order they are tried.
    pub fn builder_names(&self) -> Vec<&str> {
        self.specific
            .iter()
            .chain(std::iter::once(&self.fallback))
            .map(|builder| builder.name())
            .collect()
    }
}
