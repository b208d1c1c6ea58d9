use super::fields::{NodeHeader, NodeViews, optional_str, required_str};
use super::registry::{FieldRule, NodeBuilder};
use crate::error::BuildError;
use crate::model::{DynamoNode, NodeKind, Package};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

pub const CUSTOM_FUNCTION_TYPE: &str = "Dynamo.Graph.Nodes.CustomNodes.Function, DynamoCore";
pub const GRAPH_FUNCTION_TYPE: &str = "Graph";
pub const PYTHON_CONCRETE_TYPE: &str = "PythonNodeModels.PythonNode, PythonNodeModels";
pub const PYTHON_NODE_TYPE: &str = "PythonScriptNode";
/// Engine assumed for code nodes saved before the `Engine` field existed.
pub const LEGACY_ENGINE: &str = "IronPython2";

static GUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Builds any node that no other builder recognises.
pub struct PlainNodeBuilder;

impl NodeBuilder for PlainNodeBuilder {
    fn name(&self) -> &str {
        "plain"
    }

    fn rules(&self) -> &[FieldRule] {
        &[]
    }

    fn build(&self, record: &Value, views: &NodeViews<'_>) -> Result<DynamoNode, BuildError> {
        Ok(NodeHeader::read(record, views)?.into_node(NodeKind::Plain))
    }
}

/// Builds embedded Python script nodes.
pub struct CodeNodeBuilder {
    rules: Vec<FieldRule>,
    legacy_engine: String,
}

impl CodeNodeBuilder {
    pub fn new(legacy_engine: impl Into<String>) -> Self {
        Self {
            rules: vec![
                FieldRule::equals("ConcreteType", PYTHON_CONCRETE_TYPE),
                FieldRule::equals("NodeType", PYTHON_NODE_TYPE),
            ],
            legacy_engine: legacy_engine.into(),
        }
    }
}

impl Default for CodeNodeBuilder {
    fn default() -> Self {
        Self::new(LEGACY_ENGINE)
    }
}

impl NodeBuilder for CodeNodeBuilder {
    fn name(&self) -> &str {
        "code"
    }

    fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    fn build(&self, record: &Value, views: &NodeViews<'_>) -> Result<DynamoNode, BuildError> {
        let header = NodeHeader::read(record, views)?;
        let code = optional_str(record, "Code").ok_or_else(|| BuildError::MissingCode {
            node_id: header.base.uuid.clone(),
        })?;
        let engine = optional_str(record, "Engine").unwrap_or(self.legacy_engine.as_str());
        let kind = NodeKind::Code {
            code: code.to_string(),
            engine: engine.to_string(),
        };
        Ok(header.into_node(kind))
    }
}

/// Builds instances of custom node definitions that are referenced by GUID.
pub struct CustomNodeBuilder {
    rules: Vec<FieldRule>,
}

impl CustomNodeBuilder {
    pub fn new() -> Self {
        Self {
            rules: vec![
                FieldRule::equals("ConcreteType", CUSTOM_FUNCTION_TYPE),
                FieldRule::equals("FunctionType", GRAPH_FUNCTION_TYPE),
                FieldRule::pattern("FunctionSignature", GUID_PATTERN.clone()),
            ],
        }
    }
}

impl Default for CustomNodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeBuilder for CustomNodeBuilder {
    fn name(&self) -> &str {
        "custom"
    }

    fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    fn build(&self, record: &Value, views: &NodeViews<'_>) -> Result<DynamoNode, BuildError> {
        let header = NodeHeader::read(record, views)?;
        let context = format!("custom node '{}'", header.base.uuid);
        let custom_uuid = required_str(record, "FunctionSignature", &context)?;
        let kind = NodeKind::Custom {
            custom_uuid: custom_uuid.to_string(),
            package: Package::unknown(),
        };
        Ok(header.into_node(kind))
    }
}
