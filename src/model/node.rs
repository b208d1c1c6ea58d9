use super::Package;
use serde_json::Value;
use std::sync::Arc;

/// Node type tag used when a record has no `NodeType` field.
pub const UNKNOWN_NODE_TYPE: &str = "NO NODE TYPE";
/// Concrete type tag used when a record has no `ConcreteType` field.
pub const UNKNOWN_CONCRETE_TYPE: &str = "NO CONCRETE TYPE";

/// Identity and display data shared by every node of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseNode {
    /// The `Id` of the node record; unique within one document.
    pub uuid: String,
    /// Display name, taken from the node's view record.
    pub name: String,
    /// `{"Node": <record>, "View": <view>}`, kept for display only.
    pub content: Value,
    /// Uuid of the annotation this node belongs to. Not owning.
    pub group: Option<String>,
}

/// The behaviourally distinct node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Any node that is not one of the specialised kinds below.
    Plain,
    /// An embedded script node.
    Code { code: String, engine: String },
    /// An instance of a custom node definition.
    Custom {
        /// The uuid of the `.dyf` file this node instantiates.
        custom_uuid: String,
        package: Arc<Package>,
    },
}

/// A typed node of a Dynamo graph.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamoNode {
    pub base: BaseNode,
    pub node_type: String,
    pub concrete_type: String,
    pub kind: NodeKind,
}

impl DynamoNode {
    pub fn uuid(&self) -> &str {
        &self.base.uuid
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn content(&self) -> &Value {
        &self.base.content
    }

    pub fn group(&self) -> Option<&str> {
        self.base.group.as_deref()
    }

    pub fn is_code(&self) -> bool {
        matches!(self.kind, NodeKind::Code { .. })
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, NodeKind::Custom { .. })
    }

    /// Source code and engine of a code node.
    pub fn code(&self) -> Option<(&str, &str)> {
        match &self.kind {
            NodeKind::Code { code, engine } => Some((code, engine)),
            _ => None,
        }
    }

    /// Uuid of the referenced definition for a custom node.
    pub fn custom_uuid(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Custom { custom_uuid, .. } => Some(custom_uuid),
            _ => None,
        }
    }

    pub fn package(&self) -> Option<&Arc<Package>> {
        match &self.kind {
            NodeKind::Custom { package, .. } => Some(package),
            _ => None,
        }
    }

    /// Replaces the package of a custom node. Other kinds are left untouched.
    pub fn set_package(&mut self, new_package: Arc<Package>) {
        if let NodeKind::Custom { package, .. } = &mut self.kind {
            *package = new_package;
        }
    }
}
