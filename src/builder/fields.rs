use crate::error::BuildError;
use crate::model::{BaseNode, DynamoNode, NodeKind, UNKNOWN_CONCRETE_TYPE, UNKNOWN_NODE_TYPE};
use ahash::AHashMap;
use serde_json::{Value, json};

/// Reads a string field, treating non-string values as absent.
pub fn optional_str<'a>(record: &'a Value, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

/// Reads a string field that must be present.
pub fn required_str<'a>(
    record: &'a Value,
    field: &'static str,
    context: &str,
) -> Result<&'a str, BuildError> {
    optional_str(record, field).ok_or_else(|| BuildError::MissingRequiredField {
        field,
        context: context.to_string(),
    })
}

/// Reads the `Id` of a node, view, annotation or package record.
pub fn record_id<'a>(record: &'a Value, kind: &str) -> Result<&'a str, BuildError> {
    required_str(record, "Id", &format!("{} record", kind))
}

/// Reads the `Name` of a view record or a document.
pub fn record_name<'a>(record: &'a Value, context: &str) -> Result<&'a str, BuildError> {
    required_str(record, "Name", context)
}

/// Reads an array of strings. Missing arrays and non-string entries are skipped.
pub fn string_list(record: &Value, field: &str) -> Vec<String> {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Iterates the records of an array field, yielding nothing if it is absent.
pub fn records<'a>(record: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
    record
        .get(field)
        .and_then(Value::as_array)
        .map(|items| items.as_slice())
        .unwrap_or_default()
        .iter()
}

/// Lookup of the display records in `View.NodeViews`, keyed by node id.
#[derive(Debug, Default)]
pub struct NodeViews<'a> {
    views: AHashMap<&'a str, &'a Value>,
}

impl<'a> NodeViews<'a> {
    /// Indexes the views of a document. Fails if a view has no `Id`.
    pub fn from_document(document: &'a Value) -> Result<Self, BuildError> {
        let views = document.get("View").map(|view| records(view, "NodeViews"));
        match views {
            Some(views) => Self::from_records(views),
            None => Ok(Self::default()),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = &'a Value>) -> Result<Self, BuildError> {
        let mut views = AHashMap::new();
        for view in records {
            views.insert(record_id(view, "view")?, view);
        }
        Ok(Self { views })
    }

    pub fn get(&self, node_id: &str) -> Option<&'a Value> {
        self.views.get(node_id).copied()
    }

    /// The view for a node; every node must have one.
    pub fn view_for(&self, node_id: &str) -> Result<&'a Value, BuildError> {
        self.get(node_id).ok_or_else(|| BuildError::MissingView {
            node_id: node_id.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

/// The fields every node builder copies, regardless of the node variant.
#[derive(Debug, Clone)]
pub struct NodeHeader {
    pub base: BaseNode,
    pub node_type: String,
    pub concrete_type: String,
}

impl NodeHeader {
    pub fn read(record: &Value, views: &NodeViews<'_>) -> Result<Self, BuildError> {
        let id = record_id(record, "node")?;
        let view = views.view_for(id)?;
        let name = record_name(view, &format!("view of node '{}'", id))?;
        Ok(Self {
            base: BaseNode {
                uuid: id.to_string(),
                name: name.to_string(),
                content: json!({ "Node": record, "View": view }),
                group: None,
            },
            node_type: optional_str(record, "NodeType")
                .unwrap_or(UNKNOWN_NODE_TYPE)
                .to_string(),
            concrete_type: optional_str(record, "ConcreteType")
                .unwrap_or(UNKNOWN_CONCRETE_TYPE)
                .to_string(),
        })
    }

    pub fn into_node(self, kind: NodeKind) -> DynamoNode {
        DynamoNode {
            base: self.base,
            node_type: self.node_type,
            concrete_type: self.concrete_type,
            kind,
        }
    }
}
