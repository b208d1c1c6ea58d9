use super::fields::{optional_str, record_id, records, string_list};
use crate::error::BuildError;
use crate::model::{Annotation, DynamoNode};
use serde_json::Value;

/// Builds the groups of a document from its `Annotations` records.
///
/// Members are taken from the already built `nodes` in file order, and each member's
/// group back-reference is set. A node listed by several annotations stays with the
/// first one; ids that match no node are ignored.
pub fn build_groups(
    document: &Value,
    nodes: &mut [DynamoNode],
) -> Result<Vec<Annotation>, BuildError> {
    records(document, "Annotations")
        .map(|record| build_group(record, nodes))
        .collect()
}

fn build_group(record: &Value, nodes: &mut [DynamoNode]) -> Result<Annotation, BuildError> {
    let uuid = record_id(record, "annotation")?.to_string();
    let listed = string_list(record, "Nodes");

    let mut members = Vec::new();
    for node in nodes.iter_mut() {
        if !listed.iter().any(|id| id == node.uuid()) {
            continue;
        }
        if let Some(group) = node.group() {
            tracing::debug!(
                node = node.uuid(),
                group,
                annotation = %uuid,
                "node already belongs to a group"
            );
            continue;
        }
        node.base.group = Some(uuid.clone());
        members.push(node.uuid().to_string());
    }

    Ok(Annotation {
        name: optional_str(record, "Title").unwrap_or_default().to_string(),
        content: record.clone(),
        uuid,
        members,
    })
}
