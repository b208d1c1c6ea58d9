use super::DynamoNode;
use serde_json::Value;

/// A named visual group of nodes within one file.
///
/// Members are referenced by node uuid, in the order the nodes appear in the
/// file. The nodes themselves are owned by the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub uuid: String,
    pub name: String,
    pub content: Value,
    pub members: Vec<String>,
}

impl Annotation {
    pub fn contains(&self, node_uuid: &str) -> bool {
        self.members.iter().any(|member| member == node_uuid)
    }

    /// Resolves the member uuids against the nodes of the owning file.
    pub fn member_nodes<'a>(
        &'a self,
        nodes: &'a [DynamoNode],
    ) -> impl Iterator<Item = &'a DynamoNode> + 'a {
        nodes.iter().filter(move |node| self.contains(node.uuid()))
    }
}
