//! One-hop projection of a file onto its neighbourhood.

use crate::library::Library;
use crate::model::DynamoFile;
use serde::Serialize;

/// A selected file together with what it depends on and what depends on it.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphElement<'a> {
    pub node: &'a DynamoFile,
    /// Dependencies present in the library, in library order.
    pub dependencies: Vec<&'a DynamoFile>,
    /// Files depending on `node`, sorted by name. Empty for scripts.
    pub used_in: Vec<&'a DynamoFile>,
}

/// Projects `selected` onto the files of `library` it is directly related to.
pub fn project<'a>(selected: &'a DynamoFile, library: &'a Library) -> GraphElement<'a> {
    GraphElement {
        node: selected,
        dependencies: library.dependencies_of(selected),
        used_in: library.used_in(selected),
    }
}

/// How a file in a graph view should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Backup,
    Root,
    Script,
    CustomNode,
}

impl NodeRole {
    fn of(file: &DynamoFile, is_root: bool) -> Self {
        if file.is_backup() {
            NodeRole::Backup
        } else if is_root {
            NodeRole::Root
        } else if file.is_script() {
            NodeRole::Script
        } else {
            NodeRole::CustomNode
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub role: NodeRole,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub id: String,
}

impl GraphEdge {
    fn between(source: &DynamoFile, target: &DynamoFile) -> Self {
        let source = source.handle().id.clone();
        let target = target.handle().id.clone();
        Self {
            id: format!("{} -> {}", source, target),
            source,
            target,
        }
    }
}

/// A flat node and edge list, ready for any renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphElement<'_> {
    /// Flattens the element. The root comes first and is the only node that cannot be
    /// selected; edges point from dependent to dependency. A root that depends on
    /// itself gets no extra node or edge.
    pub fn to_view(&self) -> GraphView {
        let node = |file: &DynamoFile, is_root: bool| GraphNode {
            id: file.handle().id.clone(),
            name: file.name().to_string(),
            role: NodeRole::of(file, is_root),
            selectable: !is_root,
        };
        let root_id = &self.node.handle().id;
        let dependencies = self
            .dependencies
            .iter()
            .filter(|dep| &dep.handle().id != root_id);
        let used_in = self
            .used_in
            .iter()
            .filter(|user| &user.handle().id != root_id);

        let nodes = std::iter::once(node(self.node, true))
            .chain(dependencies.clone().map(|dep| node(*dep, false)))
            .chain(used_in.clone().map(|user| node(*user, false)))
            .collect();

        let edges = dependencies
            .map(|dep| GraphEdge::between(self.node, dep))
            .chain(used_in.map(|user| GraphEdge::between(user, self.node)))
            .collect();

        GraphView { nodes, edges }
    }

    pub fn is_isolated(&self) -> bool {
        self.dependencies.is_empty() && self.used_in.is_empty()
    }
}
