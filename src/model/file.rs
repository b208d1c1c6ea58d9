use super::{Annotation, DynamoNode};
use serde::Serialize;
use std::path::Path;

/// File names starting with this prefix are wrappers generated by Dynamo itself.
pub const GENERATED_PREFIX: &str = "Generate";

const BACKUP_DIR: &str = "backup";

/// The two kinds of Dynamo documents, told apart by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileType {
    /// A runnable graph (`.dyn`).
    Script,
    /// A reusable custom node definition (`.dyf`).
    CustomNode,
}

impl FileType {
    /// Determines the file type from a file name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("dyn") {
            Some(FileType::Script)
        } else if extension.eq_ignore_ascii_case("dyf") {
            Some(FileType::CustomNode)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileType::Script => "dyn",
            FileType::CustomNode => "dyf",
        }
    }
}

/// Identity of the input a file was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileHandle {
    /// Stable identifier of the input, unique within a batch (e.g. a relative path).
    pub id: String,
    /// The file name, including its suffix.
    pub name: String,
    pub mime_type: String,
}

/// A non-owning reference to another file of the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileRef {
    /// The handle id of the referenced file.
    pub id: String,
    pub uuid: String,
    pub name: String,
}

/// Data only custom node files carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomNodeInfo {
    categories: Vec<String>,
    used_in: Vec<FileRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileKind {
    Script,
    CustomNode(CustomNodeInfo),
}

impl FileKind {
    pub fn custom_node(categories: Vec<String>) -> Self {
        FileKind::CustomNode(CustomNodeInfo {
            categories,
            used_in: Vec::new(),
        })
    }

    pub fn file_type(&self) -> FileType {
        match self {
            FileKind::Script => FileType::Script,
            FileKind::CustomNode(_) => FileType::CustomNode,
        }
    }
}

/// A parsed Dynamo document together with its nodes and groups.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamoFile {
    uuid: String,
    name: String,
    handle: FileHandle,
    dependencies: Vec<String>,
    nodes: Vec<DynamoNode>,
    groups: Vec<Annotation>,
    kind: FileKind,
}

impl DynamoFile {
    pub fn new(
        handle: FileHandle,
        uuid: impl Into<String>,
        name: impl Into<String>,
        kind: FileKind,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            handle,
            dependencies: Vec::new(),
            nodes: Vec::new(),
            groups: Vec::new(),
            kind,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<DynamoNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_groups(mut self, groups: Vec<Annotation>) -> Self {
        self.groups = groups;
        self
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    pub fn kind(&self) -> &FileKind {
        &self.kind
    }

    pub fn file_type(&self) -> FileType {
        self.kind.file_type()
    }

    /// Uuids of the custom nodes this file declares to depend on, as written in the document.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn nodes(&self) -> &[DynamoNode] {
        &self.nodes
    }

    pub fn groups(&self) -> &[Annotation] {
        &self.groups
    }

    /// The category path of a custom node. Always empty for scripts.
    pub fn categories(&self) -> &[String] {
        match &self.kind {
            FileKind::CustomNode(info) => &info.categories,
            FileKind::Script => &[],
        }
    }

    pub fn file_ref(&self) -> FileRef {
        FileRef {
            id: self.handle.id.clone(),
            uuid: self.uuid.clone(),
            name: self.name.clone(),
        }
    }

    pub fn depends_on(&self, uuid: &str) -> bool {
        self.dependencies.iter().any(|dependency| dependency == uuid)
    }

    pub fn has_dependency(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn is_script(&self) -> bool {
        FileType::from_name(&self.handle.name) == Some(FileType::Script)
    }

    pub fn is_custom_node(&self) -> bool {
        FileType::from_name(&self.handle.name) == Some(FileType::CustomNode)
    }

    /// A custom node nothing in the batch depends on. Scripts are never "unused".
    pub fn is_unused(&self) -> bool {
        match &self.kind {
            FileKind::CustomNode(info) => info.used_in.is_empty(),
            FileKind::Script => false,
        }
    }

    /// A custom node generated by Dynamo, hidden from normal browsing.
    pub fn is_generated(&self) -> bool {
        matches!(self.kind, FileKind::CustomNode(_))
            && self.handle.name.starts_with(GENERATED_PREFIX)
    }

    /// Whether the file lives inside a `backup` directory.
    pub fn is_backup(&self) -> bool {
        self.handle
            .id
            .split(['/', '\\'])
            .any(|component| component.eq_ignore_ascii_case(BACKUP_DIR))
    }

    /// The files depending on this one, sorted by name. Always empty for scripts.
    pub fn node_used_in(&self) -> Vec<&FileRef> {
        match &self.kind {
            FileKind::CustomNode(info) => {
                let mut used_in: Vec<&FileRef> = info.used_in.iter().collect();
                used_in.sort_by(|a, b| a.name.cmp(&b.name));
                used_in
            }
            FileKind::Script => Vec::new(),
        }
    }

    pub fn used_in_count(&self) -> usize {
        match &self.kind {
            FileKind::CustomNode(info) => info.used_in.len(),
            FileKind::Script => 0,
        }
    }

    /// Records files that depend on this custom node, skipping ones already present.
    ///
    /// Returns the number of newly added entries. Scripts ignore the call.
    pub(crate) fn add_used_in(&mut self, users: impl IntoIterator<Item = FileRef>) -> usize {
        let FileKind::CustomNode(info) = &mut self.kind else {
            return 0;
        };
        let mut added = 0;
        for user in users {
            if info.used_in.iter().any(|known| known.id == user.id) {
                continue;
            }
            info.used_in.push(user);
            added += 1;
        }
        added
    }

    /// Resolves the group back-reference of a node of this file.
    pub fn group_of(&self, node: &DynamoNode) -> Option<&Annotation> {
        let group = node.group()?;
        self.groups.iter().find(|annotation| annotation.uuid == group)
    }

    pub fn node(&self, uuid: &str) -> Option<&DynamoNode> {
        self.nodes.iter().find(|node| node.uuid() == uuid)
    }

    /// The embedded script nodes, for source inspection.
    pub fn code_nodes(&self) -> impl Iterator<Item = &DynamoNode> {
        self.nodes.iter().filter(|node| node.is_code())
    }

    /// The custom node instances placed in this file.
    pub fn custom_node_instances(&self) -> impl Iterator<Item = &DynamoNode> {
        self.nodes.iter().filter(|node| node.is_custom())
    }
}
