//! One linked batch of Dynamo files.
//!
//! A [`Library`] is built once from a parse pass. Building it separates scripts from
//! custom nodes, drops custom nodes whose uuid is not unique, and links the rest, so
//! every query afterwards is read-only.

use crate::graph::{self, GraphElement};
use crate::error::ParseError;
use crate::linker::{self, AmbiguousUuid};
use crate::model::{DynamoFile, FileType};
use crate::parser::{FileParser, ParseFailure, ParsedBatch};
use crate::source::SourceFile;
use ahash::{AHashMap, AHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileSlot {
    Script(usize),
    CustomNode(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Library {
    scripts: Vec<DynamoFile>,
    custom_nodes: Vec<DynamoFile>,
    ambiguous: Vec<AmbiguousUuid>,
    failures: Vec<ParseFailure>,
    by_id: AHashMap<String, FileSlot>,
    by_uuid: AHashMap<String, usize>,
}

impl Library {
    /// Builds and links a library from already parsed files.
    ///
    /// Files are identified by their handle id. A file whose id was already seen is
    /// left out and recorded as a failure.
    pub fn from_files(files: impl IntoIterator<Item = DynamoFile>) -> Self {
        let (files, failures) = unique_ids(files);
        let (scripts, custom_nodes): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| file.file_type() == FileType::Script);

        for uuid in linker::duplicated_uuids(&scripts) {
            tracing::warn!(uuid = %uuid, "script uuid is not unique");
        }

        let (mut custom_nodes, ambiguous) = linker::partition_unique(custom_nodes);
        linker::link(&scripts, &mut custom_nodes);

        let by_id = scripts
            .iter()
            .enumerate()
            .map(|(index, file)| (file.handle().id.clone(), FileSlot::Script(index)))
            .chain(
                custom_nodes
                    .iter()
                    .enumerate()
                    .map(|(index, file)| (file.handle().id.clone(), FileSlot::CustomNode(index))),
            )
            .collect();
        let by_uuid = custom_nodes
            .iter()
            .enumerate()
            .map(|(index, file)| (file.uuid().to_string(), index))
            .collect();

        tracing::debug!(
            scripts = scripts.len(),
            custom_nodes = custom_nodes.len(),
            ambiguous = ambiguous.len(),
            "library ready"
        );

        Self {
            scripts,
            custom_nodes,
            ambiguous,
            failures,
            by_id,
            by_uuid,
        }
    }

    /// Builds a library from a parsed batch, keeping its failures.
    pub fn from_batch(batch: ParsedBatch) -> Self {
        let mut library = Self::from_files(batch.files);
        let mut failures = batch.failures;
        failures.append(&mut library.failures);
        library.failures = failures;
        library
    }

    /// Parses every source with `parser` and links the result.
    pub fn load<S: SourceFile>(parser: &FileParser, sources: &[S]) -> Self {
        Self::from_batch(parser.parse_batch(sources))
    }

    pub fn scripts(&self) -> &[DynamoFile] {
        &self.scripts
    }

    /// The custom nodes that take part in dependency resolution, in load order.
    pub fn custom_nodes(&self) -> &[DynamoFile] {
        &self.custom_nodes
    }

    /// Custom node uuids shared by more than one file.
    pub fn ambiguous(&self) -> &[AmbiguousUuid] {
        &self.ambiguous
    }

    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    /// Scripts first, then custom nodes.
    pub fn files(&self) -> impl Iterator<Item = &DynamoFile> {
        self.scripts.iter().chain(self.custom_nodes.iter())
    }

    pub fn len(&self) -> usize {
        self.scripts.len() + self.custom_nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks a file up by its handle id.
    pub fn file(&self, id: &str) -> Option<&DynamoFile> {
        match *self.by_id.get(id)? {
            FileSlot::Script(index) => self.scripts.get(index),
            FileSlot::CustomNode(index) => self.custom_nodes.get(index),
        }
    }

    /// Looks a custom node up by its uuid.
    pub fn custom_node(&self, uuid: &str) -> Option<&DynamoFile> {
        self.by_uuid
            .get(uuid)
            .and_then(|&index| self.custom_nodes.get(index))
    }

    /// Finds a file by handle id, then by file name, then by display name.
    pub fn find(&self, query: &str) -> Option<&DynamoFile> {
        self.file(query)
            .or_else(|| self.files().find(|file| file.handle().name == query))
            .or_else(|| self.files().find(|file| file.name() == query))
    }

    /// The custom nodes `file` depends on, in library order.
    pub fn dependencies_of(&self, file: &DynamoFile) -> Vec<&DynamoFile> {
        self.custom_nodes
            .iter()
            .filter(|custom| file.depends_on(custom.uuid()))
            .collect()
    }

    /// The files depending on `file`, sorted by name.
    pub fn used_in(&self, file: &DynamoFile) -> Vec<&DynamoFile> {
        file.node_used_in()
            .into_iter()
            .filter_map(|user| self.file(&user.id))
            .collect()
    }

    /// The one-hop neighbourhood of `file`.
    pub fn project<'a>(&'a self, file: &'a DynamoFile) -> GraphElement<'a> {
        graph::project(file, self)
    }
}

/// Keeps the first file of every handle id and turns the others into failures.
fn unique_ids(
    files: impl IntoIterator<Item = DynamoFile>,
) -> (Vec<DynamoFile>, Vec<ParseFailure>) {
    let mut seen = AHashSet::new();
    let mut failures = Vec::new();
    let files = files
        .into_iter()
        .filter(|file| {
            let id = &file.handle().id;
            if seen.insert(id.clone()) {
                return true;
            }
            tracing::warn!(id = %id, name = file.name(), "file id is not unique; later copy skipped");
            failures.push(ParseFailure {
                handle: file.handle().clone(),
                error: ParseError::DuplicateFileId { file: id.clone() },
            });
            false
        })
        .collect();
    (files, failures)
}
