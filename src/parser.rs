use crate::builder::fields::{optional_str, record_name, records, required_str, string_list};
use crate::builder::{
    CodeNodeBuilder, CustomNodeBuilder, LEGACY_ENGINE, NodeBuilder, NodeBuilderRegistry, NodeViews,
    PlainNodeBuilder, apply_packages, build_groups, resolve_packages,
};
use crate::error::{BuildError, ParseError, RegistryError};
use crate::model::{DynamoFile, DynamoNode, FileHandle, FileKind, FileType};
use crate::source::SourceFile;
use serde::Deserialize;
use serde_json::Value;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// What to do with a node that has no entry in `View.NodeViews`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingViewPolicy {
    /// The whole file is rejected.
    #[default]
    SkipFile,
    /// Only the node is dropped; the rest of the file is kept.
    SkipNode,
}

/// Tunable parsing behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Engine reported for code nodes without an `Engine` field.
    pub legacy_engine: String,
    pub on_missing_view: MissingViewPolicy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            legacy_engine: LEGACY_ENGINE.to_string(),
            on_missing_view: MissingViewPolicy::default(),
        }
    }
}

/// A file of a batch that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub handle: FileHandle,
    pub error: ParseError,
}

/// The outcome of parsing a batch: every file that parsed, and a record of every one that did not.
#[derive(Debug, Clone, Default)]
pub struct ParsedBatch {
    pub files: Vec<DynamoFile>,
    pub failures: Vec<ParseFailure>,
}

pub struct FileParserBuilder {
    options: ParserOptions,
    extra_builders: Vec<Box<dyn NodeBuilder>>,
}

impl FileParserBuilder {
    pub fn new() -> Self {
        Self {
            options: ParserOptions::default(),
            extra_builders: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_legacy_engine(mut self, engine: &str) -> Self {
        self.options.legacy_engine = engine.to_string();
        self
    }

    pub fn with_missing_view_policy(mut self, policy: MissingViewPolicy) -> Self {
        self.options.on_missing_view = policy;
        self
    }

    /// Registers an additional builder, tried after the built-in ones and before the fallback.
    pub fn with_node_builder(mut self, builder: Box<dyn NodeBuilder>) -> Self {
        self.extra_builders.push(builder);
        self
    }

    /// Assembles the builder registry. Fails if the registered builders do not contain
    /// exactly one fallback.
    pub fn build(self) -> Result<FileParser, RegistryError> {
        let mut builders: Vec<Box<dyn NodeBuilder>> = vec![
            Box::new(CustomNodeBuilder::new()),
            Box::new(CodeNodeBuilder::new(self.options.legacy_engine.as_str())),
        ];
        builders.extend(self.extra_builders);
        builders.push(Box::new(PlainNodeBuilder));

        Ok(FileParser {
            registry: NodeBuilderRegistry::new(builders)?,
            options: self.options,
        })
    }
}

impl Default for FileParserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns Dynamo documents into typed [`DynamoFile`]s.
pub struct FileParser {
    registry: NodeBuilderRegistry,
    options: ParserOptions,
}

impl FileParser {
    pub fn builder() -> FileParserBuilder {
        FileParserBuilder::new()
    }

    /// A parser with the built-in builders and default options.
    pub fn new() -> Result<Self, RegistryError> {
        Self::builder().build()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn registry(&self) -> &NodeBuilderRegistry {
        &self.registry
    }

    /// Parses one file, logging and swallowing any failure.
    pub fn parse<S: SourceFile + ?Sized>(&self, source: &S) -> Option<DynamoFile> {
        match self.try_parse(source) {
            Ok(file) => Some(file),
            Err(e) => {
                log_failure(&source.handle(), &e);
                None
            }
        }
    }

    /// Parses one file.
    pub fn try_parse<S: SourceFile + ?Sized>(&self, source: &S) -> Result<DynamoFile, ParseError> {
        let handle = source.handle();
        let file_type =
            source
                .file_type()
                .ok_or_else(|| ParseError::UnsupportedFileType {
                    file: handle.name.clone(),
                })?;
        let bytes = source.read_bytes().map_err(|e| ParseError::Io {
            file: handle.name.clone(),
            message: e.to_string(),
        })?;
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| ParseError::MalformedJson {
                file: handle.name.clone(),
                message: e.to_string(),
            })?;

        let file_name = handle.name.clone();
        self.parse_document(handle, file_type, &document)
            .map_err(|source| ParseError::Build {
                file: file_name,
                source,
            })
    }

    /// Builds a file entity from an already decoded document.
    pub fn parse_document(
        &self,
        handle: FileHandle,
        file_type: FileType,
        document: &Value,
    ) -> Result<DynamoFile, BuildError> {
        let uuid = required_str(document, "Uuid", "document")?;
        let name = record_name(document, "document")?;
        let kind = match file_type {
            FileType::Script => FileKind::Script,
            FileType::CustomNode => FileKind::custom_node(categories(document)),
        };

        let (nodes, groups) = if document.get("View").is_some() {
            let mut nodes = self.build_nodes(document)?;
            let groups = build_groups(document, &mut nodes)?;
            (nodes, groups)
        } else {
            (Vec::new(), Vec::new())
        };

        tracing::debug!(
            file = %handle.id,
            uuid,
            nodes = nodes.len(),
            groups = groups.len(),
            "parsed file"
        );

        Ok(DynamoFile::new(handle, uuid, name, kind)
            .with_dependencies(string_list(document, "Dependencies"))
            .with_nodes(nodes)
            .with_groups(groups))
    }

    /// Parses every supported source, collecting failures instead of stopping.
    ///
    /// Sources that are neither scripts nor custom nodes are left out without a failure record.
    pub fn parse_batch<S: SourceFile>(&self, sources: &[S]) -> ParsedBatch {
        let mut batch = ParsedBatch::default();
        for source in sources {
            if source.file_type().is_none() {
                tracing::debug!(file = source.id(), "ignoring unsupported file");
                continue;
            }
            match self.try_parse(source) {
                Ok(file) => batch.files.push(file),
                Err(error) => {
                    let handle = source.handle();
                    log_failure(&handle, &error);
                    batch.failures.push(ParseFailure { handle, error });
                }
            }
        }
        batch
    }

    fn build_nodes(&self, document: &Value) -> Result<Vec<DynamoNode>, BuildError> {
        let views = NodeViews::from_document(document)?;
        let mut nodes = Vec::new();
        for record in records(document, "Nodes") {
            match self.registry.classify_and_build(record, &views) {
                Ok(node) => nodes.push(node),
                Err(BuildError::MissingView { node_id })
                    if self.options.on_missing_view == MissingViewPolicy::SkipNode =>
                {
                    tracing::warn!(node = %node_id, "skipping node without a view");
                }
                Err(e) => return Err(e),
            }
        }
        let packages = resolve_packages(document)?;
        apply_packages(&mut nodes, &packages);
        Ok(nodes)
    }
}

fn categories(document: &Value) -> Vec<String> {
    match optional_str(document, "Category") {
        Some(category) if !category.is_empty() => {
            category.split('.').map(str::to_string).collect()
        }
        _ => Vec::new(),
    }
}

fn log_failure(handle: &FileHandle, error: &ParseError) {
    tracing::warn!(
        file = %handle.name,
        id = %handle.id,
        mime_type = %handle.mime_type,
        error = %error,
        "skipping file"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn category_is_split_into_a_path() {
        assert_eq!(
            categories(&json!({ "Category": "Geometry.Curves.Offset" })),
            vec!["Geometry", "Curves", "Offset"]
        );
        assert!(categories(&json!({ "Category": "" })).is_empty());
        assert!(categories(&json!({})).is_empty());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParserOptions =
            serde_json::from_str(r#"{ "on_missing_view": "skip_node" }"#).unwrap();
        assert_eq!(options.legacy_engine, LEGACY_ENGINE);
        assert_eq!(options.on_missing_view, MissingViewPolicy::SkipNode);
    }
}
