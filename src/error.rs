use thiserror::Error;

/// Errors that can occur while turning a single JSON record into a typed node or group.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Required field '{field}' is missing in {context}")]
    MissingRequiredField {
        field: &'static str,
        context: String,
    },

    #[error("Node '{node_id}' has no matching entry in View.NodeViews")]
    MissingView { node_id: String },

    #[error("Code node '{node_id}' has no 'Code' field")]
    MissingCode { node_id: String },
}

/// Errors raised while assembling the node builder registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Expected exactly one fallback node builder, but found {found}")]
    BuilderConfiguration { found: usize },
}

/// Errors that can occur while parsing one file of a batch.
///
/// Every variant carries the file name so the failure can be reported without
/// holding on to the source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Could not read '{file}': {message}")]
    Io { file: String, message: String },

    #[error("Failed to parse JSON in '{file}': {message}")]
    MalformedJson { file: String, message: String },

    #[error("'{file}' is neither a script (.dyn) nor a custom node (.dyf)")]
    UnsupportedFileType { file: String },

    #[error("'{file}' was already loaded from another source with the same id")]
    DuplicateFileId { file: String },

    #[error("Invalid content in '{file}': {source}")]
    Build {
        file: String,
        #[source]
        source: BuildError,
    },
}

impl ParseError {
    /// The name of the file this error refers to.
    pub fn file(&self) -> &str {
        match self {
            ParseError::Io { file, .. }
            | ParseError::MalformedJson { file, .. }
            | ParseError::UnsupportedFileType { file }
            | ParseError::DuplicateFileId { file }
            | ParseError::Build { file, .. } => file,
        }
    }
}
