//! Byte-readable inputs for the parser.
//!
//! The parser does not care where bytes come from. `InMemoryFile` covers uploads and
//! tests, `DiskFile` and [`collect_files`] cover folders on disk.

use crate::model::{FileHandle, FileType};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const JSON_MIME_TYPE: &str = "application/json";

/// An input file: identity plus a way to read its content.
pub trait SourceFile {
    /// Stable identifier, unique within one batch.
    fn id(&self) -> &str;

    /// File name including the suffix.
    fn name(&self) -> &str;

    fn mime_type(&self) -> &str {
        JSON_MIME_TYPE
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>>;

    fn file_type(&self) -> Option<FileType> {
        FileType::from_name(self.name())
    }

    fn handle(&self) -> FileHandle {
        FileHandle {
            id: self.id().to_string(),
            name: self.name().to_string(),
            mime_type: self.mime_type().to_string(),
        }
    }
}

/// A file whose content is already in memory.
#[derive(Debug, Clone)]
pub struct InMemoryFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl InMemoryFile {
    /// Creates a file whose id is its name.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            mime_type: JSON_MIME_TYPE.to_string(),
            content: content.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

impl SourceFile for InMemoryFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.content.clone())
    }
}

/// A file on disk, identified by its path relative to the scanned root.
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    id: String,
    name: String,
}

impl DiskFile {
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let id = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, id, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceFile for DiskFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Recursively collects the Dynamo files below `root`, sorted by path.
///
/// With `only` set, files of the other type are skipped. Entries that cannot be
/// visited are logged and skipped.
pub fn collect_files(root: &Path, only: Option<FileType>) -> Vec<DiskFile> {
    let mut files: Vec<DiskFile> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let file_type = entry.file_name().to_str().and_then(FileType::from_name);
            match (file_type, only) {
                (Some(found), Some(wanted)) => found == wanted,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
        .map(|entry| DiskFile::new(root, entry.into_path()))
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}
