//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types of the dyndep crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use dyndep::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let parser = FileParser::new()?;
//! let upload = InMemoryFile::new("Walls.dyn", std::fs::read("path/to/Walls.dyn")?);
//! let file = parser.try_parse(&upload)?;
//!
//! for node in file.code_nodes() {
//!     println!("{}: {:?}", node.name(), node.code());
//! }
//! # Ok(())
//! # }
//! ```

// Parsing
pub use crate::parser::{FileParser, MissingViewPolicy, ParserOptions};
pub use crate::source::{DiskFile, InMemoryFile, SourceFile};

// Model
pub use crate::model::{Annotation, DynamoFile, DynamoNode, FileType, NodeKind, Package};

// Linked batch, browsing and projection
pub use crate::browse::{self, Category, SortOrder};
pub use crate::graph::{GraphElement, GraphView};
pub use crate::library::Library;

// Error types
pub use crate::error::{BuildError, ParseError, RegistryError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
