//! # dyndep - Dependency Explorer for Dynamo Files
//!
//! **dyndep** parses Dynamo scripts (`.dyn`) and custom node definitions (`.dyf`), builds
//! a typed model of their node graphs, and works out which files depend on which custom
//! nodes. The result can be browsed, sorted, and projected onto a small graph around any
//! selected file.
//!
//! ## Core Workflow
//!
//! The crate is batch oriented. One pass over a set of files looks like this:
//!
//! 1.  **Collect Sources**: Anything implementing [`source::SourceFile`] can be parsed. `DiskFile`s come from [`source::collect_files`], uploads fit in an `InMemoryFile`.
//! 2.  **Parse**: A [`parser::FileParser`] classifies every JSON node record through an ordered registry of node builders and produces one [`model::DynamoFile`] per document. Broken files are recorded, not fatal.
//! 3.  **Link**: [`library::Library`] separates scripts from custom nodes and fills the `used_in` list of every custom node.
//! 4.  **Browse and Project**: [`browse`] lists and sorts the library, and [`graph`] turns a selected file into its one-hop neighbourhood.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dyndep::prelude::*;
//! use dyndep::source::collect_files;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let parser = FileParser::new()?;
//!
//!     let mut sources = collect_files(Path::new("scripts"), Some(FileType::Script));
//!     sources.extend(collect_files(Path::new("library"), Some(FileType::CustomNode)));
//!     let library = Library::load(&parser, &sources);
//!
//!     for failure in library.failures() {
//!         println!("skipped {}: {}", failure.handle.id, failure.error);
//!     }
//!
//!     for file in browse::list(&library, Category::CustomNodes, SortOrder::UsedInCount) {
//!         println!("{} is used in {} files", file.name(), file.used_in_count());
//!     }
//!
//!     if let Some(file) = library.find("Walls.dyn") {
//!         let view = library.project(file).to_view();
//!         println!("{}", serde_json::to_string_pretty(&view)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browse;
pub mod builder;
pub mod error;
pub mod graph;
pub mod library;
pub mod linker;
pub mod model;
pub mod parser;
pub mod prelude;
pub mod source;

#[cfg(feature = "python-bindings")]
mod python;
