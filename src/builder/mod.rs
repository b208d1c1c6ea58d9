//! Classification of raw JSON records into typed nodes, groups and packages.

pub mod annotation;
pub mod fields;
pub mod nodes;
pub mod package;
pub mod registry;

pub use annotation::build_groups;
pub use fields::{NodeHeader, NodeViews};
pub use nodes::{CodeNodeBuilder, CustomNodeBuilder, LEGACY_ENGINE, PlainNodeBuilder};
pub use package::{apply_packages, resolve_packages};
pub use registry::{FieldMatcher, FieldRule, NodeBuilder, NodeBuilderRegistry};
