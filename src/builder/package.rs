use super::fields::{optional_str, record_name, records, required_str, string_list};
use crate::error::BuildError;
use crate::model::{DynamoNode, Package};
use ahash::AHashMap;
use serde_json::Value;
use std::sync::Arc;

pub const PACKAGE_REFERENCE_TYPE: &str = "Package";

/// Maps node ids to the package they were installed from.
///
/// Reads every `NodeLibraryDependencies` entry whose `ReferenceType` is `Package`.
/// One `Package` is allocated per entry and shared by all of its nodes. If a node id is
/// listed by several entries, the last one wins.
pub fn resolve_packages(document: &Value) -> Result<AHashMap<String, Arc<Package>>, BuildError> {
    let mut packages = AHashMap::new();
    for entry in records(document, "NodeLibraryDependencies") {
        if optional_str(entry, "ReferenceType") != Some(PACKAGE_REFERENCE_TYPE) {
            continue;
        }
        let name = record_name(entry, "package reference")?;
        let context = format!("package reference '{}'", name);
        let version = required_str(entry, "Version", &context)?;
        let package = Arc::new(Package::new(name, version));
        for node_id in string_list(entry, "Nodes") {
            packages.insert(node_id, Arc::clone(&package));
        }
    }
    Ok(packages)
}

/// Overwrites the package of every custom node listed in `packages`.
///
/// Returns the number of nodes updated.
pub fn apply_packages(nodes: &mut [DynamoNode], packages: &AHashMap<String, Arc<Package>>) -> usize {
    let mut updated = 0;
    for node in nodes.iter_mut().filter(|node| node.is_custom()) {
        if let Some(package) = packages.get(node.uuid()) {
            node.set_package(Arc::clone(package));
            updated += 1;
        }
    }
    updated
}
