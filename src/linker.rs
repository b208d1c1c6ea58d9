//! Cross-file linking: who depends on which custom node.

use crate::model::{DynamoFile, FileHandle, FileRef};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::Serialize;

/// Custom node files that share one uuid and therefore cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousUuid {
    pub uuid: String,
    pub files: Vec<FileHandle>,
}

/// Records, on every custom node, the other files of the batch that depend on it.
///
/// Both scripts and custom nodes are scanned as dependents. Running it again adds
/// nothing. Returns the number of new entries.
pub fn link(scripts: &[DynamoFile], custom_nodes: &mut [DynamoFile]) -> usize {
    let users: Vec<Vec<FileRef>> = custom_nodes
        .iter()
        .map(|custom| {
            scripts
                .iter()
                .chain(custom_nodes.iter())
                .filter(|file| file.handle().id != custom.handle().id)
                .filter(|file| file.depends_on(custom.uuid()))
                .map(DynamoFile::file_ref)
                .collect()
        })
        .collect();

    let added: usize = custom_nodes
        .iter_mut()
        .zip(users)
        .map(|(custom, users)| custom.add_used_in(users))
        .sum();

    tracing::debug!(
        scripts = scripts.len(),
        custom_nodes = custom_nodes.len(),
        added,
        "linked files"
    );
    added
}

/// Splits custom nodes into the uuid-unique ones and the ambiguous groups.
///
/// Only the unique ones can be resolved as dependency targets; every file of an
/// ambiguous uuid is left out. Both lists keep the input order.
pub fn partition_unique(custom_nodes: Vec<DynamoFile>) -> (Vec<DynamoFile>, Vec<AmbiguousUuid>) {
    let duplicated: AHashSet<String> = duplicated_uuids(&custom_nodes);

    let mut unique = Vec::with_capacity(custom_nodes.len());
    let mut ambiguous: Vec<AmbiguousUuid> = Vec::new();
    let mut slots: AHashMap<String, usize> = AHashMap::new();

    for file in custom_nodes {
        if !duplicated.contains(file.uuid()) {
            unique.push(file);
            continue;
        }
        let slot = *slots.entry(file.uuid().to_string()).or_insert_with(|| {
            ambiguous.push(AmbiguousUuid {
                uuid: file.uuid().to_string(),
                files: Vec::new(),
            });
            ambiguous.len() - 1
        });
        ambiguous[slot].files.push(file.handle().clone());
    }

    for entry in &ambiguous {
        tracing::warn!(
            uuid = %entry.uuid,
            count = entry.files.len(),
            files = ?entry.files.iter().map(|handle| handle.id.as_str()).collect::<Vec<_>>(),
            "custom node uuid is not unique; excluded from dependency resolution"
        );
    }

    (unique, ambiguous)
}

/// Uuids used by more than one file.
pub fn duplicated_uuids(files: &[DynamoFile]) -> AHashSet<String> {
    files
        .iter()
        .map(DynamoFile::uuid)
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(uuid, _)| uuid.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;

    fn handle(id: &str) -> FileHandle {
        FileHandle {
            id: id.to_string(),
            name: id.to_string(),
            mime_type: "application/json".to_string(),
        }
    }

    fn script(id: &str, deps: &[&str]) -> DynamoFile {
        DynamoFile::new(handle(id), format!("s-{}", id), id, FileKind::Script)
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    fn custom(id: &str, uuid: &str, deps: &[&str]) -> DynamoFile {
        DynamoFile::new(handle(id), uuid, id, FileKind::custom_node(vec![]))
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    #[test]
    fn custom_nodes_learn_their_users() {
        let scripts = vec![script("Walls.dyn", &["c1"]), script("Roof.dyn", &["c1", "c2"])];
        let mut custom_nodes = vec![custom("A.dyf", "c1", &[]), custom("B.dyf", "c2", &["c1"])];

        let added = link(&scripts, &mut custom_nodes);
        assert_eq!(added, 4);

        let users: Vec<_> = custom_nodes[0]
            .node_used_in()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(users, vec!["B.dyf", "Roof.dyn", "Walls.dyn"]);
        assert_eq!(custom_nodes[1].used_in_count(), 1);
    }

    #[test]
    fn a_file_never_uses_itself() {
        let mut custom_nodes = vec![custom("Loop.dyf", "c1", &["c1"])];
        link(&[], &mut custom_nodes);
        assert!(custom_nodes[0].is_unused());
    }

    #[test]
    fn partition_excludes_every_duplicate() {
        let files = vec![
            custom("A.dyf", "c1", &[]),
            custom("B.dyf", "dup", &[]),
            custom("C.dyf", "c3", &[]),
            custom("backup/B.dyf", "dup", &[]),
        ];
        let (unique, ambiguous) = partition_unique(files);

        let ids: Vec<_> = unique.iter().map(|f| f.handle().id.as_str()).collect();
        assert_eq!(ids, vec!["A.dyf", "C.dyf"]);
        assert_eq!(ambiguous.len(), 1);
        assert_eq!(ambiguous[0].uuid, "dup");
        assert_eq!(ambiguous[0].files.len(), 2);
        assert_eq!(ambiguous[0].files[1].id, "backup/B.dyf");
    }
}
