//! Listing, counting and sorting the files of a [`Library`].

use crate::library::Library;
use crate::model::DynamoFile;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// The listings a user can browse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Scripts with at least one declared dependency.
    Scripts,
    /// Custom nodes something depends on.
    CustomNodes,
    /// Custom nodes nothing depends on.
    Unused,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Scripts, Category::CustomNodes, Category::Unused];

    pub fn contains(self, file: &DynamoFile) -> bool {
        match self {
            Category::Scripts => file.is_script() && file.has_dependency(),
            Category::CustomNodes => {
                file.is_custom_node() && !file.is_unused() && !file.is_generated()
            }
            Category::Unused => file.is_custom_node() && file.is_unused() && !file.is_generated(),
        }
    }

    /// The sort orders that make sense for this listing.
    pub fn sort_options(self) -> Vec<SortOrder> {
        let mut options = vec![SortOrder::NodeName, SortOrder::FileName];
        if self != Category::Unused {
            options.push(SortOrder::DependencyCount);
        }
        if self == Category::CustomNodes {
            options.push(SortOrder::UsedInCount);
        }
        options
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Scripts => "Scripts",
            Category::CustomNodes => "Custom Nodes",
            Category::Unused => "Unused Nodes",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NodeName,
    FileName,
    /// Most declared dependencies first.
    DependencyCount,
    /// Most users first.
    UsedInCount,
}

/// Sorts files in place. Ties keep their current order.
pub fn sort(files: &mut [&DynamoFile], order: SortOrder) {
    match order {
        SortOrder::NodeName => files.sort_by(|a, b| a.name().cmp(b.name())),
        SortOrder::FileName => files.sort_by(|a, b| a.handle().name.cmp(&b.handle().name)),
        SortOrder::DependencyCount => files.sort_by_key(|file| Reverse(file.dependencies().len())),
        SortOrder::UsedInCount => files.sort_by_key(|file| Reverse(file.used_in_count())),
    }
}

/// Number of distinct dependencies of `file` that resolve in the library.
pub fn dependency_count(file: &DynamoFile, library: &Library) -> usize {
    file.dependencies()
        .iter()
        .map(String::as_str)
        .collect::<AHashSet<_>>()
        .into_iter()
        .filter(|uuid| library.custom_node(uuid).is_some())
        .count()
}

/// Whether selecting `file` would show anything besides the file itself.
pub fn is_selectable(file: &DynamoFile, library: &Library) -> bool {
    file.used_in_count() > 0
        || file
            .dependencies()
            .iter()
            .any(|uuid| library.custom_node(uuid).is_some())
}

/// The files of one category in library order.
pub fn files_in(library: &Library, category: Category) -> Vec<&DynamoFile> {
    library
        .files()
        .filter(|file| category.contains(file))
        .collect()
}

/// The files of one category, sorted.
pub fn list(library: &Library, category: Category, order: SortOrder) -> Vec<&DynamoFile> {
    let mut files = files_in(library, category);
    sort(&mut files, order);
    files
}

/// A row of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub id: String,
    pub uuid: String,
    pub name: String,
    pub dependency_count: usize,
    pub used_in_count: usize,
}

impl FileSummary {
    pub fn new(file: &DynamoFile, library: &Library) -> Self {
        Self {
            id: file.handle().id.clone(),
            uuid: file.uuid().to_string(),
            name: file.name().to_string(),
            dependency_count: dependency_count(file, library),
            used_in_count: file.used_in_count(),
        }
    }
}

/// Summaries of one category, sorted.
pub fn summaries(library: &Library, category: Category, order: SortOrder) -> Vec<FileSummary> {
    list(library, category, order)
        .into_iter()
        .map(|file| FileSummary::new(file, library))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileHandle, FileKind};

    fn file(id: &str, uuid: &str, name: &str, deps: &[&str]) -> DynamoFile {
        let kind = if id.ends_with(".dyf") {
            FileKind::custom_node(vec![])
        } else {
            FileKind::Script
        };
        let handle = FileHandle {
            id: id.to_string(),
            name: id.rsplit('/').next().unwrap_or(id).to_string(),
            mime_type: "application/json".to_string(),
        };
        DynamoFile::new(handle, uuid, name, kind)
            .with_dependencies(deps.iter().map(|d| d.to_string()).collect())
    }

    fn library() -> Library {
        Library::from_files(vec![
            file("Walls.dyn", "s1", "Walls", &["c1", "c1", "c2", "gone"]),
            file("Empty.dyn", "s2", "Empty", &[]),
            file("Roof.dyn", "s3", "Roof", &["c1"]),
            file("lib/Area.dyf", "c1", "Area", &[]),
            file("lib/Offset.dyf", "c2", "Offset", &[]),
            file("lib/Spare.dyf", "c3", "Spare", &[]),
            file("lib/GenerateTemp.dyf", "c4", "Temp", &[]),
        ])
    }

    #[test]
    fn categories_partition_the_listing() {
        let library = library();
        let names = |category| -> Vec<_> {
            files_in(&library, category).iter().map(|f| f.name()).collect()
        };
        assert_eq!(names(Category::Scripts), vec!["Walls", "Roof"]);
        assert_eq!(names(Category::CustomNodes), vec!["Area", "Offset"]);
        assert_eq!(names(Category::Unused), vec!["Spare"]);
    }

    #[test]
    fn dependency_count_ignores_duplicates_and_missing_files() {
        let library = library();
        let walls = library.find("Walls.dyn").unwrap();
        assert_eq!(dependency_count(walls, &library), 2);
        assert!(is_selectable(walls, &library));
        assert!(!is_selectable(library.find("Empty.dyn").unwrap(), &library));
        assert!(!is_selectable(library.find("Spare.dyf").unwrap(), &library));
    }

    #[test]
    fn sorting_is_stable_and_descending_for_counts() {
        let library = library();
        let by_users = list(&library, Category::CustomNodes, SortOrder::UsedInCount);
        let names: Vec<_> = by_users.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Area", "Offset"]);

        let by_deps = list(&library, Category::Scripts, SortOrder::DependencyCount);
        let names: Vec<_> = by_deps.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Walls", "Roof"]);

        let by_name = list(&library, Category::Scripts, SortOrder::NodeName);
        let names: Vec<_> = by_name.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Roof", "Walls"]);
    }

    #[test]
    fn sort_options_depend_on_the_category() {
        assert_eq!(
            Category::Unused.sort_options(),
            vec![SortOrder::NodeName, SortOrder::FileName]
        );
        assert_eq!(
            Category::CustomNodes.sort_options(),
            vec![
                SortOrder::NodeName,
                SortOrder::FileName,
                SortOrder::DependencyCount,
                SortOrder::UsedInCount
            ]
        );
        assert_eq!(Category::Scripts.sort_options().len(), 3);
    }

    #[test]
    fn summaries_carry_counts() {
        let library = library();
        let rows = summaries(&library, Category::CustomNodes, SortOrder::NodeName);
        assert_eq!(rows[0].name, "Area");
        assert_eq!(rows[0].used_in_count, 2);
        assert_eq!(rows[0].dependency_count, 0);
    }
}
