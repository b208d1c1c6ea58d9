use crate::browse::{self, Category, FileSummary, SortOrder};
use crate::library::Library;
use crate::model::FileType;
use crate::parser::FileParser;
use crate::source::{DiskFile, collect_files};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

impl<'py> IntoPyObject<'py> for FileSummary {
    type Target = PyDict;
    type Output = Bound<'py, Self::Target>;
    type Error = PyErr;

    fn into_pyobject(self, py: Python<'py>) -> Result<Self::Output, Self::Error> {
        let dict = PyDict::new(py);
        dict.set_item("id", self.id)?;
        dict.set_item("uuid", self.uuid)?;
        dict.set_item("name", self.name)?;
        dict.set_item("dependency_count", self.dependency_count)?;
        dict.set_item("used_in_count", self.used_in_count)?;
        Ok(dict)
    }
}

fn category(name: &str) -> PyResult<Category> {
    match name {
        "scripts" => Ok(Category::Scripts),
        "custom_nodes" => Ok(Category::CustomNodes),
        "unused" => Ok(Category::Unused),
        other => Err(PyValueError::new_err(format!("unknown category '{}'", other))),
    }
}

fn sort_order(name: &str) -> PyResult<SortOrder> {
    match name {
        "node_name" => Ok(SortOrder::NodeName),
        "file_name" => Ok(SortOrder::FileName),
        "dependency_count" => Ok(SortOrder::DependencyCount),
        "used_in_count" => Ok(SortOrder::UsedInCount),
        other => Err(PyValueError::new_err(format!("unknown sort order '{}'", other))),
    }
}

fn list_request(category: &str, sort: &str) -> PyResult<(Category, SortOrder)> {
    let category = self::category(category)?;
    let sort = sort_order(sort)?;
    if !category.sort_options().contains(&sort) {
        return Err(PyValueError::new_err(format!(
            "{:?} is not a sort order for {}",
            sort, category
        )));
    }
    Ok((category, sort))
}

/// A linked set of Dynamo scripts and custom nodes.
///
/// Both folders are scanned recursively once, when the object is created.
#[pyclass(name = "Library")]
struct LibraryPy {
    library: Library,
}

#[pymethods]
impl LibraryPy {
    /// Loads and links the files of two folders.
    ///
    /// Args:
    ///     script_dir (str): Folder searched for `.dyn` scripts.
    ///     library_dir (str): Folder searched for `.dyf` custom nodes.
    ///
    /// Raises:
    ///     RuntimeError: If the node builder registry cannot be assembled.
    #[new]
    fn new(script_dir: &str, library_dir: &str) -> PyResult<Self> {
        let parser = FileParser::new().map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        let mut sources: Vec<DiskFile> = collect_files(Path::new(script_dir), Some(FileType::Script));
        sources.extend(collect_files(Path::new(library_dir), Some(FileType::CustomNode)));
        Ok(LibraryPy {
            library: Library::load(&parser, &sources),
        })
    }

    /// Lists one category.
    ///
    /// Args:
    ///     category (str): "scripts", "custom_nodes" or "unused".
    ///     sort (str): "node_name", "file_name", "dependency_count" or "used_in_count".
    ///
    /// Returns:
    ///     list[dict]: One summary per file with id, uuid, name, dependency_count
    ///         and used_in_count.
    ///
    /// Raises:
    ///     ValueError: If the category or sort order is unknown, or the sort order
    ///         does not apply to the category.
    #[pyo3(signature = (category, sort = "node_name"))]
    fn list(&self, category: &str, sort: &str) -> PyResult<Vec<FileSummary>> {
        let (category, sort) = list_request(category, sort)?;
        Ok(browse::summaries(&self.library, category, sort))
    }

    /// Returns the one-hop graph around a file as a JSON string.
    ///
    /// Raises:
    ///     KeyError: If no file matches `file`.
    fn graph(&self, file: &str) -> PyResult<String> {
        let selected = self
            .library
            .find(file)
            .ok_or_else(|| PyKeyError::new_err(file.to_string()))?;
        let view = self.library.project(selected).to_view();
        serde_json::to_string(&view).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }

    /// Ids of the files that could not be parsed, with the reason.
    fn failures(&self) -> Vec<(String, String)> {
        self.library
            .failures()
            .iter()
            .map(|failure| (failure.handle.id.clone(), failure.error.to_string()))
            .collect()
    }
}

/// Dependency explorer for Dynamo scripts and custom nodes.
#[pymodule]
fn dyndep(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<LibraryPy>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_order_must_fit_the_category() {
        assert!(list_request("custom_nodes", "used_in_count").is_ok());
        assert!(list_request("scripts", "used_in_count").is_err());
        assert!(list_request("scripts", "dependency_count").is_ok());
        assert!(list_request("nodes", "node_name").is_err());
    }
}
