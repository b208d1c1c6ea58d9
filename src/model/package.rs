use serde::Serialize;
use std::fmt;
use std::sync::{Arc, LazyLock};

const UNKNOWN_NAME: &str = "Unknown";
const UNKNOWN_VERSION: &str = "0.0.0";

static UNKNOWN_PACKAGE: LazyLock<Arc<Package>> = LazyLock::new(|| {
    Arc::new(Package {
        name: UNKNOWN_NAME.to_string(),
        version: UNKNOWN_VERSION.to_string(),
    })
});

/// Metadata of a third-party node library a custom node was installed from.
///
/// Packages are shared: every custom node that came from the same
/// `NodeLibraryDependencies` entry holds a clone of the same `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Package {
    pub name: String,
    pub version: String,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// The sentinel package used for custom nodes without a resolved library.
    pub fn unknown() -> Arc<Package> {
        Arc::clone(&UNKNOWN_PACKAGE)
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_NAME && self.version == UNKNOWN_VERSION
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
