pub mod annotation;
pub mod file;
pub mod node;
pub mod package;

pub use annotation::*;
pub use file::*;
pub use node::*;
pub use package::*;
