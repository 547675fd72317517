//! Domain layer: the ordered tree engine and the course record
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod course;
pub mod error;
pub mod keyed;
pub mod node;
pub mod traversal;
pub mod tree;

pub use course::Course;
pub use error::{DomainError, TreeResult};
pub use keyed::Keyed;
pub use node::Node;
pub use traversal::{BreadthFirst, InOrder, Order, PostOrder, PreOrder};
pub use tree::{DeleteStrategy, Insertion, OrderedTree};

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
///
/// Returns the input unchanged if a variable cannot be resolved.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
