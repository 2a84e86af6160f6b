//! Materialized-path helpers.
//!
//! A path encodes the full ancestor chain as `/id1/id2/.../idN/`, always
//! terminated by the node's own id. Keeping the math here as pure string
//! functions lets both store adapters and the service share one encoding.

use crate::model::CategoryId;

/// Path of a root node: `/id/`.
pub fn root_path(id: CategoryId) -> String {
    format!("/{}/", id)
}

/// Path of a child node: the parent's path with the child's id appended.
pub fn child_path(parent_path: &str, id: CategoryId) -> String {
    format!("{}{}/", parent_path, id)
}

/// Ancestor count encoded by a path: the number of `/`-delimited segments
/// minus one, so a root (`/1/`) has depth 0.
pub fn depth_of(path: &str) -> i32 {
    path.split('/').filter(|segment| !segment.is_empty()).count() as i32 - 1
}

/// True when `path` lies inside the subtree rooted at `id`, i.e. the path
/// contains `/id/` as a segment. Used to reject cyclic re-parenting: a
/// candidate parent whose path contains the moving node's id is one of its
/// own descendants.
pub fn is_descendant_of(path: &str, id: CategoryId) -> bool {
    path.contains(&format!("/{}/", id))
}
