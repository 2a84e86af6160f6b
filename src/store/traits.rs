use anyhow::Result;

use crate::model::{Category, CategoryDraft, CategoryId};

/// Declarative description of the cascading path rewrite issued when a
/// category moves: every live row whose path starts with `old_prefix`,
/// except the moved node itself, gets the prefix replaced by `new_prefix`
/// and its depth shifted by `depth_delta`. Expressed this way the rewrite is
/// one scoped bulk mutation in the adapter, not an in-memory tree walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRewrite {
    pub old_prefix: String,
    pub new_prefix: String,
    pub depth_delta: i32,
    pub exclude_id: CategoryId,
}

/// Persistence contract for the category tree. "Active" throughout means
/// not soft-deleted; the `active` display flag only narrows tree reads.
#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_active_by_id(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn exists_active_sibling(&self, parent_id: CategoryId, title: &str) -> Result<bool>;

    async fn exists_active_sibling_excluding(
        &self,
        parent_id: CategoryId,
        title: &str,
        exclude_id: CategoryId,
    ) -> Result<bool>;

    async fn exists_active_child_of(&self, parent_id: CategoryId) -> Result<bool>;

    /// Insert a validated draft. The store assigns the id, then derives and
    /// persists path/depth from `parent_path` (root form when `None`) —
    /// both steps inside one transaction, since the path cannot be computed
    /// before the id exists.
    async fn insert(&self, draft: CategoryDraft, parent_path: Option<&str>) -> Result<Category>;

    /// Persist a node's current field values and, when `rewrite` is given,
    /// apply the descendant path rewrite in the same transaction.
    async fn update(&self, category: &Category, rewrite: Option<&PathRewrite>) -> Result<()>;

    /// Soft delete: flag the row and stamp the deletion time.
    async fn mark_deleted(&self, id: CategoryId) -> Result<()>;

    /// All live, visible nodes in path (ancestor-first) order.
    async fn find_all_active_ordered_by_path(&self) -> Result<Vec<Category>>;

    /// All live, visible nodes whose path starts with `path`, inclusive of
    /// the subtree root itself, in path order.
    async fn find_active_subtree_by_path_prefix(&self, path: &str) -> Result<Vec<Category>>;
}
