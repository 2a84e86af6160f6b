//! Category orchestration: all tree invariants are enforced here, before any
//! mutation reaches the store.

use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::logic::path;
use crate::logic::tree::build_tree;
use crate::model::{
    Category, CategoryDraft, CategoryId, CategoryTree, CategoryUpdate, NewCategory,
    DEFAULT_DISPLAY_ORDER,
};
use crate::store::traits::{CategoryStore, PathRewrite};

const MAX_TITLE_LEN: usize = 50;

pub struct CategoryService<S> {
    store: Arc<S>,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a category, optionally under a parent. The store assigns the
    /// id and derives the materialized path in the same transaction, since
    /// the path cannot exist before the id does.
    pub async fn create(&self, request: NewCategory) -> Result<Category> {
        let title = validate_title(&request.title)?;
        let display_order = match request.display_order {
            Some(order) => validate_display_order(order)?,
            None => DEFAULT_DISPLAY_ORDER,
        };

        let parent = match request.parent_id {
            Some(parent_id) => Some(self.get_live(parent_id, "parent category not found").await?),
            None => None,
        };

        // Titles must be unique among live siblings; root-level titles are
        // exempt because they have no shared parent scope.
        if let Some(parent) = &parent {
            if self.store.exists_active_sibling(parent.id, &title).await? {
                return Err(ApiError::Duplicate(format!(
                    "category '{}' already exists under parent {}",
                    title, parent.id
                )));
            }
        }

        let draft = CategoryDraft {
            title,
            parent_id: parent.as_ref().map(|p| p.id),
            display_order,
            link: request.link,
            active: request.active.unwrap_or(true),
        };
        let parent_path = parent.as_ref().map(|p| p.path.as_str());

        Ok(self.store.insert(draft, parent_path).await?)
    }

    /// Patch a category's fields and, when a parent is supplied and differs
    /// from the current one, move it. A move recomputes the node's own
    /// path/depth and cascades one scoped bulk rewrite over every live
    /// descendant; both writes share a single store transaction.
    pub async fn update(&self, id: CategoryId, patch: CategoryUpdate) -> Result<Category> {
        let mut category = self.get_live(id, "category not found").await?;

        if let Some(title) = patch.title {
            category.title = validate_title(&title)?;
        }
        if let Some(order) = patch.display_order {
            category.display_order = validate_display_order(order)?;
        }
        if let Some(link) = patch.link {
            category.link = Some(link);
        }
        if let Some(active) = patch.active {
            category.active = active;
        }

        let mut rewrite = None;
        if let Some(new_parent_id) = patch.parent_id {
            if new_parent_id != category.parent_id {
                let new_parent = self.validate_new_parent(&category, new_parent_id).await?;

                let old_path = category.path.clone();
                let old_depth = category.depth;
                category.parent_id = new_parent.as_ref().map(|p| p.id);
                category.path = match &new_parent {
                    Some(parent) => path::child_path(&parent.path, category.id),
                    None => path::root_path(category.id),
                };
                category.depth = path::depth_of(&category.path);

                rewrite = Some(PathRewrite {
                    old_prefix: old_path,
                    new_prefix: category.path.clone(),
                    depth_delta: category.depth - old_depth,
                    exclude_id: category.id,
                });
            }
        }

        self.store.update(&category, rewrite.as_ref()).await?;
        Ok(category)
    }

    async fn validate_new_parent(
        &self,
        category: &Category,
        new_parent_id: Option<CategoryId>,
    ) -> Result<Option<Category>> {
        let Some(parent_id) = new_parent_id else {
            // Moving to the root level needs no target validation.
            return Ok(None);
        };

        if parent_id == category.id {
            return Err(ApiError::InvalidRequest(
                "a category cannot be its own parent".to_string(),
            ));
        }

        let parent = self.get_live(parent_id, "parent category not found").await?;

        if path::is_descendant_of(&parent.path, category.id) {
            return Err(ApiError::InvalidRequest(
                "a category cannot be moved under one of its own descendants".to_string(),
            ));
        }

        // Checked against the effective title (field patches are applied
        // first), excluding the node itself so a rename-in-place of a moved
        // node never collides with itself.
        if self
            .store
            .exists_active_sibling_excluding(parent.id, &category.title, category.id)
            .await?
        {
            return Err(ApiError::Duplicate(format!(
                "category '{}' already exists under parent {}",
                category.title, parent.id
            )));
        }

        Ok(Some(parent))
    }

    /// Soft-delete a category. Blocked while any live child still points at
    /// it, so the tree never contains orphaned live nodes.
    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.get_live(id, "category not found").await?;

        if self.store.exists_active_child_of(id).await? {
            return Err(ApiError::InvalidRequest(
                "category has child categories and cannot be deleted".to_string(),
            ));
        }

        Ok(self.store.mark_deleted(id).await?)
    }

    /// Nested tree read. Without a parent this returns the full forest; with
    /// one it returns the subtree rooted at that node (inclusive).
    pub async fn tree(&self, parent_id: Option<CategoryId>) -> Result<Vec<CategoryTree>> {
        let rows = match parent_id {
            None => self.store.find_all_active_ordered_by_path().await?,
            Some(id) => {
                let root = self.get_live(id, "category not found").await?;
                self.store
                    .find_active_subtree_by_path_prefix(&root.path)
                    .await?
            }
        };

        Ok(build_tree(rows))
    }

    async fn get_live(&self, id: CategoryId, missing: &str) -> Result<Category> {
        self.store
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("{} (id {})", missing, id)))
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ApiError::InvalidRequest(
            "category title is required".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::InvalidRequest(format!(
            "category title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

fn validate_display_order(order: i32) -> Result<i32> {
    if order < 0 {
        return Err(ApiError::InvalidRequest(
            "display order must not be negative".to_string(),
        ));
    }
    Ok(order)
}
