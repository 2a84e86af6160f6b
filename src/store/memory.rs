//! In-memory adapter mirroring the SQL semantics of the Postgres store.
//! Backs unit and integration tests that need tree behavior without a
//! database; a single lock stands in for the per-operation transaction.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;

use crate::logic::path;
use crate::model::{Category, CategoryDraft, CategoryId};
use crate::store::traits::{CategoryStore, PathRewrite};

#[derive(Debug, Default)]
struct MemoryInner {
    rows: BTreeMap<CategoryId, Category>,
    next_id: CategoryId,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CategoryStore for MemoryStore {
    async fn find_active_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        let inner = self.inner.read();
        Ok(inner.rows.get(&id).filter(|row| !row.deleted).cloned())
    }

    async fn exists_active_sibling(&self, parent_id: CategoryId, title: &str) -> Result<bool> {
        let inner = self.inner.read();
        Ok(inner.rows.values().any(|row| {
            row.parent_id == Some(parent_id) && row.title == title && !row.deleted
        }))
    }

    async fn exists_active_sibling_excluding(
        &self,
        parent_id: CategoryId,
        title: &str,
        exclude_id: CategoryId,
    ) -> Result<bool> {
        let inner = self.inner.read();
        Ok(inner.rows.values().any(|row| {
            row.parent_id == Some(parent_id)
                && row.title == title
                && row.id != exclude_id
                && !row.deleted
        }))
    }

    async fn exists_active_child_of(&self, parent_id: CategoryId) -> Result<bool> {
        let inner = self.inner.read();
        Ok(inner
            .rows
            .values()
            .any(|row| row.parent_id == Some(parent_id) && !row.deleted))
    }

    async fn insert(&self, draft: CategoryDraft, parent_path: Option<&str>) -> Result<Category> {
        let mut inner = self.inner.write();
        inner.next_id += 1;
        let id = inner.next_id;

        let node_path = match parent_path {
            Some(parent_path) => path::child_path(parent_path, id),
            None => path::root_path(id),
        };
        let now = Utc::now();
        let category = Category {
            id,
            title: draft.title,
            parent_id: draft.parent_id,
            depth: path::depth_of(&node_path),
            path: node_path,
            display_order: draft.display_order,
            link: draft.link,
            active: draft.active,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: &Category, rewrite: Option<&PathRewrite>) -> Result<()> {
        let mut inner = self.inner.write();

        if let Some(row) = inner.rows.get_mut(&category.id) {
            let mut updated = category.clone();
            updated.updated_at = Utc::now();
            *row = updated;
        }

        if let Some(rewrite) = rewrite {
            for row in inner.rows.values_mut() {
                if row.id != rewrite.exclude_id
                    && !row.deleted
                    && row.path.starts_with(&rewrite.old_prefix)
                {
                    row.path = format!(
                        "{}{}",
                        rewrite.new_prefix,
                        &row.path[rewrite.old_prefix.len()..]
                    );
                    row.depth += rewrite.depth_delta;
                    row.updated_at = Utc::now();
                }
            }
        }

        Ok(())
    }

    async fn mark_deleted(&self, id: CategoryId) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(row) = inner.rows.get_mut(&id) {
            row.deleted = true;
            row.deleted_at = Some(Utc::now());
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_all_active_ordered_by_path(&self) -> Result<Vec<Category>> {
        let inner = self.inner.read();
        let mut rows: Vec<Category> = inner
            .rows
            .values()
            .filter(|row| !row.deleted && row.active)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(rows)
    }

    async fn find_active_subtree_by_path_prefix(&self, prefix: &str) -> Result<Vec<Category>> {
        let inner = self.inner.read();
        let mut rows: Vec<Category> = inner
            .rows
            .values()
            .filter(|row| !row.deleted && row.active && row.path.starts_with(prefix))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(rows)
    }
}
