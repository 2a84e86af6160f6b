use anyhow::{Context, Result};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::logic::path;
use crate::model::{Category, CategoryDraft, CategoryId};
use crate::store::traits::{CategoryStore, PathRewrite};

const CATEGORY_COLUMNS: &str = "id, title, parent_id, path, depth, display_order, link, active, deleted, deleted_at, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        title: row.get("title"),
        parent_id: row.get("parent_id"),
        path: row.get("path"),
        depth: row.get("depth"),
        display_order: row.get("display_order"),
        link: row.get("link"),
        active: row.get("active"),
        deleted: row.get("deleted"),
        deleted_at: row.get("deleted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait::async_trait]
impl CategoryStore for PostgresStore {
    async fn find_active_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE id = $1 AND deleted = FALSE",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch category")?;

        Ok(row.as_ref().map(category_from_row))
    }

    async fn exists_active_sibling(&self, parent_id: CategoryId, title: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1 AND title = $2 AND deleted = FALSE)",
        )
        .bind(parent_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check sibling title")?;

        Ok(row.get(0))
    }

    async fn exists_active_sibling_excluding(
        &self,
        parent_id: CategoryId,
        title: &str,
        exclude_id: CategoryId,
    ) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1 AND title = $2 AND id <> $3 AND deleted = FALSE)",
        )
        .bind(parent_id)
        .bind(title)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check sibling title")?;

        Ok(row.get(0))
    }

    async fn exists_active_child_of(&self, parent_id: CategoryId) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE parent_id = $1 AND deleted = FALSE)",
        )
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check for live children")?;

        Ok(row.get(0))
    }

    async fn insert(&self, draft: CategoryDraft, parent_path: Option<&str>) -> Result<Category> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            INSERT INTO categories (title, parent_id, display_order, link, active, deleted)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING id, created_at, updated_at
            "#,
        )
        .bind(&draft.title)
        .bind(draft.parent_id)
        .bind(draft.display_order)
        .bind(&draft.link)
        .bind(draft.active)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert category")?;

        let id: CategoryId = row.get("id");
        let node_path = match parent_path {
            Some(parent_path) => path::child_path(parent_path, id),
            None => path::root_path(id),
        };
        let depth = path::depth_of(&node_path);

        sqlx::query("UPDATE categories SET path = $1, depth = $2 WHERE id = $3")
            .bind(&node_path)
            .bind(depth)
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to persist category path")?;

        tx.commit().await.context("Failed to commit insert")?;

        Ok(Category {
            id,
            title: draft.title,
            parent_id: draft.parent_id,
            path: node_path,
            depth,
            display_order: draft.display_order,
            link: draft.link,
            active: draft.active,
            deleted: false,
            deleted_at: None,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    async fn update(&self, category: &Category, rewrite: Option<&PathRewrite>) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(
            r#"
            UPDATE categories
            SET title = $1, parent_id = $2, path = $3, depth = $4,
                display_order = $5, link = $6, active = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&category.title)
        .bind(category.parent_id)
        .bind(&category.path)
        .bind(category.depth)
        .bind(category.display_order)
        .bind(&category.link)
        .bind(category.active)
        .bind(category.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update category")?;

        if let Some(rewrite) = rewrite {
            // One scoped statement; cost is bounded by the descendant count
            // and the whole move is all-or-nothing with the row update.
            sqlx::query(
                r#"
                UPDATE categories
                SET path = $1 || SUBSTR(path, LENGTH($2) + 1),
                    depth = depth + $3,
                    updated_at = NOW()
                WHERE path LIKE $2 || '%' AND id <> $4 AND deleted = FALSE
                "#,
            )
            .bind(&rewrite.new_prefix)
            .bind(&rewrite.old_prefix)
            .bind(rewrite.depth_delta)
            .bind(rewrite.exclude_id)
            .execute(&mut *tx)
            .await
            .context("Failed to rewrite descendant paths")?;
        }

        tx.commit().await.context("Failed to commit update")?;
        Ok(())
    }

    async fn mark_deleted(&self, id: CategoryId) -> Result<()> {
        sqlx::query(
            "UPDATE categories SET deleted = TRUE, deleted_at = NOW(), updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to soft-delete category")?;

        Ok(())
    }

    async fn find_all_active_ordered_by_path(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE deleted = FALSE AND active = TRUE ORDER BY path",
            CATEGORY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list categories")?;

        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn find_active_subtree_by_path_prefix(&self, path: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM categories WHERE path LIKE $1 || '%' AND deleted = FALSE AND active = TRUE ORDER BY path",
            CATEGORY_COLUMNS
        ))
        .bind(path)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list subtree")?;

        Ok(rows.iter().map(category_from_row).collect())
    }
}
