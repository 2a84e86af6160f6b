use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type CategoryId = i64;

/// Fallback sort key for categories created without an explicit order.
pub const DEFAULT_DISPLAY_ORDER: i32 = 9999;

/// A single node of the category tree as persisted by the store.
///
/// `path` is the materialized ancestor chain (`/id1/.../idN/`, always ending
/// with this node's own id) and `depth` is the persisted ancestor count
/// (root = 0). Both are derived, never client-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub parent_id: Option<CategoryId>,
    pub path: String,
    pub depth: i32,
    pub display_order: i32,
    pub link: Option<String>,
    pub active: bool,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create request payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub title: String,
    pub parent_id: Option<CategoryId>,
    pub display_order: Option<i32>,
    pub link: Option<String>,
    pub active: Option<bool>,
}

/// Patch payload for an existing category. Absent fields leave the current
/// value unchanged.
///
/// `parent_id` is tri-state: absent means no structural change, an explicit
/// `null` moves the node to the root level, and a value re-parents it under
/// that node. The custom deserializer keeps "absent" and "null" apart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<CategoryId>>,
    pub display_order: Option<i32>,
    pub link: Option<String>,
    pub active: Option<bool>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Resolved values handed to the store once the service has validated a
/// create request and applied defaults. The store assigns the id and derives
/// the path within the same transaction.
#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub title: String,
    pub parent_id: Option<CategoryId>,
    pub display_order: i32,
    pub link: Option<String>,
    pub active: bool,
}

/// One node of the nested tree returned by list reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTree {
    pub id: CategoryId,
    pub title: String,
    pub parent_id: Option<CategoryId>,
    pub link: Option<String>,
    pub display_order: i32,
    pub active: bool,
    pub children: Vec<CategoryTree>,
}

impl CategoryTree {
    pub fn leaf(category: &Category) -> Self {
        Self {
            id: category.id,
            title: category.title.clone(),
            parent_id: category.parent_id,
            link: category.link.clone(),
            display_order: category.display_order,
            active: category.active,
            children: Vec::new(),
        }
    }
}
