use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::response::ResultResponse;
use crate::error::Result;
use crate::logic::CategoryService;
use crate::model::{Category, CategoryId, CategoryTree, CategoryUpdate, NewCategory};
use crate::store::traits::CategoryStore;

pub type AppState<S> = Arc<CategoryService<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    #[serde(rename = "parentId")]
    pub parent_id: Option<CategoryId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub title: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            title: category.title,
        }
    }
}

pub async fn create_category<S: CategoryStore>(
    State(service): State<AppState<S>>,
    Json(request): Json<NewCategory>,
) -> Result<Json<ResultResponse<CategoryResponse>>> {
    let category = service.create(request).await?;
    Ok(Json(ResultResponse::success(category.into())))
}

pub async fn update_category<S: CategoryStore>(
    State(service): State<AppState<S>>,
    Path(id): Path<CategoryId>,
    Json(patch): Json<CategoryUpdate>,
) -> Result<Json<ResultResponse<CategoryResponse>>> {
    let category = service.update(id, patch).await?;
    Ok(Json(ResultResponse::success(category.into())))
}

pub async fn delete_category<S: CategoryStore>(
    State(service): State<AppState<S>>,
    Path(id): Path<CategoryId>,
) -> Result<Json<ResultResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ResultResponse::success_empty()))
}

pub async fn get_categories<S: CategoryStore>(
    State(service): State<AppState<S>>,
    Query(query): Query<TreeQuery>,
) -> Result<Json<ResultResponse<Vec<CategoryTree>>>> {
    let tree = service.tree(query.parent_id).await?;
    Ok(Json(ResultResponse::success(tree)))
}
