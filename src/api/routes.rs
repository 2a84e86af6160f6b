use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::CategoryStore;

pub fn create_router<S: CategoryStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Category management
        .route("/categories", post(handlers::create_category::<S>))
        .route("/categories", get(handlers::get_categories::<S>))
        .route("/categories/:id", patch(handlers::update_category::<S>))
        .route("/categories/:id", delete(handlers::delete_category::<S>))
}
