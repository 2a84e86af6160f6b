pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod store;

pub use api::routes;
pub use error::ApiError;
pub use logic::{build_tree, CategoryService};
pub use model::*;
pub use store::{CategoryStore, MemoryStore, PostgresStore};
