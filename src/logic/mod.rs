pub mod path;
pub mod service;
pub mod tree;

pub use service::CategoryService;
pub use tree::build_tree;
