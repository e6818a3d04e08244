//! Spending categories: the data model, its storage and the REST handlers.

mod amount_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod ownership;
mod sqlite_store;
mod store;

pub use amount_endpoint::{decrement_amount, increment_amount};
pub use core::{Category, CategoryId, CategoryPatch, NewCategory};
pub use create_endpoint::create_category;
pub use delete_endpoint::delete_category;
pub use edit_endpoint::update_category;
pub use list_endpoint::list_categories;
pub use ownership::CategoryState;
pub use sqlite_store::SQLiteCategoryStore;
pub use store::CategoryStore;
