//! Defines the endpoint for deleting a category.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde::Serialize;

use crate::{
    Error, UserID, UserStore,
    category::{
        CategoryId, CategoryStore,
        edit_endpoint::category_id_from_path,
        ownership::{CategoryState, get_owned_category},
    },
};

/// The response body for a deleted category.
#[derive(Debug, PartialEq, Serialize)]
pub struct DeletedCategory {
    /// The ID of the category that was removed.
    pub id: CategoryId,
}

/// A route handler for deleting an owned category, responds with its ID.
pub async fn delete_category<C, U>(
    State(state): State<CategoryState<C, U>>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<Json<DeletedCategory>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let category_id = category_id_from_path(path)?;
    get_owned_category(
        category_id,
        user_id,
        &state.category_store,
        &state.user_store,
    )?;

    match state.category_store.delete(category_id) {
        Ok(()) => Ok(Json(DeletedCategory { id: category_id })),
        Err(Error::NotFound) => Err(Error::CategoryNotFound),
        Err(error) => {
            tracing::error!("Could not delete category {category_id}: {error}");
            Err(error)
        }
    }
}
