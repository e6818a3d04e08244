//! Defines the endpoint for updating a category.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error, UserID, UserStore,
    category::{
        Category, CategoryId, CategoryPatch, CategoryStore,
        ownership::{CategoryState, get_owned_category},
    },
};

/// Resolve the category ID in the request path.
///
/// An ID that is not an integer cannot refer to a stored category.
pub(crate) fn category_id_from_path(
    path: Result<Path<CategoryId>, PathRejection>,
) -> Result<CategoryId, Error> {
    match path {
        Ok(Path(category_id)) => Ok(category_id),
        Err(rejection) => {
            tracing::debug!("Invalid category ID: {}", rejection.body_text());
            Err(Error::CategoryNotFound)
        }
    }
}

/// A route handler that merges the request body into an owned category.
///
/// Missing or `null` fields are left unchanged and unknown fields are ignored.
pub async fn update_category<C, U>(
    State(state): State<CategoryState<C, U>>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<CategoryId>, PathRejection>,
    patch: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<Category>, Error>
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

    let Json(patch) = patch?;

    match state.category_store.update(category_id, &patch) {
        Ok(category) => Ok(Json(category)),
        // Deleted between the ownership check and the update.
        Err(Error::NotFound) => Err(Error::CategoryNotFound),
        Err(error) => {
            tracing::error!("Could not update category {category_id}: {error}");
            Err(error)
        }
    }
}
