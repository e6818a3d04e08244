//! Defines the endpoint for creating a new category.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{
    Error, UserID, UserStore,
    category::{
        Category, CategoryStore, NewCategory, core::deserialize_text, ownership::CategoryState,
    },
};

/// The request body for creating a category.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default, deserialize_with = "deserialize_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    icon: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    color: Option<String>,
}

impl CategoryForm {
    /// Convert the form into a category owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingCategoryFields] if the name, icon and color are
    /// all missing or empty. Any one of them is enough.
    fn into_new_category(self, owner: UserID) -> Result<NewCategory, Error> {
        let is_absent = |field: &Option<String>| field.as_deref().is_none_or(str::is_empty);

        if is_absent(&self.name) && is_absent(&self.icon) && is_absent(&self.color) {
            return Err(Error::MissingCategoryFields);
        }

        Ok(NewCategory {
            name: self.name,
            icon: self.icon,
            color: self.color,
            owner,
        })
    }
}

/// A route handler for creating a new category owned by the caller.
///
/// The new category starts with an amount of zero.
pub async fn create_category<C, U>(
    State(state): State<CategoryState<C, U>>,
    Extension(user_id): Extension<UserID>,
    form: Result<Json<CategoryForm>, JsonRejection>,
) -> Result<Json<Category>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let Json(form) = form?;
    let new_category = form.into_new_category(user_id)?;

    state
        .category_store
        .create(new_category)
        .map(Json)
        .inspect_err(|error| tracing::error!("Could not create category: {error}"))
}
