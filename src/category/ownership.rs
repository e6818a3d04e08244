//! The state shared by the category route handlers and the ownership check
//! that guards every mutation of a single category.

use axum::extract::FromRef;

use crate::{
    AppState, Error, UserID, UserStore,
    category::{Category, CategoryId, CategoryStore},
};

/// The state needed by the category route handlers.
#[derive(Debug, Clone)]
pub struct CategoryState<C, U>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The store for managing categories.
    pub category_store: C,
    /// The store used to confirm the caller still exists.
    pub user_store: U,
}

impl<C, U> FromRef<AppState<C, U>> for CategoryState<C, U>
where
    C: CategoryStore + Clone + Send + Sync,
    U: UserStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, U>) -> Self {
        Self {
            category_store: state.category_store.clone(),
            user_store: state.user_store.clone(),
        }
    }
}

/// Fetch the category with `category_id` on behalf of `caller`.
///
/// The checks run in a fixed order and the first failure wins:
/// the category must exist, then the caller must still exist, then the caller
/// must own the category.
///
/// # Errors
///
/// - [Error::CategoryNotFound] if there is no category with `category_id`.
/// - [Error::UserNotFound] if `caller` does not refer to a stored user.
/// - [Error::NotAuthorized] if `caller` does not own the category.
pub(crate) fn get_owned_category<C, U>(
    category_id: CategoryId,
    caller: UserID,
    category_store: &C,
    user_store: &U,
) -> Result<Category, Error>
where
    C: CategoryStore,
    U: UserStore,
{
    let category = match category_store.get(category_id) {
        Ok(category) => category,
        Err(Error::NotFound) => return Err(Error::CategoryNotFound),
        Err(error) => return Err(error),
    };

    let user = match user_store.get(caller) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::UserNotFound),
        Err(error) => return Err(error),
    };

    if category.owner != user.id {
        tracing::debug!(
            "User {} tried to access category {category_id} owned by {}",
            user.id,
            category.owner
        );
        return Err(Error::NotAuthorized);
    }

    Ok(category)
}
