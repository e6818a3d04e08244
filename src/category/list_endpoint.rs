//! Defines the endpoint for listing the caller's categories.

use axum::{Extension, Json, extract::State};

use crate::{
    Error, UserID, UserStore,
    category::{Category, CategoryStore, ownership::CategoryState},
};

/// A route handler that responds with every category owned by the caller,
/// ordered by ID.
pub async fn list_categories<C, U>(
    State(state): State<CategoryState<C, U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    state
        .category_store
        .get_by_owner(user_id)
        .map(Json)
        .inspect_err(|error| {
            tracing::error!("Could not list categories for user {user_id}: {error}")
        })
}

#[cfg(test)]
mod tests {
    use axum::{Extension, Json, extract::State};

    use crate::{
        UserID,
        category::{CategoryStore, NewCategory},
        test_utils::get_fake_category_state,
    };

    use super::list_categories;

    fn new_category(name: &str, owner: UserID) -> NewCategory {
        NewCategory {
            name: Some(name.to_owned()),
            icon: None,
            color: None,
            owner,
        }
    }

    #[tokio::test]
    async fn lists_only_callers_categories() {
        let (state, user) = get_fake_category_state();
        let food = state
            .category_store
            .create(new_category("Food", user.id))
            .unwrap();
        state
            .category_store
            .create(new_category("Someone else's", UserID::new(user.id.as_i64() + 1)))
            .unwrap();
        let rent = state
            .category_store
            .create(new_category("Rent", user.id))
            .unwrap();

        let Json(got) = list_categories(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(got, vec![food, rent]);
    }

    #[tokio::test]
    async fn empty_list_when_caller_has_no_categories() {
        let (state, user) = get_fake_category_state();

        let Json(got) = list_categories(State(state), Extension(user.id))
            .await
            .unwrap();

        assert!(got.is_empty());
    }
}
