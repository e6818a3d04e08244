//! Defines the endpoints for incrementing and decrementing the running
//! balance of a category.

use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Error, UserID, UserStore,
    category::{
        Category, CategoryId, CategoryStore,
        edit_endpoint::category_id_from_path,
        ownership::{CategoryState, get_owned_category},
    },
};

/// The request body for changing the amount of a category.
///
/// `amount` may be a JSON number or a string holding a number.
#[derive(Debug, Deserialize)]
pub struct AmountForm {
    #[serde(default)]
    amount: Option<Value>,
}

/// Parse the delta in an [AmountForm].
///
/// # Errors
///
/// Returns [Error::InvalidAmount] if the amount is missing or is not a finite
/// number.
fn parse_delta(form: &AmountForm) -> Result<f64, Error> {
    let delta = match &form.amount {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match delta {
        Some(delta) if delta.is_finite() => Ok(delta),
        _ => {
            let got = form
                .amount
                .as_ref()
                .map_or_else(|| "nothing".to_owned(), Value::to_string);
            Err(Error::InvalidAmount(got))
        }
    }
}

/// A route handler that adds the requested amount to an owned category.
pub async fn increment_amount<C, U>(
    state: State<CategoryState<C, U>>,
    user_id: Extension<UserID>,
    path: Result<Path<CategoryId>, PathRejection>,
    form: Result<Json<AmountForm>, JsonRejection>,
) -> Result<Json<Category>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    change_amount(state, user_id, path, form, 1.0).await
}

/// A route handler that subtracts the requested amount from an owned category.
pub async fn decrement_amount<C, U>(
    state: State<CategoryState<C, U>>,
    user_id: Extension<UserID>,
    path: Result<Path<CategoryId>, PathRejection>,
    form: Result<Json<AmountForm>, JsonRejection>,
) -> Result<Json<Category>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    change_amount(state, user_id, path, form, -1.0).await
}

async fn change_amount<C, U>(
    State(state): State<CategoryState<C, U>>,
    Extension(user_id): Extension<UserID>,
    path: Result<Path<CategoryId>, PathRejection>,
    form: Result<Json<AmountForm>, JsonRejection>,
    sign: f64,
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

    let Json(form) = form?;
    let delta = sign * parse_delta(&form)?;

    match state.category_store.add_to_amount(category_id, delta) {
        Ok(category) => Ok(Json(category)),
        // Deleted between the ownership check and the update.
        Err(Error::NotFound) => Err(Error::CategoryNotFound),
        Err(error) => {
            tracing::error!("Could not change amount of category {category_id}: {error}");
            Err(error)
        }
    }
}


#[cfg(test)]
mod tests {
    use axum::{
        Extension, Json,
        extract::{Path, State},
    };
    use serde_json::json;

    use crate::{
        Error, UserID,
        category::{Category, CategoryStore, NewCategory, ownership::CategoryState},
        test_utils::{FakeCategoryStore, FakeUserStore, create_fake_user, get_fake_category_state},
    };

    use super::{AmountForm, decrement_amount, increment_amount};

    fn form(value: serde_json::Value) -> AmountForm {
        serde_json::from_value(value).unwrap()
    }

    fn create_category(
        state: &CategoryState<FakeCategoryStore, FakeUserStore>,
        owner: UserID,
    ) -> Category {
        state
            .category_store
            .create(NewCategory {
                name: Some("Food".to_owned()),
                icon: None,
                color: None,
                owner,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn increment_then_decrement_restores_amount() {
        let (state, user) = get_fake_category_state();
        let category = create_category(&state, user.id);

        for delta in [12.5, -7.25, 0.5, -0.125, 1024.0] {
            let Json(incremented) = increment_amount(
                State(state.clone()),
                Extension(user.id),
                Ok(Path(category.id)),
                Ok(Json(form(json!({ "amount": delta })))),
            )
            .await
            .unwrap();
            assert_eq!(incremented.amount, delta);

            let Json(decremented) = decrement_amount(
                State(state.clone()),
                Extension(user.id),
                Ok(Path(category.id)),
                Ok(Json(form(json!({ "amount": delta.to_string() })))),
            )
            .await
            .unwrap();
            assert_eq!(decremented.amount, 0.0);
            assert_eq!(decremented.owner, user.id);
        }
    }

    #[tokio::test]
    async fn invalid_delta_leaves_amount_unchanged() {
        let (state, user) = get_fake_category_state();
        let category = create_category(&state, user.id);

        let result = increment_amount(
            State(state.clone()),
            Extension(user.id),
            Ok(Path(category.id)),
            Ok(Json(form(json!({ "amount": "lots" })))),
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
        assert_eq!(state.category_store.get(category.id), Ok(category));
    }

    #[tokio::test]
    async fn missing_category_is_checked_before_delta() {
        let (state, user) = get_fake_category_state();

        let result = decrement_amount(
            State(state),
            Extension(user.id),
            Ok(Path(42)),
            Ok(Json(form(json!({ "amount": "lots" })))),
        )
        .await;

        assert_eq!(result.err(), Some(Error::CategoryNotFound));
    }

    #[tokio::test]
    async fn non_owner_cannot_change_amount() {
        let (state, owner) = get_fake_category_state();
        let intruder = create_fake_user(&state.user_store, "bar@baz.qux");
        let category = create_category(&state, owner.id);

        let increment = increment_amount(
            State(state.clone()),
            Extension(intruder.id),
            Ok(Path(category.id)),
            Ok(Json(form(json!({ "amount": 10 })))),
        )
        .await;
        let decrement = decrement_amount(
            State(state.clone()),
            Extension(intruder.id),
            Ok(Path(category.id)),
            Ok(Json(form(json!({ "amount": "not a number" })))),
        )
        .await;

        assert_eq!(increment.err(), Some(Error::NotAuthorized));
        assert_eq!(decrement.err(), Some(Error::NotAuthorized));
        assert_eq!(state.category_store.get(category.id), Ok(category));
    }
}
