//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;

use crate::{
    AppState, UserStore,
    auth::{auth_guard, get_current_user, post_log_in, post_log_out, register_user},
    category::{
        CategoryStore, create_category, decrement_amount, delete_category, increment_amount,
        list_categories, update_category,
    },
    endpoints,
};

/// Return a router with all the app's routes.
pub fn build_router<C, U>(state: AppState<C, U>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::USERS, post(register_user::<C, U>))
        .route(endpoints::LOG_IN, post(post_log_in::<C, U>))
        .route(endpoints::LOG_OUT, post(post_log_out));

    let protected_routes = Router::new()
        .route(endpoints::CURRENT_USER, get(get_current_user::<C, U>))
        .route(
            endpoints::CATEGORIES,
            get(list_categories::<C, U>).post(create_category::<C, U>),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category::<C, U>).delete(delete_category::<C, U>),
        )
        .route(
            endpoints::CATEGORY_INC_AMOUNT,
            put(increment_amount::<C, U>),
        )
        .route(
            endpoints::CATEGORY_DEC_AMOUNT,
            put(decrement_amount::<C, U>),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Set last so that a known path with the wrong method skips the auth guard.
    protected_routes
        .merge(unprotected_routes)
        .fallback(get_not_found)
        .method_not_allowed_fallback(get_not_found)
        .with_state(state)
}

/// Unknown routes, and known routes called with the wrong method, get a JSON
/// error with the same 400 status as other lookups that find nothing.
async fn get_not_found() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}
