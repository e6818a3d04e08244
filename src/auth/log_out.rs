//! Route handlers for ending a session and looking up the logged in user.

use axum::{Extension, Json, extract::State};
use axum_extra::extract::PrivateCookieJar;

use crate::{
    AppState, CategoryStore, Error, User, UserID, UserStore, auth::cookie::invalidate_auth_cookie,
};

/// Invalidate the auth cookie.
pub async fn post_log_out(jar: PrivateCookieJar) -> PrivateCookieJar {
    invalidate_auth_cookie(jar)
}

/// Get the user attached to the request by the auth middleware.
///
/// # Errors
///
/// Returns [Error::UserNotFound] if the user no longer exists.
pub async fn get_current_user<C, U>(
    State(state): State<AppState<C, U>>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    match state.user_store.get(user_id) {
        Ok(user) => Ok(Json(user)),
        Err(Error::NotFound) => Err(Error::UserNotFound),
        Err(error) => Err(error),
    }
}
