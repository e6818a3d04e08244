//! The route for handling log-in requests.
//! The cookie module handles the lower level cookie auth logic.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use axum_extra::extract::PrivateCookieJar;
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{AppState, CategoryStore, Error, User, UserStore, auth::cookie::set_auth_cookie};

/// The request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The email address the user registered with.
    pub email: String,
    /// The user's raw password.
    pub password: String,
}

/// Handler for log-in requests.
///
/// On success the auth cookie is set and the user is returned.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the email is unknown or the password
/// does not match. The two cases are not distinguished so that clients cannot
/// probe for registered email addresses.
pub async fn post_log_in<C, U>(
    State(state): State<AppState<C, U>>,
    jar: PrivateCookieJar,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Result<(PrivateCookieJar, Json<User>), Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let Json(data) = payload?;

    let email = EmailAddress::from_str(&data.email).map_err(|_| Error::InvalidCredentials)?;
    let user = match state.user_store.get_by_email(&email) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    if !user.password_hash.verify(&data.password)? {
        tracing::debug!("Failed log-in attempt for user {}", user.id);
        return Err(Error::InvalidCredentials);
    }

    let jar = set_auth_cookie(jar, user.id, state.cookie_duration)?;

    Ok((jar, Json(user)))
}
