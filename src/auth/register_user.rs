//! The endpoint for registering a new user.

use std::str::FromStr;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{AppState, CategoryStore, Error, PasswordHash, User, UserStore};

/// The request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The email address the user will log in with.
    pub email: String,
    /// The raw password, validated for strength before it is hashed.
    pub password: String,
}

/// A route handler for registering a new user.
///
/// Responds with the new user, without their password hash.
///
/// # Errors
///
/// - [Error::InvalidEmail] if the email address is malformed,
/// - [Error::TooWeak] if the password is too easy to guess,
/// - [Error::DuplicateEmail] if the email address is already registered.
pub async fn register_user<C, U>(
    State(state): State<AppState<C, U>>,
    payload: Result<Json<RegisterForm>, JsonRejection>,
) -> Result<Json<User>, Error>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    let Json(form) = payload?;

    let email = EmailAddress::from_str(&form.email)
        .map_err(|error| Error::InvalidEmail(error.to_string()))?;
    let password_hash = PasswordHash::from_raw_password(&form.password, state.password_hash_cost)?;

    let user = state.user_store.create(email, password_hash)?;
    tracing::info!("Registered user {}", user.id);

    Ok(Json(user))
}
