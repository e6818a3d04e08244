//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, PasswordHash,
    auth::{DEFAULT_COOKIE_DURATION, SQLiteUserStore, UserStore},
    category::{CategoryStore, SQLiteCategoryStore},
    db::initialize,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<C, U>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_hash_cost: u32,
    /// The store for managing user [categories](crate::Category).
    pub category_store: C,
    /// The store for managing [users](crate::User).
    pub user_store: U,
}

impl<C, U> AppState<C, U>
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    /// Create a new [AppState] with the default cookie duration and password hashing cost.
    pub fn new(cookie_secret: &str, category_store: C, user_store: U) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            password_hash_cost: PasswordHash::DEFAULT_COST,
            category_store,
            user_store,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl<C, U> FromRef<AppState<C, U>> for Key
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    fn from_ref(state: &AppState<C, U>) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLAppState = AppState<SQLiteCategoryStore, SQLiteUserStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    cookie_secret: &str,
) -> Result<SQLAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState::new(
        cookie_secret,
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteUserStore::new(connection),
    ))
}
