//! A small personal-finance backend.
//!
//! Users register, log in, and then manage spending categories, each of
//! which carries a running balance. Everything is exposed as a JSON REST API
//! under `/api/v1` and persisted to SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod auth;
mod category;
mod db;
mod endpoints;
mod logging;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, SQLAppState, create_app_state};
pub use auth::{
    DEFAULT_COOKIE_DURATION, PasswordHash, SQLiteUserStore, User, UserID, UserStore,
    ValidatedPassword,
};
pub use category::{
    Category, CategoryId, CategoryPatch, CategoryState, CategoryStore, NewCategory,
    SQLiteCategoryStore,
};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Every error that reaches a route handler is turned into a JSON body of the
/// form `{"error": "<message>"}` by the [IntoResponse] impl below.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A category was submitted without any of its name, icon or color.
    #[error("Please add all required fields")]
    MissingCategoryFields,

    /// The delta for incrementing or decrementing a category amount is not a
    /// finite number.
    #[error("amount must be a number, got {0}")]
    InvalidAmount(String),

    /// The request body could not be parsed.
    ///
    /// Callers should pass in the text of the extractor rejection.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The category referenced in the request path does not exist.
    ///
    /// This is reported with a 400 status code rather than 404 since clients
    /// of the API already rely on that.
    #[error("Category not found")]
    CategoryNotFound,

    /// The user attached to the request could not be found in the database,
    /// e.g., the account was removed after the auth cookie was issued.
    #[error("User not found")]
    UserNotFound,

    /// The caller does not own the resource they tried to modify.
    #[error("User not authorized")]
    NotAuthorized,

    /// The request did not carry a valid, unexpired auth cookie.
    #[error("Not authorized, no valid token")]
    Unauthenticated,

    /// The user provided an invalid combination of email and password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email address used to register a user is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email address used to register a user is already taken.
    #[error("a user with that email address already exists")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The requested row was not found.
    ///
    /// Stores return this when a query returns no rows. Route handlers
    /// translate it into a more specific error before responding.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequestBody(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingCategoryFields
            | Error::InvalidAmount(_)
            | Error::InvalidRequestBody(_)
            | Error::CategoryNotFound
            | Error::InvalidEmail(_)
            | Error::TooWeak(_)
            | Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::UserNotFound
            | Error::NotAuthorized
            | Error::Unauthenticated
            | Error::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Error::HashingError(_)
            | Error::NotFound
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
