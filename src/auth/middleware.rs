//! Authentication middleware that validates the auth cookie and extends sessions.

use axum::{
    extract::{FromRef, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use time::Duration;

use crate::{
    AppState, CategoryStore, UserStore,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
};

/// Sessions that would expire within this window are pushed back out to it.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl<C, U> FromRef<AppState<C, U>> for AuthState
where
    C: CategoryStore + Send + Sync,
    U: UserStore + Send + Sync,
{
    fn from_ref(state: &AppState<C, U>) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

/// Middleware function that checks for a valid auth cookie.
///
/// If the cookie is valid, the user ID is inserted into the request extensions and the request
/// is executed normally, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());

    let token = match get_token_from_cookies(&jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("Rejecting request to {}: {error}", parts.uri.path());
            return error.into_response();
        }
    };

    parts.extensions.insert(token.user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let jar = match extend_auth_cookie_duration_if_needed(jar, token, SESSION_EXTENSION) {
        Ok(Some(updated_jar)) => updated_jar,
        Ok(None) => return response,
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}. Keeping the old cookie.");
            return response;
        }
    };

    let (mut parts, body) = response.into_parts();
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Json, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error, UserID,
        auth::{
            cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, set_auth_cookie},
            middleware::{AuthState, auth_guard},
        },
    };

    const TEST_LOG_IN_ROUTE: &str = "/log_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";

    async fn test_handler(Extension(user_id): Extension<UserID>) -> Json<Value> {
        Json(json!({ "user_id": user_id }))
    }

    #[derive(Clone)]
    struct TestState {
        auth: AuthState,
        cookie_duration: Duration,
    }

    impl axum::extract::FromRef<TestState> for AuthState {
        fn from_ref(state: &TestState) -> Self {
            state.auth.clone()
        }
    }

    impl axum::extract::FromRef<TestState> for Key {
        fn from_ref(state: &TestState) -> Self {
            state.auth.cookie_key.clone()
        }
    }

    async fn stub_log_in_route(
        State(state): State<TestState>,
        jar: PrivateCookieJar,
    ) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, UserID::new(1), state.cookie_duration)
    }

    fn get_test_server(cookie_duration: Duration) -> TestServer {
        let state = TestState {
            auth: AuthState {
                cookie_key: Key::from(&Sha512::digest("nafstenoas")),
            },
            cookie_duration,
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({ "user_id": 1 }));
    }

    #[tokio::test]
    async fn get_protected_route_without_cookie_is_unauthorized() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_unauthorized();
        response.assert_json(&json!({ "error": "Not authorized, no valid token" }));
    }

    #[tokio::test]
    async fn get_protected_route_with_forged_cookie_is_unauthorized() {
        let server = get_test_server(DEFAULT_COOKIE_DURATION);

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::new(
                COOKIE_TOKEN,
                r#"{"user_id":1,"expires_at":"2999-01-01 00:00:00.0 +00:00:00"}"#,
            ))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn get_protected_route_with_expired_cookie_is_unauthorized() {
        let server = get_test_server(Duration::seconds(-1));
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn auth_guard_extends_short_session() {
        let server = get_test_server(Duration::seconds(5));
        let token_cookie = server.post(TEST_LOG_IN_ROUTE).await.cookie(COOKIE_TOKEN);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_ok();
        let expires = response.cookie(COOKIE_TOKEN).expires_datetime().unwrap();
        let want = OffsetDateTime::now_utc() + Duration::minutes(5);
        assert!(
            (expires - want).abs() < Duration::seconds(2),
            "got expiry {expires:?}, want {want:?}"
        );
    }
}
