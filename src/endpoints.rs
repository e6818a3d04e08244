//! The API endpoints URIs.
//!
//! Endpoints that take a parameter, e.g., `/api/v1/categories/{category_id}`, are
//! filled in by the router from the request path.

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/v1/categories";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/api/v1/categories/{category_id}";
/// The route to add to the amount of a category.
pub const CATEGORY_INC_AMOUNT: &str = "/api/v1/categories/{category_id}/inc/amount";
/// The route to subtract from the amount of a category.
pub const CATEGORY_DEC_AMOUNT: &str = "/api/v1/categories/{category_id}/dec/amount";
/// The route to register users.
pub const USERS: &str = "/api/v1/users";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/v1/users/login";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/v1/users/logout";
/// The route to get the logged in user.
pub const CURRENT_USER: &str = "/api/v1/users/me";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
