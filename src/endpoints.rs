//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}/category',
//! use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for viewing and filtering transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The route for the spending by category chart fragment.
pub const SPENDING_CHART: &str = "/spending";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to change the category of a single transaction.
pub const TRANSACTION_CATEGORY: &str = "/api/transactions/{transaction_id}/category";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// `id` is percent-encoded so that string IDs cannot add path segments.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        encode_path_segment(&id.to_string()),
        &endpoint_path[param_end..]
    )
}

/// Percent-encode everything except the characters that are unreserved in a URI.
fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());

    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    encoded
}
