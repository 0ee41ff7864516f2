//! The API endpoints URIs.
//!
//! Endpoints that take a parameter, e.g., '/transactions/{transaction_id}/details', are
//! matched by axum's path syntax. Tests fill the parameter in with `format_endpoint`.

/// The dashboard page summarising the stored transactions.
pub const ROOT: &str = "/";
/// The route to list all transactions as JSON.
pub const TRANSACTIONS_API: &str = "/transactions";
/// The route to list the details of a single transaction as JSON.
pub const TRANSACTION_DETAILS_API: &str = "/transactions/{transaction_id}/details";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/transactions/{transaction_id}/details',
/// '{transaction_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
