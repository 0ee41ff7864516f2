//! Defines the app level error type and its conversion into JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The transaction ID already exists in the database.
    ///
    /// Each SMS carries (or is assigned) a transaction ID that must be unique.
    /// Re-importing the same export hits this error for every message that
    /// was already stored, which is how repeated runs avoid duplicate rows.
    #[error("the transaction ID \"{0}\" already exists in the database")]
    DuplicateTransactionId(String),

    /// A transaction detail referenced a transaction ID that is not in the
    /// database.
    #[error("the transaction ID \"{0}\" does not refer to a stored transaction")]
    InvalidTransactionReference(String),

    /// A numeral matched one of the extraction patterns but could not be
    /// parsed as an integer.
    #[error("could not parse \"{0}\" as an integer amount")]
    InvalidNumber(String),

    /// The batch source file could not be read.
    #[error("could not read the batch source {path}: {reason}")]
    BatchSourceUnreadable {
        /// The path of the batch source.
        path: String,
        /// Why the file could not be read.
        reason: String,
    },

    /// The batch source was read but is not a valid SMS export.
    #[error("could not parse the batch source: {0}")]
    InvalidBatchSource(String),

    /// The uncategorized transactions report could not be written.
    #[error("could not write the report to {path}: {reason}")]
    ReportWriteError {
        /// The path of the report file.
        path: String,
        /// Why the report could not be written.
        reason: String,
    },

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match self {
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_found_is_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_errors_are_500() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
