//! Defines the app level error type and its conversion to HTML alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::Date;

use crate::alert::Alert;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The configured backend URL could not be used to build request URLs.
    #[error("invalid backend URL {0}")]
    InvalidBackendUrl(String),

    /// The transaction backend could not be reached, or the request timed out.
    #[error("could not reach the transaction backend: {0}")]
    BackendUnavailable(String),

    /// The transaction backend responded with a non-success status code.
    #[error("the transaction backend responded with status {0}")]
    BackendStatus(u16),

    /// The transaction backend's response could not be decoded.
    ///
    /// This includes transactions with a missing or non-numeric amount, which
    /// are rejected rather than counted as zero.
    #[error("the transaction backend sent an invalid response: {0}")]
    InvalidBackendResponse(String),

    /// A transaction amount was not a finite number.
    #[error("transaction {0} has an amount that is not a finite number")]
    InvalidAmount(String),

    /// The sum of the expenses is too large to represent.
    #[error("the total of the expenses is not a finite number")]
    TotalOverflow,

    /// A color palette was created without any colors.
    #[error("a color palette needs at least one color")]
    EmptyPalette,

    /// The start of a date range falls after its end.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// An empty string was given as a category name.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// Tried to edit a transaction that is not on the most recently viewed page.
    #[error("transaction {0} is not on the current page")]
    UnknownTransaction(String),

    /// Could not acquire the lock on the cached page of transactions.
    #[error("could not acquire the transaction cache lock")]
    CacheLockError,
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if let Some(status) = error.status() {
            Error::BackendStatus(status.as_u16())
        } else if error.is_decode() {
            Error::InvalidBackendResponse(error.to_string())
        } else {
            Error::BackendUnavailable(error.to_string())
        }
    }
}

impl Error {
    /// A short message that is safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::BackendUnavailable(_) => {
                "Could not reach the transaction server. Check that it is running.".to_owned()
            }
            Error::BackendStatus(status) => {
                format!("The transaction server returned an error (status {status}).")
            }
            Error::InvalidBackendResponse(_) | Error::InvalidAmount(_) => {
                "The transaction server sent data that could not be read.".to_owned()
            }
            Error::InvalidDateRange(start, end) => {
                format!("The start date {start} must be on or before the end date {end}.")
            }
            Error::TotalOverflow => "The spending total is too large to chart.".to_owned(),
            Error::EmptyCategory => "Choose a category for the transaction.".to_owned(),
            Error::UnknownTransaction(_) => {
                "The transaction could not be found. Refresh the page and try again.".to_owned()
            }
            _ => "An unexpected error occurred, check the server logs for more details.".to_owned(),
        }
    }

    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyCategory => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category".to_owned(),
                    details: self.user_message(),
                },
            ),
            Error::UnknownTransaction(_) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: self.user_message(),
                },
            ),
            Error::BackendUnavailable(_)
            | Error::BackendStatus(_)
            | Error::InvalidBackendResponse(_) => (
                StatusCode::BAD_GATEWAY,
                Alert::Error {
                    message: "Transaction server error".to_owned(),
                    details: self.user_message(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: error.user_message(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
