use actix_web::{HttpResponse, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Validation failures of the check-in/check-out state machine. All are
/// returned synchronously to the caller; none leave partial state behind.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceError {
    #[display(fmt = "You are outside the office radius")]
    OutOfRange,
    #[display(fmt = "Already checked in today")]
    AlreadyCheckedIn,
    #[display(fmt = "Already checked out today")]
    AlreadyCheckedOut,
    #[display(fmt = "No check-in found for today")]
    NotCheckedIn,
    #[display(fmt = "Unknown user")]
    UnknownUser,
}

impl actix_web::ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::OutOfRange => StatusCode::BAD_REQUEST,
            Self::AlreadyCheckedIn | Self::AlreadyCheckedOut | Self::NotCheckedIn => {
                StatusCode::CONFLICT
            }
            Self::UnknownUser => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
