use crate::domain::AuraError;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    code: Option<&'static str>,
    field: Option<&'static str>,
    details: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            code: None,
            field: None,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message).with_code(AuraError::Unauthorized.code())
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message).with_code(AuraError::Forbidden.code())
    }

    pub fn conflict(message: &'static str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: &'static str) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl From<AuraError> for AppError {
    fn from(err: AuraError) -> Self {
        let (status, message) = match &err {
            AuraError::Validation { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "Validation error"),
            AuraError::AlreadyConnected => (StatusCode::CONFLICT, "Already connected"),
            AuraError::AlreadyRequested => (StatusCode::CONFLICT, "Friend request already pending"),
            AuraError::NoSuchRequest => (StatusCode::NOT_FOUND, "No pending friend request"),
            AuraError::NotConnected => (StatusCode::NOT_FOUND, "Not connected"),
            AuraError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AuraError::InvalidInvitee => (StatusCode::BAD_REQUEST, "Invalid invitee"),
            AuraError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AuraError::Network { .. } => {
                return Self::internal_server_error("Internal server error");
            }
        };

        let mut app_error = Self::new(status, message).with_code(err.code());
        if let AuraError::Validation { field } = err {
            app_error.field = Some(field.as_str());
        }
        app_error
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Database unavailable")
            }

            other => {
                error!("Database error: {:?}", other);
                Self::internal_server_error("Internal server error")
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation error")
            .with_code("validation_error")
            .with_details(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::unauthorized("Invalid or expired token")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(ErrorResponse {
            error: self.message,
            code: self.code,
            field: self.field,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Field;

    #[test]
    fn domain_errors_map_to_their_status() {
        let cases = [
            (AuraError::validation(Field::Title), StatusCode::UNPROCESSABLE_ENTITY),
            (AuraError::AlreadyConnected, StatusCode::CONFLICT),
            (AuraError::AlreadyRequested, StatusCode::CONFLICT),
            (AuraError::NoSuchRequest, StatusCode::NOT_FOUND),
            (AuraError::NotConnected, StatusCode::NOT_FOUND),
            (AuraError::Forbidden, StatusCode::FORBIDDEN),
            (AuraError::InvalidInvitee, StatusCode::BAD_REQUEST),
            (AuraError::Unauthorized, StatusCode::UNAUTHORIZED),
        ];
        for (err, status) in cases {
            let code = err.code();
            let app_error = AppError::from(err);
            assert_eq!(app_error.status(), status);
            assert_eq!(app_error.code, Some(code));
        }
    }

    #[test]
    fn validation_carries_the_field() {
        let app_error = AppError::from(AuraError::validation(Field::StartsAt));
        assert_eq!(app_error.field, Some("starts_at"));
    }

    #[test]
    fn validator_errors_are_unprocessable() {
        let app_error = AppError::from(validator::ValidationErrors::new());
        assert_eq!(app_error.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(app_error.code, Some("validation_error"));
    }

    #[test]
    fn missing_rows_are_not_found() {
        assert_eq!(AppError::from(sqlx::Error::RowNotFound).status(), StatusCode::NOT_FOUND);
    }
}
