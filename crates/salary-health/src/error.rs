use crate::config::ConfigError;
use crate::diagnosis::PolicyError;
use crate::roster::RosterImportError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Roster(RosterImportError),
    Policy(PolicyError),
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Policy(err) => write!(f, "policy error: {}", err),
            AppError::BadRequest(message) => write!(f, "bad request: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Policy(err) => Some(err),
            AppError::BadRequest(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Roster(_) | AppError::Policy(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RosterImportError> for AppError {
    fn from(value: RosterImportError) -> Self {
        Self::Roster(value)
    }
}

impl From<PolicyError> for AppError {
    fn from(value: PolicyError) -> Self {
        Self::Policy(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_bad_request() {
        let response = AppError::BadRequest("records or roster_csv required".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let policy = AppError::from(PolicyError::Invalid {
            field: "minimum_wage",
            reason: "must be positive",
        });
        assert_eq!(policy.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_errors_map_to_server_error() {
        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert_eq!(io.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
