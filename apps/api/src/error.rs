use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use northwind_core::{AppError, FieldViolation};
use serde::Serialize;

/// Uniform error envelope: `{ success: false, error: { ... } }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
}

/// Error payload carried inside the envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    message: String,
    status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldViolation>>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AppError::InvalidQuery(_)
            | AppError::Validation(_)
            | AppError::DependencyConflict { .. }
            | AppError::DuplicateKey(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.0.to_string();
        let errors = match self.0 {
            AppError::InvalidQuery(violations) | AppError::Validation(violations) => {
                Some(violations)
            }
            _ => None,
        };

        let payload = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                message,
                status_code: status.as_u16(),
                errors,
            },
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use northwind_core::{AppError, FieldViolation};

    use super::{ErrorDetail, ErrorResponse};

    #[test]
    fn envelope_carries_every_violation() {
        let error = AppError::InvalidQuery(vec![
            FieldViolation::new("page", "must be a positive integer"),
            FieldViolation::new("sort", "unknown sort field 'nope'"),
        ]);
        let message = error.to_string();
        let errors = match error {
            AppError::InvalidQuery(violations) => Some(violations),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                message,
                status_code: 400,
                errors,
            },
        };

        let rendered = serde_json::to_value(&body).unwrap_or_else(|_| unreachable!());
        assert_eq!(rendered["success"], false);
        assert_eq!(rendered["error"]["statusCode"], 400);
        assert_eq!(
            rendered["error"]["errors"]
                .as_array()
                .map(|errors| errors.len())
                .unwrap_or(0),
            2
        );
        assert_eq!(rendered["error"]["errors"][0]["field"], "page");
    }
}
