use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Unauthorized: {0}")]
    UnauthorizedError(String),

    #[error("Bad Request: {0}")]
    BadRequestError(String),

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::UnauthorizedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": match *self {
                CustomError::UnauthorizedError(..) => "UNAUTHORIZED_ERROR",
                CustomError::BadRequestError(..) => "BAD_REQUEST_ERROR",
                CustomError::ConflictError(..) => "CONFLICT_ERROR",
                CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
                CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
                CustomError::ValidationError(..) => "VALIDATION_ERROR",
            },
            "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_bad_request_map_to_400() {
        assert_eq!(
            CustomError::ValidationError("empty title".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CustomError::BadRequestError("invalid id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(
            CustomError::NotFoundError("post".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(
            CustomError::UnauthorizedError("no token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn display_includes_detail_message() {
        let err = CustomError::NotFoundError("Post not found".into());
        assert_eq!(err.to_string(), "Not Found: Post not found");
    }
}
