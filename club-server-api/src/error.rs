use axum::{
    Form, Json,
    extract::rejection::FormRejection,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use club_server_domain::{ServiceError, ServiceResult};
use log::error;

pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        ApiError(e)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Unwraps a deferred form extraction. Handlers take the form as a `Result`
/// so the session is checked before the body is looked at.
pub fn form_input<T>(form: Result<Form<T>, FormRejection>) -> ServiceResult<T> {
    form.map(|Form(value)| value)
        .map_err(|e| ServiceError::Validation(e.body_text()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self.0 {
            ServiceError::Unauthorized(_) => return found("/login"),
            ServiceError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, ServiceError::InvalidCredentials.to_string())
            }
            e @ (ServiceError::DuplicateUser
            | ServiceError::DuplicateEmail
            | ServiceError::InvalidReference(_)
            | ServiceError::Validation(_)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ServiceError::Storage(msg) => {
                error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        let body = serde_json::json!({ "error": msg });
        (status, Json(body)).into_response()
    }
}
