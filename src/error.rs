use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Every failure a handler can surface. Converted into the
/// `{ "success": false, "message": ... }` envelope at the response boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please provide all required details! Missing: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),

    #[error("{0} is required!")]
    MissingAsset(&'static str),

    #[error("Failed to upload {0} to the media store!")]
    AssetUploadFailed(String),

    #[error("{0} not found!")]
    NotFound(&'static str),

    #[error("Invalid email or password!")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthenticated(String),

    #[error("Reset password token is invalid or has been expired!")]
    InvalidOrExpiredToken,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::MissingAsset(_)
            | AppError::BadRequest(_)
            | AppError::InvalidOrExpiredToken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::AssetUploadFailed(_) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store(e) => {
                error!(error = ?e, "store error");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid form data: {}", e.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(e: MultipartRejection) -> Self {
        AppError::BadRequest(format!("Invalid form data: {}", e.body_text()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text()))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Store(e.into())
    }
}

/// Response for panics caught by `CatchPanicLayer`.
pub fn panic_response(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "message": "Internal Server Error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(e: AppError) -> (StatusCode, serde_json::Value) {
        let res = e.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_field_lists_every_name() {
        let (status, body) = body_of(AppError::MissingField(vec!["title", "stack"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let msg = body["message"].as_str().unwrap();
        assert!(msg.contains("title"));
        assert!(msg.contains("stack"));
    }

    #[tokio::test]
    async fn store_errors_hide_details() {
        let (status, body) =
            body_of(AppError::Store(anyhow::anyhow!("connection refused to 10.0.0.3"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(AppError::MissingAsset("Project Banner").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Unauthenticated("User not authenticated!".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::InvalidOrExpiredToken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Project").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::AssetUploadFailed("projectBanner".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
