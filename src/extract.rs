use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use crate::{error::AppError, media::UploadForm};

/// `axum::Json` whose rejections go through [`AppError`], so malformed
/// bodies get the same envelope as every other error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S> FromRequest<S> for UploadForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mp = Multipart::from_request(req, state).await?;
        UploadForm::from_multipart(mp).await
    }
}
