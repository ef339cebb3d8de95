use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tower_cookies::Cookies;
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys, repo::User};
use crate::{
    db::{self, Record},
    error::AppError,
    state::AppState,
};

pub const TOKEN_COOKIE: &str = "token";

/// The signed-in user. Reads the session token from the `token` cookie or an
/// `Authorization: Bearer` header, verifies it and loads the user it names.
/// A cookie that fails verification does not hide a valid header token.
pub struct AuthUser(pub Record<User>);

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer ").or_else(|| h.strip_prefix("bearer ")))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let from_cookie = Cookies::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|c| c.get(TOKEN_COOKIE).map(|c| c.value().to_string()))
            .filter(|v| !v.is_empty());
        let from_header = bearer_token(parts);

        if from_cookie.is_none() && from_header.is_none() {
            return Err(AppError::Unauthenticated("User not authenticated!".into()));
        }

        let keys = JwtKeys::from_ref(state);
        let claims: Claims = [from_cookie, from_header]
            .into_iter()
            .flatten()
            .find_map(|token| keys.verify(&token).ok())
            .ok_or_else(|| {
                warn!("invalid or expired token");
                AppError::Unauthenticated("Invalid or expired token".into())
            })?;

        let user = db::find_by_id::<User>(state.db.as_ref(), claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %claims.sub, "token for unknown user");
                AppError::Unauthenticated("User not found".into())
            })?;

        Ok(AuthUser(user))
    }
}
