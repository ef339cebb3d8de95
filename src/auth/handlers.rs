use axum::{
    extract::{DefaultBodyLimit, FromRef, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        ForgotPasswordRequest, LoginRequest, RegisterFields, ResetPasswordRequest,
        UpdatePasswordRequest,
    },
    extractors::{AuthUser, TOKEN_COOKIE},
    jwt::JwtKeys,
    repo::PublicUser,
    services,
};
use crate::{
    app::UPLOAD_LIMIT, error::AppResult, extract::AppJson, media::UploadForm, state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/register", post(register))
        .route("/update/me", put(update_profile))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT));

    Router::new()
        .merge(uploads)
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/me", get(get_me))
        .route("/me/portfolio", get(get_portfolio))
        .route("/update/password", put(update_password))
        .route("/password/forgot", post(forgot_password))
        .route("/password/reset/:token", put(reset_password))
}

fn session_cookie(token: String, days: i64) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::days(days))
        .build()
}

fn start_session(state: &AppState, cookies: &Cookies, user_id: Uuid) -> AppResult<String> {
    let token = JwtKeys::from_ref(state).sign(user_id)?;
    cookies.add(session_cookie(token.clone(), state.config.cookie_ttl_days));
    Ok(token)
}

#[instrument(skip(state, cookies, form))]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    mut form: UploadForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let fields = RegisterFields::from_form(&mut form);
    let avatar = form.take_file("avatar");
    let resume = form.take_file("resume");

    let user = services::register(&state, fields, avatar, resume).await?;
    let token = start_session(&state, &cookies, user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "User Registered!",
            "user": PublicUser::from(user),
            "token": token,
        })),
    ))
}

#[instrument(skip(state, cookies, payload))]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<Value>> {
    let (user, token) = services::login(&state, payload.email, payload.password).await?;
    cookies.add(session_cookie(token.clone(), state.config.cookie_ttl_days));

    Ok(Json(json!({
        "success": true,
        "message": "Logged In!",
        "user": PublicUser::from(user),
        "token": token,
    })))
}

#[instrument(skip_all)]
pub async fn logout(_user: AuthUser, cookies: Cookies) -> Json<Value> {
    cookies.remove(Cookie::build((TOKEN_COOKIE, "")).path("/").build());
    Json(json!({ "success": true, "message": "Logged Out!" }))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "user": PublicUser::from(user) }))
}

#[instrument(skip(state))]
pub async fn get_portfolio(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let user = services::portfolio_owner(&state).await?;
    Ok(Json(json!({ "success": true, "user": PublicUser::from(user) })))
}

#[instrument(skip(state, user, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    form: UploadForm,
) -> AppResult<Json<Value>> {
    let user = services::update_profile(&state, user, form).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Profile Updated!",
        "user": PublicUser::from(user),
    })))
}

#[instrument(skip(state, user, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<UpdatePasswordRequest>,
) -> AppResult<Json<Value>> {
    services::update_password(
        &state,
        &user,
        payload.current_password,
        payload.new_password,
        payload.confirm_new_password,
    )
    .await?;
    Ok(Json(json!({ "success": true, "message": "Password Updated!" })))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> AppResult<Json<Value>> {
    let email = services::forgot_password(&state, payload.email, OffsetDateTime::now_utc()).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Email sent to {} successfully!", email),
    })))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(token): Path<String>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<Value>> {
    let user = services::reset_password(
        &state,
        &token,
        payload.password,
        payload.confirm_password,
        OffsetDateTime::now_utc(),
    )
    .await?;
    let session = start_session(&state, &cookies, user.id)?;

    Ok(Json(json!({
        "success": true,
        "message": "Password Reset Successfully!",
        "user": PublicUser::from(user),
        "token": session,
    })))
}
