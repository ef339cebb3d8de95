use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{repo::MessageFields, services};
use crate::{
    auth::AuthUser, error::AppResult, extract::AppJson, state::AppState, validate::parse_id,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/send", post(send_message))
        .route("/getall", get(list_messages))
        .route("/get/:id", get(get_message))
        .route("/update/:id", put(update_message))
        .route("/delete/:id", delete(delete_message))
}

/// POST /message/send
/// Public contact form.
#[instrument(skip(state, payload))]
async fn send_message(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MessageFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let message = services::send(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Message Sent!", "data": message })),
    ))
}

#[instrument(skip(state, _auth))]
async fn list_messages(State(state): State<AppState>, _auth: AuthUser) -> AppResult<Json<Value>> {
    let messages = services::list(&state).await?;
    Ok(Json(json!({ "success": true, "messages": messages })))
}

#[instrument(skip(state, _auth))]
async fn get_message(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let message = services::get(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "data": message })))
}

#[instrument(skip(state, _auth, payload))]
async fn update_message(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<MessageFields>,
) -> AppResult<Json<Value>> {
    let message = services::update(&state, parse_id(&id)?, payload).await?;
    Ok(Json(json!({ "success": true, "message": "Message Updated!", "data": message })))
}

#[instrument(skip(state, _auth))]
async fn delete_message(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    services::delete(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Message Deleted!" })))
}
