use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{repo::TimelineRequest, services};
use crate::{
    auth::AuthUser, error::AppResult, extract::AppJson, state::AppState, validate::parse_id,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_timeline))
        .route("/update/:id", put(update_timeline))
        .route("/delete/:id", delete(delete_timeline))
        .route("/getall", get(list_timelines))
        .route("/get/:id", get(get_timeline))
}

#[instrument(skip(state, _auth, payload))]
async fn add_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(payload): AppJson<TimelineRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let timeline = services::create(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Timeline Added!", "timeline": timeline })),
    ))
}

#[instrument(skip(state, _auth, payload))]
async fn update_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<TimelineRequest>,
) -> AppResult<Json<Value>> {
    let timeline = services::update(&state, parse_id(&id)?, payload).await?;
    Ok(Json(json!({ "success": true, "message": "Timeline Updated!", "timeline": timeline })))
}

#[instrument(skip(state, _auth))]
async fn delete_timeline(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    services::delete(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Timeline Deleted!" })))
}

#[instrument(skip(state))]
async fn list_timelines(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let timelines = services::list(&state).await?;
    Ok(Json(json!({ "success": true, "timelines": timelines })))
}

#[instrument(skip(state))]
async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let timeline = services::get(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "timeline": timeline })))
}
