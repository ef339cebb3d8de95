use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{repo::SkillFields, services};
use crate::{
    auth::AuthUser, error::AppResult, extract::AppJson, state::AppState, validate::parse_id,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(add_skill))
        .route("/update/:id", put(update_skill))
        .route("/delete/:id", delete(delete_skill))
        .route("/getall", get(list_skills))
        .route("/get/:id", get(get_skill))
}

#[instrument(skip(state, _auth, payload))]
async fn add_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppJson(payload): AppJson<SkillFields>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let skill = services::create(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "New Skill Added!", "skill": skill })),
    ))
}

#[instrument(skip(state, _auth, payload))]
async fn update_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    AppJson(payload): AppJson<SkillFields>,
) -> AppResult<Json<Value>> {
    let skill = services::update(&state, parse_id(&id)?, payload).await?;
    Ok(Json(json!({ "success": true, "message": "Skill Updated!", "skill": skill })))
}

#[instrument(skip(state, _auth))]
async fn delete_skill(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    services::delete(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Skill Deleted!" })))
}

#[instrument(skip(state))]
async fn list_skills(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let skills = services::list(&state).await?;
    Ok(Json(json!({ "success": true, "skills": skills })))
}

#[instrument(skip(state))]
async fn get_skill(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let skill = services::get(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "skill": skill })))
}
