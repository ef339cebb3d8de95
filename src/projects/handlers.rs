use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{dto::ProjectFields, services};
use crate::{
    app::UPLOAD_LIMIT, auth::AuthUser, error::AppResult, media::UploadForm, state::AppState,
    validate::parse_id,
};

pub fn routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/add", post(add_project))
        .route("/update/:id", put(update_project))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT));

    Router::new()
        .merge(uploads)
        .route("/delete/:id", delete(delete_project))
        .route("/getall", get(list_projects))
        .route("/get/:id", get(get_project))
}

/// POST /project/add (multipart)
/// Text fields plus a `projectBanner` file.
#[instrument(skip(state, _auth, form))]
async fn add_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut form: UploadForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let fields = ProjectFields::from_form(&mut form);
    let banner = form.take_file("projectBanner");

    let project = services::create(&state, fields, banner).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "New Project Added!",
            "project": project,
        })),
    ))
}

#[instrument(skip(state, _auth, form))]
async fn update_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    mut form: UploadForm,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let fields = ProjectFields::from_form(&mut form);
    let banner = form.take_file("projectBanner");

    let project = services::update(&state, id, fields, banner).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Project Updated!",
        "project": project,
    })))
}

#[instrument(skip(state, _auth))]
async fn delete_project(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    services::delete(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Project Deleted!" })))
}

#[instrument(skip(state))]
async fn list_projects(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let projects = services::list(&state).await?;
    Ok(Json(json!({ "success": true, "projects": projects })))
}

#[instrument(skip(state))]
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let project = services::get(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "project": project })))
}
