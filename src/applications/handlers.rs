use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{repo::ApplicationFields, services};
use crate::{
    app::UPLOAD_LIMIT, auth::AuthUser, error::AppResult, media::UploadForm, state::AppState,
    validate::parse_id,
};

pub fn routes() -> Router<AppState> {
    let uploads = Router::new()
        .route("/add", post(add_application))
        .route("/update/:id", put(update_application))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT));

    Router::new()
        .merge(uploads)
        .route("/delete/:id", delete(delete_application))
        .route("/getall", get(list_applications))
        .route("/get/:id", get(get_application))
}

#[instrument(skip(state, _auth, form))]
async fn add_application(
    State(state): State<AppState>,
    _auth: AuthUser,
    mut form: UploadForm,
) -> AppResult<(StatusCode, Json<Value>)> {
    let fields = ApplicationFields::from_form(&mut form);
    let svg = form.take_file("svg");

    let application = services::create(&state, fields, svg).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "New Software Application Added!",
            "softwareApplication": application,
        })),
    ))
}

#[instrument(skip(state, _auth, form))]
async fn update_application(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
    mut form: UploadForm,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    let fields = ApplicationFields::from_form(&mut form);
    let svg = form.take_file("svg");

    let application = services::update(&state, id, fields, svg).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Software Application Updated!",
        "softwareApplication": application,
    })))
}

#[instrument(skip(state, _auth))]
async fn delete_application(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    services::delete(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Software Application Deleted!" })))
}

#[instrument(skip(state))]
async fn list_applications(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let applications = services::list(&state).await?;
    Ok(Json(json!({ "success": true, "softwareApplications": applications })))
}

#[instrument(skip(state))]
async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let application = services::get(&state, parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "softwareApplication": application })))
}
