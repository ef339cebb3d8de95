use tracing::info;
use uuid::Uuid;

use super::repo::{ApplicationFields, SoftwareApplication};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    media::{self, folders, TempUpload},
    state::AppState,
    validate::Required,
};

pub async fn create(
    st: &AppState,
    fields: ApplicationFields,
    svg: Option<TempUpload>,
) -> AppResult<Record<SoftwareApplication>> {
    let mut req = Required::default();
    let name = req.take("name", fields.name);
    req.finish()?;

    let svg = svg.ok_or(AppError::MissingAsset("Software Application Icon/Svg"))?;
    let svg = media::upload_asset(st.media.as_ref(), &svg, folders::APPLICATION_ICONS).await?;

    let record = db::insert(st.db.as_ref(), &SoftwareApplication { name, svg }).await?;
    info!(application_id = %record.id, "software application added");
    Ok(record)
}

pub async fn update(
    st: &AppState,
    id: Uuid,
    fields: ApplicationFields,
    svg: Option<TempUpload>,
) -> AppResult<Record<SoftwareApplication>> {
    let current = get(st, id).await?;
    let mut patch = db::to_patch(&fields)?;

    if let Some(svg) = media::replace_asset(
        st.media.as_ref(),
        Some(current.data.svg),
        svg.as_ref(),
        folders::APPLICATION_ICONS,
    )
    .await?
    {
        patch.insert("svg".into(), serde_json::to_value(svg)?);
    }

    let record = db::update_by_id::<SoftwareApplication>(st.db.as_ref(), id, patch)
        .await?
        .ok_or(AppError::NotFound("Software Application"))?;
    info!(application_id = %id, "software application updated");
    Ok(record)
}

/// Removes the record, then its icon. A failed icon removal is only logged.
pub async fn delete(st: &AppState, id: Uuid) -> AppResult<()> {
    let app = get(st, id).await?;
    db::delete_by_id::<SoftwareApplication>(st.db.as_ref(), app.id).await?;
    media::discard_asset(st.media.as_ref(), &app.data.svg).await;
    info!(application_id = %id, "software application deleted");
    Ok(())
}

pub async fn get(st: &AppState, id: Uuid) -> AppResult<Record<SoftwareApplication>> {
    db::find_by_id::<SoftwareApplication>(st.db.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("Software Application"))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Record<SoftwareApplication>>> {
    Ok(db::find_all::<SoftwareApplication>(st.db.as_ref()).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MediaEvent, TestApp};

    fn icon() -> TempUpload {
        TempUpload::from_bytes(b"<svg/>", "image/svg+xml").unwrap()
    }

    fn named(name: &str) -> ApplicationFields {
        ApplicationFields {
            name: Some(name.into()),
        }
    }

    #[tokio::test]
    async fn create_stores_icon_reference() {
        let app = TestApp::new();
        let created = create(&app.state, named("VS Code"), Some(icon())).await.unwrap();

        assert_eq!(created.data.name, "VS Code");
        assert!(created.data.svg.id.starts_with(folders::APPLICATION_ICONS));
        assert!(app.media.contains(&created.data.svg.id));
    }

    #[tokio::test]
    async fn create_needs_name_and_icon() {
        let app = TestApp::new();
        let err = create(&app.state, ApplicationFields::default(), Some(icon()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MissingField(ref n) if n == &vec!["name"]));

        let err = create(&app.state, named("Figma"), None).await.unwrap_err();
        assert!(matches!(err, AppError::MissingAsset(_)));

        assert_eq!(app.store.writes(), 0);
        assert!(app.media.events().is_empty());
    }

    #[tokio::test]
    async fn rename_keeps_icon() {
        let app = TestApp::new();
        let created = create(&app.state, named("Code"), Some(icon())).await.unwrap();

        let updated = update(&app.state, created.id, named("VS Code"), None).await.unwrap();

        assert_eq!(updated.data.name, "VS Code");
        assert_eq!(updated.data.svg, created.data.svg);
    }

    #[tokio::test]
    async fn new_icon_destroys_old_after_upload() {
        let app = TestApp::new();
        let created = create(&app.state, named("Code"), Some(icon())).await.unwrap();
        let old = created.data.svg.id.clone();

        let updated = update(&app.state, created.id, ApplicationFields::default(), Some(icon()))
            .await
            .unwrap();

        let events = app.media.events();
        assert!(matches!(events[1], MediaEvent::Upload { .. }));
        assert_eq!(events[2], MediaEvent::Destroy { id: old.clone() });
        assert_ne!(updated.data.svg.id, old);
        assert_eq!(updated.data.name, "Code");
    }

    #[tokio::test]
    async fn delete_removes_record_then_icon() {
        let app = TestApp::new();
        let created = create(&app.state, named("Code"), Some(icon())).await.unwrap();

        delete(&app.state, created.id).await.unwrap();

        assert!(matches!(get(&app.state, created.id).await, Err(AppError::NotFound(_))));
        assert!(!app.media.contains(&created.data.svg.id));
    }

    #[tokio::test]
    async fn delete_succeeds_when_icon_removal_fails() {
        let app = TestApp::new();
        let created = create(&app.state, named("Code"), Some(icon())).await.unwrap();
        app.media.fail_destroys(true);

        delete(&app.state, created.id).await.unwrap();

        assert!(list(&app.state).await.unwrap().is_empty());
        assert!(app.media.contains(&created.data.svg.id));
    }
}
