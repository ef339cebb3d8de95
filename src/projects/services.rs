use tracing::info;
use uuid::Uuid;

use super::{dto::ProjectFields, repo::Project};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    media::{self, folders, TempUpload},
    state::AppState,
    validate::Required,
};

pub async fn create(
    st: &AppState,
    fields: ProjectFields,
    banner: Option<TempUpload>,
) -> AppResult<Record<Project>> {
    let mut req = Required::default();
    let title = req.take("title", fields.title);
    let description = req.take("description", fields.description);
    let git_repo_link = req.take("gitRepoLink", fields.git_repo_link);
    let project_link = req.take("projectLink", fields.project_link);
    let technologies = req.take("technologies", fields.technologies);
    let stack = req.take("stack", fields.stack);
    let deployed = req.take("deployed", fields.deployed);
    req.finish()?;

    let banner = banner.ok_or(AppError::MissingAsset("Project Banner"))?;
    let project_banner =
        media::upload_asset(st.media.as_ref(), &banner, folders::PROJECT_BANNERS).await?;

    // a failed insert from here on orphans `project_banner`
    let project = Project {
        title,
        description,
        git_repo_link,
        project_link,
        technologies,
        stack,
        deployed,
        project_banner,
    };
    let record = db::insert(st.db.as_ref(), &project).await?;
    info!(project_id = %record.id, "project created");
    Ok(record)
}

pub async fn update(
    st: &AppState,
    id: Uuid,
    fields: ProjectFields,
    banner: Option<TempUpload>,
) -> AppResult<Record<Project>> {
    let current = get(st, id).await?;
    let mut patch = db::to_patch(&fields)?;

    let banner = media::replace_asset(
        st.media.as_ref(),
        Some(current.data.project_banner),
        banner.as_ref(),
        folders::PROJECT_BANNERS,
    )
    .await?;
    if let Some(banner) = banner {
        patch.insert("projectBanner".into(), serde_json::to_value(banner)?);
    }

    let record = db::update_by_id::<Project>(st.db.as_ref(), id, patch)
        .await?
        .ok_or(AppError::NotFound("Project"))?;
    info!(project_id = %id, "project updated");
    Ok(record)
}

/// Removes the project record only. The banner stays in the media store.
pub async fn delete(st: &AppState, id: Uuid) -> AppResult<()> {
    let project = get(st, id).await?;
    db::delete_by_id::<Project>(st.db.as_ref(), project.id).await?;
    info!(project_id = %id, banner_id = %project.data.project_banner.id, "project deleted");
    Ok(())
}

pub async fn get(st: &AppState, id: Uuid) -> AppResult<Record<Project>> {
    db::find_by_id::<Project>(st.db.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("Project"))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Record<Project>>> {
    Ok(db::find_all::<Project>(st.db.as_ref()).await?)
}
