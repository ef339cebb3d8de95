use tracing::info;
use uuid::Uuid;

use super::repo::{Period, Timeline, TimelinePatch, TimelineRequest};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    state::AppState,
    validate::{non_blank, Required},
};

pub async fn create(st: &AppState, req: TimelineRequest) -> AppResult<Record<Timeline>> {
    let mut required = Required::default();
    let title = required.take("title", non_blank(req.title));
    let description = required.take("description", non_blank(req.description));
    let from = required.take("from", non_blank(req.from));
    required.finish()?;

    let timeline = Timeline {
        title,
        description,
        timeline: Period {
            from,
            to: non_blank(req.to),
        },
    };
    let record = db::insert(st.db.as_ref(), &timeline).await?;
    info!(timeline_id = %record.id, "timeline added");
    Ok(record)
}

/// The period is stored as one nested value, so a change to either end is
/// merged with the current period before writing.
pub async fn update(st: &AppState, id: Uuid, req: TimelineRequest) -> AppResult<Record<Timeline>> {
    let from = non_blank(req.from);
    let to = non_blank(req.to);

    let timeline = if from.is_some() || to.is_some() {
        let current = get(st, id).await?.data.timeline;
        Some(Period {
            from: from.unwrap_or(current.from),
            to: to.or(current.to),
        })
    } else {
        None
    };

    let patch = TimelinePatch {
        title: non_blank(req.title),
        description: non_blank(req.description),
        timeline,
    };
    let record = db::update_by_id::<Timeline>(st.db.as_ref(), id, db::to_patch(&patch)?)
        .await?
        .ok_or(AppError::NotFound("Timeline"))?;
    info!(timeline_id = %id, "timeline updated");
    Ok(record)
}

pub async fn delete(st: &AppState, id: Uuid) -> AppResult<()> {
    if !db::delete_by_id::<Timeline>(st.db.as_ref(), id).await? {
        return Err(AppError::NotFound("Timeline"));
    }
    info!(timeline_id = %id, "timeline deleted");
    Ok(())
}

pub async fn get(st: &AppState, id: Uuid) -> AppResult<Record<Timeline>> {
    db::find_by_id::<Timeline>(st.db.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("Timeline"))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Record<Timeline>>> {
    Ok(db::find_all::<Timeline>(st.db.as_ref()).await?)
}
