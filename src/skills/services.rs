use tracing::info;
use uuid::Uuid;

use super::repo::{Skill, SkillFields};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    state::AppState,
    validate::{non_blank, Required},
};

pub async fn create(st: &AppState, fields: SkillFields) -> AppResult<Record<Skill>> {
    let mut req = Required::default();
    let title = req.take("title", non_blank(fields.title));
    let proficiency = req.take("proficiency", non_blank(fields.proficiency));
    req.finish()?;

    let record = db::insert(st.db.as_ref(), &Skill { title, proficiency }).await?;
    info!(skill_id = %record.id, "skill added");
    Ok(record)
}

pub async fn update(st: &AppState, id: Uuid, fields: SkillFields) -> AppResult<Record<Skill>> {
    let fields = SkillFields {
        title: non_blank(fields.title),
        proficiency: non_blank(fields.proficiency),
    };
    let record = db::update_by_id::<Skill>(st.db.as_ref(), id, db::to_patch(&fields)?)
        .await?
        .ok_or(AppError::NotFound("Skill"))?;
    info!(skill_id = %id, "skill updated");
    Ok(record)
}

pub async fn delete(st: &AppState, id: Uuid) -> AppResult<()> {
    if !db::delete_by_id::<Skill>(st.db.as_ref(), id).await? {
        return Err(AppError::NotFound("Skill"));
    }
    info!(skill_id = %id, "skill deleted");
    Ok(())
}

pub async fn get(st: &AppState, id: Uuid) -> AppResult<Record<Skill>> {
    db::find_by_id::<Skill>(st.db.as_ref(), id)
        .await?
        .ok_or(AppError::NotFound("Skill"))
}

pub async fn list(st: &AppState) -> AppResult<Vec<Record<Skill>>> {
    Ok(db::find_all::<Skill>(st.db.as_ref()).await?)
}
