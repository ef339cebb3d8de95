use serde_json::{json, Map, Value};
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{
    dto::{ProfilePatch, RegisterFields},
    jwt::JwtKeys,
    password::{hash_off_thread, verify_off_thread},
    repo::{User, RESET_TOKEN_FIELD},
    reset::{hash_token, is_live, ResetToken},
};
use crate::{
    db::{self, Record},
    error::{AppError, AppResult},
    media::{self, folders, TempUpload, UploadForm},
    state::AppState,
    validate::{is_valid_email, Required},
};

pub const MIN_PASSWORD_LEN: usize = 8;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_password_len(password: &str) -> AppResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must contain at least {} characters!",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn password_patch(hash: String) -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert("passwordHash".into(), Value::String(hash));
    patch
}

fn clear_reset_patch() -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert(RESET_TOKEN_FIELD.into(), Value::Null);
    patch.insert("resetPasswordExpire".into(), Value::Null);
    patch
}

/// Creates the portfolio owner. The password is hashed here, before the
/// record is built; the plaintext goes no further.
pub async fn register(
    st: &AppState,
    fields: RegisterFields,
    avatar: Option<TempUpload>,
    resume: Option<TempUpload>,
) -> AppResult<Record<User>> {
    let mut req = Required::default();
    let full_name = req.take("fullName", fields.full_name);
    let email = normalize_email(&req.take("email", fields.email));
    let phone = req.take("phone", fields.phone);
    let about_me = req.take("aboutMe", fields.about_me);
    let password = req.take("password", fields.password);
    let portfolio_url = req.take("portfolioURL", fields.portfolio_url);
    req.finish()?;

    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    check_password_len(&password)?;
    let avatar = avatar.ok_or(AppError::MissingAsset("Avatar"))?;
    let resume = resume.ok_or(AppError::MissingAsset("Resume"))?;

    if User::find_by_email(st.db.as_ref(), &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_off_thread(password).await?;

    let avatar = media::upload_asset(st.media.as_ref(), &avatar, folders::AVATARS).await?;
    let resume = match media::upload_asset(st.media.as_ref(), &resume, folders::RESUMES).await {
        Ok(r) => r,
        Err(e) => {
            media::discard_asset(st.media.as_ref(), &avatar).await;
            return Err(e);
        }
    };

    let user = User {
        full_name,
        email,
        phone,
        about_me,
        password_hash,
        avatar,
        resume,
        portfolio_url,
        socials: fields.socials,
        reset_password_token: None,
        reset_password_expire: None,
    };
    let record = db::insert(st.db.as_ref(), &user).await?;
    info!(user_id = %record.id, "user registered");
    Ok(record)
}

/// Checks credentials and issues a session token. Never writes.
pub async fn login(
    st: &AppState,
    email: Option<String>,
    password: Option<String>,
) -> AppResult<(Record<User>, String)> {
    let mut req = Required::default();
    let email = normalize_email(&req.take("email", email));
    let password = req.take("password", password);
    req.finish()?;

    let Some(user) = User::find_by_email(st.db.as_ref(), &email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_off_thread(password, user.data.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = JwtKeys::from(&st.config.jwt).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok((user, token))
}

/// Issues a reset token for `email` and mails the raw token as a link.
/// Only the token's hash is stored; a new request replaces the previous one.
pub async fn forgot_password(
    st: &AppState,
    email: Option<String>,
    now: OffsetDateTime,
) -> AppResult<String> {
    let mut req = Required::default();
    let email = normalize_email(&req.take("email", email));
    req.finish()?;

    let user = User::find_by_email(st.db.as_ref(), &email)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let token = ResetToken::issue(now);
    let mut patch = Map::new();
    patch.insert(RESET_TOKEN_FIELD.into(), Value::String(token.hash.clone()));
    patch.insert("resetPasswordExpire".into(), json_time(token.expires_at)?);
    db::update_by_id::<User>(st.db.as_ref(), user.id, patch)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let base = st.config.dashboard_url.as_deref().unwrap_or("");
    let link = format!("{}/password/reset/{}", base.trim_end_matches('/'), token.raw);
    let body = format!(
        "Your reset password token is:\n\n{}\n\nIf you've not requested it, please ignore it.",
        link
    );

    if let Err(e) = st
        .mailer
        .send(&user.data.email, "Personal Portfolio Dashboard Password Recovery", &body)
        .await
    {
        error!(error = ?e, user_id = %user.id, "reset email failed");
        db::update_by_id::<User>(st.db.as_ref(), user.id, clear_reset_patch()).await?;
        return Err(AppError::Store(e.context("send reset email")));
    }

    info!(user_id = %user.id, "password reset requested");
    Ok(user.data.email)
}

fn json_time(t: OffsetDateTime) -> anyhow::Result<Value> {
    Ok(json!(t.format(&time::format_description::well_known::Rfc3339)?))
}

/// Consumes a reset token: valid only if its hash is on file and not yet
/// expired at `now`.
pub async fn reset_password(
    st: &AppState,
    raw_token: &str,
    password: Option<String>,
    confirm: Option<String>,
    now: OffsetDateTime,
) -> AppResult<Record<User>> {
    let user = User::find_by_reset_hash(st.db.as_ref(), &hash_token(raw_token))
        .await?
        .filter(|u| {
            u.data
                .reset_password_expire
                .map_or(false, |exp| is_live(exp, now))
        })
        .ok_or(AppError::InvalidOrExpiredToken)?;

    let mut req = Required::default();
    let password = req.take("password", password);
    let confirm = req.take("confirmPassword", confirm);
    req.finish()?;

    if password != confirm {
        return Err(AppError::BadRequest(
            "Password & Confirm Password do not match".into(),
        ));
    }
    check_password_len(&password)?;

    let mut patch = password_patch(hash_off_thread(password).await?);
    patch.extend(clear_reset_patch());
    let user = db::update_by_id::<User>(st.db.as_ref(), user.id, patch)
        .await?
        .ok_or(AppError::InvalidOrExpiredToken)?;

    info!(user_id = %user.id, "password reset");
    Ok(user)
}

pub async fn update_password(
    st: &AppState,
    user: &Record<User>,
    current: Option<String>,
    new: Option<String>,
    confirm: Option<String>,
) -> AppResult<()> {
    let mut req = Required::default();
    let current = req.take("currentPassword", current);
    let new = req.take("newPassword", new);
    let confirm = req.take("confirmNewPassword", confirm);
    req.finish()?;

    if !verify_off_thread(current, user.data.password_hash.clone()).await? {
        warn!(user_id = %user.id, "update password with wrong current password");
        return Err(AppError::InvalidCredentials);
    }
    if new != confirm {
        return Err(AppError::BadRequest(
            "New password and confirm new password do not match!".into(),
        ));
    }
    check_password_len(&new)?;

    let patch = password_patch(hash_off_thread(new).await?);
    db::update_by_id::<User>(st.db.as_ref(), user.id, patch)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id = %user.id, "password updated");
    Ok(())
}

/// Partially updates the profile. New avatar and resume files are uploaded
/// before anything is written; the replaced assets are destroyed only once
/// the record points at the new ones.
pub async fn update_profile(
    st: &AppState,
    user: Record<User>,
    mut form: UploadForm,
) -> AppResult<Record<User>> {
    let mut patch = ProfilePatch::from_form(&mut form);
    patch.email = patch.email.map(|e| normalize_email(&e));
    if let Some(email) = &patch.email {
        if !is_valid_email(email) {
            return Err(AppError::BadRequest("Invalid email".into()));
        }
        if let Some(other) = User::find_by_email(st.db.as_ref(), email).await? {
            if other.id != user.id {
                warn!(user_id = %user.id, "email taken by another user");
                return Err(AppError::Conflict("Email already registered".into()));
            }
        }
    }
    let mut patch = db::to_patch(&patch)?;

    let avatar = match form.take_file("avatar") {
        Some(file) => Some(media::upload_asset(st.media.as_ref(), &file, folders::AVATARS).await?),
        None => None,
    };
    let resume = match form.take_file("resume") {
        Some(file) => match media::upload_asset(st.media.as_ref(), &file, folders::RESUMES).await {
            Ok(asset) => Some(asset),
            Err(e) => {
                if let Some(avatar) = &avatar {
                    media::discard_asset(st.media.as_ref(), avatar).await;
                }
                return Err(e);
            }
        },
        None => None,
    };

    if let Some(asset) = &avatar {
        patch.insert("avatar".into(), serde_json::to_value(asset)?);
    }
    if let Some(asset) = &resume {
        patch.insert("resume".into(), serde_json::to_value(asset)?);
    }

    let updated = match db::update_by_id::<User>(st.db.as_ref(), user.id, patch).await {
        Ok(Some(updated)) => updated,
        failed => {
            for asset in avatar.iter().chain(resume.iter()) {
                media::discard_asset(st.media.as_ref(), asset).await;
            }
            return Err(match failed {
                Err(e) => AppError::Store(e),
                _ => AppError::NotFound("User"),
            });
        }
    };

    if avatar.is_some() {
        media::discard_asset(st.media.as_ref(), &user.data.avatar).await;
    }
    if resume.is_some() {
        media::discard_asset(st.media.as_ref(), &user.data.resume).await;
    }

    info!(user_id = %updated.id, "profile updated");
    Ok(updated)
}

pub async fn portfolio_owner(st: &AppState) -> AppResult<Record<User>> {
    User::owner(st.db.as_ref())
        .await?
        .ok_or(AppError::NotFound("User"))
}
