use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    db::{self, Document, DocumentStore, Record},
    storage::AssetRef,
};

/// Optional social profile links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(rename = "githubURL", default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(rename = "instagramURL", default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(rename = "linkedInURL", default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(rename = "facebookURL", default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(rename = "twitterURL", default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Portfolio owner as stored. Never serialized into a response; see
/// [`PublicUser`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password_hash: String, // Argon2 hash
    pub avatar: AssetRef,
    pub resume: AssetRef,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: String,
    #[serde(flatten)]
    pub socials: SocialLinks,
    #[serde(default)]
    pub reset_password_token: Option<String>, // sha256 of the emailed token
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub reset_password_expire: Option<OffsetDateTime>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";
}

pub const RESET_TOKEN_FIELD: &str = "resetPasswordToken";

/// What clients get to see of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub avatar: AssetRef,
    pub resume: AssetRef,
    #[serde(rename = "portfolioURL")]
    pub portfolio_url: String,
    #[serde(flatten)]
    pub socials: SocialLinks,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Record<User>> for PublicUser {
    fn from(r: Record<User>) -> Self {
        Self {
            id: r.id,
            full_name: r.data.full_name,
            email: r.data.email,
            phone: r.data.phone,
            about_me: r.data.about_me,
            avatar: r.data.avatar,
            resume: r.data.resume,
            portfolio_url: r.data.portfolio_url,
            socials: r.data.socials,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl User {
    pub async fn find_by_email(
        db: &dyn DocumentStore,
        email: &str,
    ) -> anyhow::Result<Option<Record<User>>> {
        db::find_one_by::<User>(db, "email", email).await
    }

    pub async fn find_by_reset_hash(
        db: &dyn DocumentStore,
        hash: &str,
    ) -> anyhow::Result<Option<Record<User>>> {
        db::find_one_by::<User>(db, RESET_TOKEN_FIELD, hash).await
    }

    /// The portfolio belongs to whoever registered first.
    pub async fn owner(db: &dyn DocumentStore) -> anyhow::Result<Option<Record<User>>> {
        Ok(db::find_all::<User>(db).await?.into_iter().next())
    }
}
