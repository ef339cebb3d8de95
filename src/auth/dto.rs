use serde::{Deserialize, Serialize};

use super::repo::SocialLinks;
use crate::media::UploadForm;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

/// Text part of the registration form.
#[derive(Debug, Default)]
pub struct RegisterFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub about_me: Option<String>,
    pub password: Option<String>,
    pub portfolio_url: Option<String>,
    pub socials: SocialLinks,
}

impl RegisterFields {
    pub fn from_form(form: &mut UploadForm) -> Self {
        Self {
            full_name: form.take_text("fullName"),
            email: form.take_text("email"),
            phone: form.take_text("phone"),
            about_me: form.take_text("aboutMe"),
            password: form.take_text("password"),
            portfolio_url: form.take_text("portfolioURL"),
            socials: socials_from_form(form),
        }
    }
}

/// Profile fields a user may change; absent fields are left alone.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(rename = "portfolioURL", skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(flatten)]
    pub socials: SocialLinks,
}

impl ProfilePatch {
    pub fn from_form(form: &mut UploadForm) -> Self {
        Self {
            full_name: form.take_text("fullName"),
            email: form.take_text("email").map(|e| e.to_lowercase()),
            phone: form.take_text("phone"),
            about_me: form.take_text("aboutMe"),
            portfolio_url: form.take_text("portfolioURL"),
            socials: socials_from_form(form),
        }
    }
}

fn socials_from_form(form: &mut UploadForm) -> SocialLinks {
    SocialLinks {
        github: form.take_text("githubURL"),
        instagram: form.take_text("instagramURL"),
        linkedin: form.take_text("linkedInURL"),
        facebook: form.take_text("facebookURL"),
        twitter: form.take_text("twitterURL"),
    }
}
