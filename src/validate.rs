use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Collects required values, remembering every one that is missing so the
/// caller can report them all at once.
#[derive(Debug, Default)]
pub struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub fn take(&mut self, name: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) => v,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingField(self.missing))
        }
    }
}

/// Trims a submitted value; blank counts as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_all_missing_names_in_order() {
        let mut req = Required::default();
        let title = req.take("title", Some("X".into()));
        req.take("description", None);
        req.take("stack", None);
        assert_eq!(title, "X");
        match req.finish() {
            Err(AppError::MissingField(names)) => assert_eq!(names, vec!["description", "stack"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn nothing_missing_is_ok() {
        let mut req = Required::default();
        req.take("title", Some("X".into()));
        assert!(req.finish().is_ok());
    }

    #[test]
    fn ids_must_be_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("507f1f77bcf86cd799439011"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn blank_values_count_as_absent() {
        assert_eq!(non_blank(Some("  Rust ".into())), Some("Rust".into()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("me@example.com"));
        assert!(!is_valid_email("me@example"));
        assert!(!is_valid_email("not an email"));
    }
}
