//! Submitted form payloads and their validation. A failed validation
//! never persists anything; the handler redisplays the originating
//! form context with the errors collected here.

use std::collections::BTreeMap;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::post::POST_TEXT_MAX_CHARS;

/// Field name to messages, in stable field order for rendering.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// The post create/edit form. Multipart because of the optional image.
#[derive(MultipartForm)]
pub struct PostUpload {
    pub text: Option<Text<String>>,
    pub group: Option<Text<String>>,
    pub image: Option<TempFile>,
}

/// Post form values as redisplayed on validation failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostFormValues {
    pub text: String,
    pub group: Option<Uuid>,
}

/// Checks text bounds and the shape of the group choice. Group
/// existence is checked by the handler against the store.
pub fn validate_post_form(
    text: Option<&str>,
    group: Option<&str>,
) -> (PostFormValues, FieldErrors) {
    let mut errors = FieldErrors::default();

    let text = text.unwrap_or_default().to_string();
    if text.trim().is_empty() {
        errors.add("text", "this field is required");
    } else if text.chars().count() > POST_TEXT_MAX_CHARS {
        errors.add(
            "text",
            format!("ensure the text has at most {POST_TEXT_MAX_CHARS} characters"),
        );
    }

    let group = match group.map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add("group", "select a valid group");
                None
            }
        },
    };

    (PostFormValues { text, group }, errors)
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

pub fn validate_comment(text: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if text.trim().is_empty() {
        errors.add("text", "this field is required");
    }
    errors
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub fn validate_signup(form: &SignupForm) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if form.username.is_empty() {
        errors.add("username", "this field is required");
    } else if form.username.len() > 150
        || !form
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        errors.add("username", "letters, digits and _ - . only, 150 max");
    }

    if !form.email.contains('@') {
        errors.add("email", "enter a valid email address");
    }

    if form.password.len() < 8 {
        errors.add("password", "password must be at least 8 characters");
    }

    errors
}

/// Restricts a login `next` target to local paths so the redirect can
/// never leave the site.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_text_is_required_and_bounded() {
        let (_, errors) = validate_post_form(Some("   "), None);
        assert!(errors.field("text").is_some());

        let long = "x".repeat(POST_TEXT_MAX_CHARS + 1);
        let (_, errors) = validate_post_form(Some(&long), None);
        assert!(errors.field("text").is_some());

        let max = "x".repeat(POST_TEXT_MAX_CHARS);
        let (values, errors) = validate_post_form(Some(&max), None);
        assert!(errors.is_empty());
        assert_eq!(values.text.chars().count(), POST_TEXT_MAX_CHARS);
    }

    #[test]
    fn group_choice_must_be_a_uuid() {
        let (values, errors) = validate_post_form(Some("hi"), Some("not-a-uuid"));
        assert!(errors.field("group").is_some());
        assert_eq!(values.group, None);

        let id = Uuid::new_v4();
        let (values, errors) = validate_post_form(Some("hi"), Some(&id.to_string()));
        assert!(errors.is_empty());
        assert_eq!(values.group, Some(id));

        // empty select submits an empty string
        let (values, errors) = validate_post_form(Some("hi"), Some(""));
        assert!(errors.is_empty());
        assert_eq!(values.group, None);
    }

    #[test]
    fn signup_rules() {
        let ok = SignupForm {
            username: "alice_1".into(),
            email: "alice@example.com".into(),
            password: "longenough".into(),
        };
        assert!(validate_signup(&ok).is_empty());

        let bad = SignupForm {
            username: "al ice".into(),
            email: "nope".into(),
            password: "short".into(),
        };
        let errors = validate_signup(&bad);
        assert!(errors.field("username").is_some());
        assert!(errors.field("email").is_some());
        assert!(errors.field("password").is_some());
    }

    #[test]
    fn next_target_stays_local() {
        assert_eq!(sanitize_next(Some("/new/")), "/new/");
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(None), "/");
    }
}
