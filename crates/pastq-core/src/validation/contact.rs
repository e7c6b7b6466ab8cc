//! Contact-form validation.
//!
//! Errors are collected, not short-circuited, so the caller can report every
//! problem in one message.

use std::sync::OnceLock;

use regex::Regex;

pub const MIN_MESSAGE_LENGTH: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_re().is_match(email)
}

/// Validate a contact form submission. Returns every failed rule.
pub fn validate_contact(form: &ContactForm) -> Result<(), Vec<String>> {
    let name = form.name.trim();
    let email = form.email.trim();
    let subject = form.subject.trim();
    let message = form.message.trim();

    let mut errors = Vec::new();

    if name.is_empty() {
        errors.push("Name is required.".to_string());
    }
    if email.is_empty() {
        errors.push("Email is required.".to_string());
    } else if !is_valid_email(email) {
        errors.push("Please enter a valid email address.".to_string());
    }
    if subject.is_empty() {
        errors.push("Subject is required.".to_string());
    }
    if message.len() < MIN_MESSAGE_LENGTH {
        errors.push(format!(
            "Message must be at least {} characters.",
            MIN_MESSAGE_LENGTH
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Moot court".to_string(),
            message: "When is the next session?".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_contact(&valid_form()).is_ok());
    }

    #[test]
    fn test_errors_are_collected() {
        let form = ContactForm::default();
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("Name"));
        assert!(errors[1].contains("Email"));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));

        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors, vec!["Please enter a valid email address.".to_string()]);
    }

    #[test]
    fn test_short_message_rejected() {
        let mut form = valid_form();
        form.message = "too short".to_string();
        let errors = validate_contact(&form).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("at least 10"));
    }
}
