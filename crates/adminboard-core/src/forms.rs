//! Input validation for login and user forms

use regex::Regex;
use std::sync::OnceLock;

use adminboard_api::UserDraft;

use crate::error::{CoreError, FieldError};
use crate::Result;

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"))
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn finish(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(errors))
    }
}

pub fn validate_login(username: &str, password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if blank(username) {
        errors.push(FieldError {
            field: "username",
            message: "Username is required",
        });
    }

    if password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "Password is required",
        });
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 6 characters",
        });
    }

    finish(errors)
}

/// Rules shared by the user editor and the profile editor
pub fn validate_user(draft: &UserDraft) -> Result<()> {
    let mut errors = Vec::new();

    let required = [
        ("firstName", draft.first_name.as_str(), "First name is required"),
        ("lastName", draft.last_name.as_str(), "Last name is required"),
    ];
    for (field, value, message) in required {
        if blank(value) {
            errors.push(FieldError { field, message });
        }
    }

    if blank(&draft.email) {
        errors.push(FieldError {
            field: "email",
            message: "Email is required",
        });
    } else if !email_pattern().is_match(draft.email.trim()) {
        errors.push(FieldError {
            field: "email",
            message: "Enter a valid email",
        });
    }

    if blank(&draft.phone) {
        errors.push(FieldError {
            field: "phone",
            message: "Phone number is required",
        });
    } else if !phone_pattern().is_match(draft.phone.trim()) {
        errors.push(FieldError {
            field: "phone",
            message: "Phone number must be 10 digits",
        });
    }

    let required = [
        ("address.address", draft.address.address.as_str(), "Address is required"),
        ("address.city", draft.address.city.as_str(), "City is required"),
        ("gender", draft.gender.as_str(), "Gender is required"),
    ];
    for (field, value, message) in required {
        if blank(value) {
            errors.push(FieldError { field, message });
        }
    }

    finish(errors)
}
