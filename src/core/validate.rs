//! Client-side form checks. A failing check means no request is sent.

use std::fmt;

use crate::api::{ChangePasswordRequest, LoginRequest, RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingCredentials,
    MissingFields,
    /// Change-password form with an empty field.
    MissingPasswordFields,
    PasswordMismatch,
    NewPasswordMismatch,
    PasswordTooShort,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingCredentials => {
                write!(f, "Please enter both email and password.")
            }
            ValidationError::MissingFields => write!(f, "Please fill all fields."),
            ValidationError::MissingPasswordFields => write!(f, "All fields are required."),
            ValidationError::PasswordMismatch => write!(f, "Passwords do not match."),
            ValidationError::NewPasswordMismatch => write!(f, "New passwords do not match."),
            ValidationError::PasswordTooShort => write!(
                f,
                "New password must be at least {MIN_PASSWORD_LEN} characters long."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

pub fn login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    if blank(email) || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn register(form: &RegisterForm) -> Result<RegisterRequest, ValidationError> {
    if blank(&form.name)
        || blank(&form.email)
        || blank(&form.phone)
        || form.password.is_empty()
        || form.confirm_password.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(RegisterRequest {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        password: form.password.clone(),
    })
}

pub fn change_password(form: &ChangePasswordForm) -> Result<ChangePasswordRequest, ValidationError> {
    if form.old_password.is_empty() || form.new_password.is_empty() || form.confirm_password.is_empty()
    {
        return Err(ValidationError::MissingPasswordFields);
    }
    if form.new_password != form.confirm_password {
        return Err(ValidationError::NewPasswordMismatch);
    }
    if form.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(ChangePasswordRequest {
        old_password: form.old_password.clone(),
        new_password: form.new_password.clone(),
    })
}

/// A blank query means "show the whole catalog".
pub fn search_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
