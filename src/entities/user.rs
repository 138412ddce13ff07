use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{not_blank, PHONE_RE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(
        custom(function = "not_blank", message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(
        custom(function = "not_blank", message = "Phone number is required"),
        regex(path = *PHONE_RE, message = "Phone number must be 10 digits")
    )]
    pub phone: String,
    #[validate(
        custom(function = "not_blank", message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

/// Google identity token handed over by the sign-in widget.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GoogleLoginRequest {
    #[validate(custom(function = "not_blank", message = "Google credential is required"))]
    pub credential: String,
}

/// What the console reports about the current upstream session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub role: Option<SessionRole>,
}
