use lifecycle::account::Registration;
use serde::{Deserialize, Serialize};

use super::user::ProfileResponse;
use crate::error::AppError;

/// Request body for signing up (also used to create admins).
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignUpRequest {
    /// Unique username (1-50 chars, letters and digits).
    #[schema(example = "ada")]
    pub username: String,
    /// Password (at least 6 characters).
    #[schema(example = "s3cret!")]
    pub password: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
    /// Unique e-mail address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub linked_in: String,
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub web_link: String,
    #[serde(default)]
    pub organisation: String,
}

impl From<SignUpRequest> for Registration {
    fn from(req: SignUpRequest) -> Self {
        Registration {
            username: req.username.trim().to_string(),
            password: req.password,
            full_name: req.full_name,
            email: req.email.trim().to_string(),
            linked_in: req.linked_in,
            github: req.github,
            web_link: req.web_link,
            organisation: req.organisation,
        }
    }
}

/// Request body for user login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "s3cret!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.username.trim().is_empty() {
        return Err(AppError::Validation("Username must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: ProfileResponse,
}
