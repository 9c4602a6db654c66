use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::DisplayNameError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::IdError;
use crate::domain::auth::models::DisplayName;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::RoleId;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    name: String,
    email: String,
    password: String,
    role_id: Option<String>,
    city: Option<String>,
}

const PASSWORD_MIN_LENGTH: usize = 6;
const PASSWORD_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role id: {0}")]
    RoleId(#[from] IdError),

    #[error("Password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ParseRegisterRequestError> {
        let name = DisplayName::new(self.name)?;
        let email = EmailAddress::new(self.email)?;

        let length = self.password.chars().count();
        if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&length) {
            return Err(ParseRegisterRequestError::PasswordLength {
                min: PASSWORD_MIN_LENGTH,
                max: PASSWORD_MAX_LENGTH,
            });
        }

        let role_id = self
            .role_id
            .map(|raw| RoleId::from_string(&raw))
            .transpose()?;

        Ok(RegisterCommand {
            name,
            email,
            password: self.password,
            role_id,
            city: self.city,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Created user identity. Deliberately contains no credential material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterResponseData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub total_hours: i64,
    pub rating: f64,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role_id: user.role_id.to_string(),
            city: user.city.clone(),
            total_hours: user.total_hours,
            rating: user.rating,
        }
    }
}
