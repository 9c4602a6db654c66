use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::UserWithRole;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Admin-only listing of all registered users.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    state
        .auth_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                ListUsersResponseData {
                    users: users.iter().map(Into::into).collect(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListUsersResponseData {
    pub users: Vec<UserSummaryData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummaryData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub total_hours: i64,
    pub rating: f64,
}

impl From<&UserWithRole> for UserSummaryData {
    fn from(entry: &UserWithRole) -> Self {
        Self {
            id: entry.user.id.to_string(),
            name: entry.user.name.as_str().to_string(),
            email: entry.user.email.as_str().to_string(),
            role: entry.role.name.clone(),
            city: entry.user.city.clone(),
            total_hours: entry.user.total_hours,
            rating: entry.user.rating,
        }
    }
}
