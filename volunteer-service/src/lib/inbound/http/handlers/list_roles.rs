use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::get_profile::RoleData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::ports::RoleRepository;
use crate::inbound::http::router::AppState;

pub async fn list_roles(
    State(state): State<AppState>,
) -> Result<ApiSuccess<ListRolesResponseData>, ApiError> {
    state
        .roles
        .list_all()
        .await
        .map_err(ApiError::from)
        .map(|roles| {
            ApiSuccess::new(
                StatusCode::OK,
                ListRolesResponseData {
                    roles: roles.iter().map(Into::into).collect(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRolesResponseData {
    pub roles: Vec<RoleData>,
}
