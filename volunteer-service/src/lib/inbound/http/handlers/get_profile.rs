use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::models::Certificate;
use crate::domain::auth::models::Profile;
use crate::domain::auth::models::RegistrationWithEvent;
use crate::domain::auth::models::Role;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<ApiSuccess<ProfileResponseData>, ApiError> {
    state
        .auth_service
        .get_profile(&current.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileResponseData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub role: RoleData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub total_hours: i64,
    pub rating: f64,
    pub registrations: Vec<RegistrationData>,
    pub certificates: Vec<CertificateData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleData {
    pub id: String,
    pub name: String,
}

/// Registration entry; the event snippet fields are omitted when the event
/// no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationData {
    pub id: String,
    pub event_id: String,
    pub volunteer_id: String,
    pub registered_at: DateTime<Utc>,
    pub hours_earned: i64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateData {
    pub id: String,
    pub volunteer_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hours_required: i64,
    pub issued_at: DateTime<Utc>,
}

impl From<&Role> for RoleData {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.to_string(),
            name: role.name.clone(),
        }
    }
}

impl From<&RegistrationWithEvent> for RegistrationData {
    fn from(registration: &RegistrationWithEvent) -> Self {
        Self {
            id: registration.id.to_string(),
            event_id: registration.event_id.to_string(),
            volunteer_id: registration.volunteer_id.to_string(),
            registered_at: registration.registered_at,
            hours_earned: registration.hours_earned,
            status: registration.status.clone(),
            event_title: registration.event_title.clone(),
            scheduled_at: registration.scheduled_at,
            location: registration.location.clone(),
        }
    }
}

impl From<&Certificate> for CertificateData {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id.to_string(),
            volunteer_id: certificate.volunteer_id.to_string(),
            title: certificate.title.clone(),
            description: certificate.description.clone(),
            hours_required: certificate.hours_required,
            issued_at: certificate.issued_at,
        }
    }
}

impl From<&Profile> for ProfileResponseData {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.user.id.to_string(),
            name: profile.user.name.as_str().to_string(),
            email: profile.user.email.as_str().to_string(),
            role_id: profile.user.role_id.to_string(),
            role: (&profile.role).into(),
            city: profile.user.city.clone(),
            total_hours: profile.user.total_hours,
            rating: profile.user.rating,
            registrations: profile.registrations.iter().map(Into::into).collect(),
            certificates: profile.certificates.iter().map(Into::into).collect(),
        }
    }
}
