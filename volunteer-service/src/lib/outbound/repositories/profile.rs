use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::IdError;
use crate::domain::auth::models::Certificate;
use crate::domain::auth::models::RegistrationWithEvent;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::ProfileReader;

pub struct SqliteProfileReader {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: String,
    event_id: String,
    volunteer_id: String,
    registered_at: DateTime<Utc>,
    hours_earned: i64,
    status: String,
    event_title: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
    location: Option<String>,
}

impl RegistrationRow {
    fn try_into_domain(self) -> Result<RegistrationWithEvent, AuthError> {
        Ok(RegistrationWithEvent {
            id: parse_uuid(&self.id)?,
            event_id: parse_uuid(&self.event_id)?,
            volunteer_id: UserId::from_string(&self.volunteer_id)?,
            registered_at: self.registered_at,
            hours_earned: self.hours_earned,
            status: self.status,
            event_title: self.event_title,
            scheduled_at: self.scheduled_at,
            location: self.location,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CertificateRow {
    id: String,
    volunteer_id: String,
    title: String,
    description: Option<String>,
    hours_required: i64,
    issued_at: DateTime<Utc>,
}

impl CertificateRow {
    fn try_into_domain(self) -> Result<Certificate, AuthError> {
        Ok(Certificate {
            id: parse_uuid(&self.id)?,
            volunteer_id: UserId::from_string(&self.volunteer_id)?,
            title: self.title,
            description: self.description,
            hours_required: self.hours_required,
            issued_at: self.issued_at,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(s)
        .map_err(|e| AuthError::InvalidId(IdError::InvalidFormat(e.to_string())))
}

impl SqliteProfileReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileReader for SqliteProfileReader {
    async fn registrations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RegistrationWithEvent>, AuthError> {
        // LEFT JOIN so a registration pointing at a deleted event still shows
        // up, with the event fields absent.
        let rows = sqlx::query_as::<_, RegistrationRow>(
            "SELECT g.id, g.event_id, g.volunteer_id, g.registered_at, \
             g.hours_earned, g.status, e.title AS event_title, e.scheduled_at, \
             e.location \
             FROM registrations g \
             LEFT JOIN events e ON e.id = g.event_id \
             WHERE g.volunteer_id = ?1 \
             ORDER BY g.registered_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter().map(RegistrationRow::try_into_domain).collect()
    }

    async fn certificates_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Certificate>, AuthError> {
        let rows = sqlx::query_as::<_, CertificateRow>(
            "SELECT id, volunteer_id, title, description, hours_required, issued_at \
             FROM certificates \
             WHERE volunteer_id = ?1 \
             ORDER BY issued_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter().map(CertificateRow::try_into_domain).collect()
    }
}
