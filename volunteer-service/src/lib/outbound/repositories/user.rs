use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::DisplayName;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Role;
use crate::domain::auth::models::RoleId;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::UserWithRole;
use crate::domain::auth::ports::UserRepository;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserWithRoleRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    role_id: String,
    city: Option<String>,
    total_hours: i64,
    rating: f64,
    role_name: String,
}

impl UserWithRoleRow {
    fn try_into_domain(self) -> Result<UserWithRole, AuthError> {
        let role_id = RoleId::from_string(&self.role_id)?;

        Ok(UserWithRole {
            user: User {
                id: UserId::from_string(&self.id)?,
                name: DisplayName::new(self.name)?,
                email: EmailAddress::new(self.email)?,
                password_hash: self.password_hash,
                role_id,
                city: self.city,
                total_hours: self.total_hours,
                rating: self.rating,
            },
            role: Role {
                id: role_id,
                name: self.role_name,
            },
        })
    }
}

const SELECT_USER_WITH_ROLE: &str = r#"
    SELECT u.id, u.name, u.email, u.password_hash, u.role_id, u.city,
           u.total_hours, u.rating, r.name AS role_name
    FROM users u
    JOIN roles r ON r.id = u.role_id
"#;

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role_id, city, total_hours, rating)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(user.id.to_string())
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role_id.to_string())
        .bind(&user.city)
        .bind(user.total_hours)
        .bind(user.rating)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The unique index on email is the race arbiter
            if e.as_database_error()
                .map_or(false, |db_err| db_err.is_unique_violation())
            {
                AuthError::UserAlreadyExists(user.email.as_str().to_string())
            } else {
                AuthError::Database(e.to_string())
            }
        })?;

        Ok(user)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserWithRole>, AuthError> {
        let row = sqlx::query_as::<_, UserWithRoleRow>(&format!(
            "{SELECT_USER_WITH_ROLE} WHERE u.email = ?1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(UserWithRoleRow::try_into_domain).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserWithRole>, AuthError> {
        let row = sqlx::query_as::<_, UserWithRoleRow>(&format!(
            "{SELECT_USER_WITH_ROLE} WHERE u.id = ?1"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(UserWithRoleRow::try_into_domain).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserWithRole>, AuthError> {
        let rows = sqlx::query_as::<_, UserWithRoleRow>(&format!(
            "{SELECT_USER_WITH_ROLE} ORDER BY u.name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter()
            .map(UserWithRoleRow::try_into_domain)
            .collect()
    }
}
