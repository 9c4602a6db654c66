use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Role;
use crate::domain::auth::models::RoleId;
use crate::domain::auth::models::ADMIN_ROLE;
use crate::domain::auth::models::COORDINATOR_ROLE;
use crate::domain::auth::models::DEFAULT_ROLE;
use crate::domain::auth::ports::RoleRepository;

pub struct SqliteRoleRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: String,
    name: String,
}

impl RoleRow {
    fn try_into_domain(self) -> Result<Role, AuthError> {
        Ok(Role {
            id: RoleId::from_string(&self.id)?,
            name: self.name,
        })
    }
}

impl SqliteRoleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert the built-in roles if absent. Keyed on the unique role name,
    /// so running it on every startup is safe.
    pub async fn seed_defaults(&self) -> Result<(), AuthError> {
        for name in [ADMIN_ROLE, COORDINATOR_ROLE, DEFAULT_ROLE] {
            sqlx::query("INSERT OR IGNORE INTO roles (id, name) VALUES (?1, ?2)")
                .bind(RoleId::new().to_string())
                .bind(name)
                .execute(&self.pool)
                .await
                .map_err(|e| AuthError::Database(e.to_string()))?;
        }

        Ok(())
    }
}

#[async_trait]
impl RoleRepository for SqliteRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError> {
        let row = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        row.map(RoleRow::try_into_domain).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Role>, AuthError> {
        let rows = sqlx::query_as::<_, RoleRow>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?;

        rows.into_iter().map(RoleRow::try_into_domain).collect()
    }
}
