use std::sync::Arc;

use async_trait::async_trait;
use auth::AccessClaims;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Profile;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::UserWithRole;
use crate::domain::auth::models::DEFAULT_ROLE;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::ProfileReader;
use crate::domain::auth::ports::RoleRepository;
use crate::domain::auth::ports::UserRepository;

/// Domain service implementation for registration, login, and profiles.
///
/// All collaborators are injected at construction; the only process-wide
/// state it touches is the immutable token codec configuration.
pub struct AuthService<UR, RR, PR>
where
    UR: UserRepository,
    RR: RoleRepository,
    PR: ProfileReader,
{
    users: Arc<UR>,
    roles: Arc<RR>,
    profiles: Arc<PR>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
}

impl<UR, RR, PR> AuthService<UR, RR, PR>
where
    UR: UserRepository,
    RR: RoleRepository,
    PR: ProfileReader,
{
    /// Create a new auth service with injected dependencies.
    pub fn new(
        users: Arc<UR>,
        roles: Arc<RR>,
        profiles: Arc<PR>,
        token_codec: Arc<TokenCodec>,
    ) -> Self {
        Self {
            users,
            roles,
            profiles,
            password_hasher: PasswordHasher::new(),
            token_codec,
        }
    }
}

#[async_trait]
impl<UR, RR, PR> AuthServicePort for AuthService<UR, RR, PR>
where
    UR: UserRepository,
    RR: RoleRepository,
    PR: ProfileReader,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        if self.users.find_by_email(&command.email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let role_id = match command.role_id {
            Some(role_id) => role_id,
            None => {
                self.roles
                    .find_by_name(DEFAULT_ROLE)
                    .await?
                    .ok_or_else(|| AuthError::MissingDefaultRole(DEFAULT_ROLE.to_string()))?
                    .id
            }
        };

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role_id,
            city: command.city,
            total_hours: 0,
            rating: 0.0,
        };

        // The store's unique index closes the race between the existence
        // check above and this insert; the repository reports a losing
        // concurrent insert as UserAlreadyExists.
        self.users.insert(user).await
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<String, AuthError> {
        let UserWithRole { user, role } = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(email.as_str().to_string()))?;

        if !self
            .password_hasher
            .verify(password, &user.password_hash)?
        {
            return Err(AuthError::InvalidPassword);
        }

        let claims = AccessClaims::new(user.id, role.name.as_str());
        let token = self.token_codec.encode(&claims, Utc::now())?;

        tracing::debug!(user_id = %user.id, role = %role.name, "Access token issued");

        Ok(token)
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Profile, AuthError> {
        let UserWithRole { user, role } = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;

        let registrations = self.profiles.registrations_for_user(user_id).await?;
        let certificates = self.profiles.certificates_for_user(user_id).await?;

        Ok(Profile {
            user,
            role,
            registrations,
            certificates,
        })
    }

    async fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError> {
        self.users.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::Algorithm;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::auth::models::Certificate;
    use crate::domain::auth::models::DisplayName;
    use crate::domain::auth::models::RegistrationWithEvent;
    use crate::domain::auth::models::Role;
    use crate::domain::auth::models::RoleId;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn insert(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<UserWithRole>, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<UserWithRole>, AuthError>;
            async fn list_all(&self) -> Result<Vec<UserWithRole>, AuthError>;
        }
    }

    mock! {
        pub TestRoleRepository {}

        #[async_trait]
        impl RoleRepository for TestRoleRepository {
            async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;
            async fn list_all(&self) -> Result<Vec<Role>, AuthError>;
        }
    }

    mock! {
        pub TestProfileReader {}

        #[async_trait]
        impl ProfileReader for TestProfileReader {
            async fn registrations_for_user(&self, user_id: &UserId) -> Result<Vec<RegistrationWithEvent>, AuthError>;
            async fn certificates_for_user(&self, user_id: &UserId) -> Result<Vec<Certificate>, AuthError>;
        }
    }

    fn test_codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(
            b"test-secret-key-for-signing-at-least-32-bytes",
            Algorithm::HS256,
            Duration::minutes(30),
        ))
    }

    fn service(
        users: MockTestUserRepository,
        roles: MockTestRoleRepository,
        profiles: MockTestProfileReader,
    ) -> AuthService<MockTestUserRepository, MockTestRoleRepository, MockTestProfileReader> {
        AuthService::new(
            Arc::new(users),
            Arc::new(roles),
            Arc::new(profiles),
            test_codec(),
        )
    }

    fn volunteer_role() -> Role {
        Role {
            id: RoleId::new(),
            name: DEFAULT_ROLE.to_string(),
        }
    }

    fn stored_user(email: &str, password: &str, role: &Role) -> UserWithRole {
        let hasher = PasswordHasher::new();
        UserWithRole {
            user: User {
                id: UserId::new(),
                name: DisplayName::new("Test User".to_string()).unwrap(),
                email: EmailAddress::new(email.to_string()).unwrap(),
                password_hash: hasher.hash(password).unwrap(),
                role_id: role.id,
                city: None,
                total_hours: 0,
                rating: 0.0,
            },
            role: role.clone(),
        }
    }

    fn register_command(email: &str) -> RegisterCommand {
        RegisterCommand {
            name: DisplayName::new("Test User".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: "password123".to_string(),
            role_id: None,
            city: Some("Moscow".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_success_with_default_role() {
        let mut users = MockTestUserRepository::new();
        let mut roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let role = volunteer_role();
        let role_id = role.id;

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        roles
            .expect_find_by_name()
            .with(eq(DEFAULT_ROLE))
            .times(1)
            .returning(move |_| Ok(Some(role.clone())));
        users
            .expect_insert()
            .withf(move |user| {
                user.role_id == role_id
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = service(users, roles, profiles);
        let user = service
            .register(register_command("test@example.com"))
            .await
            .expect("register failed");

        assert_eq!(user.email.as_str(), "test@example.com");
        assert_eq!(user.total_hours, 0);
        // Plaintext never stored
        assert_ne!(user.password_hash, "password123");
    }

    #[tokio::test]
    async fn test_register_uses_given_role_verbatim() {
        let mut users = MockTestUserRepository::new();
        let mut roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let explicit = RoleId::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        // No default-role lookup when the caller supplies one
        roles.expect_find_by_name().times(0);
        users
            .expect_insert()
            .withf(move |user| user.role_id == explicit)
            .times(1)
            .returning(|user| Ok(user));

        let service = service(users, roles, profiles);
        let mut command = register_command("test@example.com");
        command.role_id = Some(explicit);

        assert!(service.register(command).await.is_ok());
    }

    #[tokio::test]
    async fn test_register_existing_email() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let role = volunteer_role();
        let existing = stored_user("test@example.com", "whatever", &role);

        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        users.expect_insert().times(0);

        let service = service(users, roles, profiles);
        let result = service.register(register_command("test@example.com")).await;

        assert!(matches!(result, Err(AuthError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_race_surfaces_as_already_exists() {
        let mut users = MockTestUserRepository::new();
        let mut roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let role = volunteer_role();

        // Pre-check sees nothing, but a concurrent insert wins the race and
        // the store reports the unique violation.
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        roles
            .expect_find_by_name()
            .times(1)
            .returning(move |_| Ok(Some(role.clone())));
        users
            .expect_insert()
            .times(1)
            .returning(|user| Err(AuthError::UserAlreadyExists(user.email.as_str().to_string())));

        let service = service(users, roles, profiles);
        let result = service.register(register_command("test@example.com")).await;

        assert!(matches!(result, Err(AuthError::UserAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_missing_default_role_is_fatal() {
        let mut users = MockTestUserRepository::new();
        let mut roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        roles
            .expect_find_by_name()
            .with(eq(DEFAULT_ROLE))
            .times(1)
            .returning(|_| Ok(None));
        users.expect_insert().times(0);

        let service = service(users, roles, profiles);
        let result = service.register(register_command("test@example.com")).await;

        assert!(matches!(result, Err(AuthError::MissingDefaultRole(_))));
    }

    #[tokio::test]
    async fn test_login_success_token_carries_identity() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let role = volunteer_role();
        let stored = stored_user("test@example.com", "secret1", &role);
        let user_id = stored.user.id;

        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(users, roles, profiles);
        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let token = service.login(&email, "secret1").await.expect("login failed");

        let claims = test_codec().decode(&token).expect("token invalid");
        assert_eq!(claims.user_id, user_id.to_string());
        assert_eq!(claims.role, DEFAULT_ROLE);
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = service(users, roles, profiles);
        let email = EmailAddress::new("nobody@example.com".to_string()).unwrap();
        let result = service.login(&email, "secret1").await;

        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        let role = volunteer_role();
        let stored = stored_user("test@example.com", "secret1", &role);

        users
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));

        let service = service(users, roles, profiles);
        let email = EmailAddress::new("test@example.com".to_string()).unwrap();
        let result = service.login(&email, "wrong_password").await;

        assert!(matches!(result, Err(AuthError::InvalidPassword)));
    }

    #[tokio::test]
    async fn test_get_profile_aggregates_store_data() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let mut profiles = MockTestProfileReader::new();

        let role = volunteer_role();
        let stored = stored_user("test@example.com", "secret1", &role);
        let user_id = stored.user.id;

        let registration = RegistrationWithEvent {
            id: uuid::Uuid::new_v4(),
            event_id: uuid::Uuid::new_v4(),
            volunteer_id: user_id,
            registered_at: Utc::now(),
            hours_earned: 4,
            status: "registered".to_string(),
            event_title: Some("Park cleanup".to_string()),
            scheduled_at: Some(Utc::now()),
            location: Some("Sokolniki".to_string()),
        };

        users
            .expect_find_by_id()
            .withf(move |id| *id == user_id)
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        let returned = registration.clone();
        profiles
            .expect_registrations_for_user()
            .times(1)
            .returning(move |_| Ok(vec![returned.clone()]));
        profiles
            .expect_certificates_for_user()
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = service(users, roles, profiles);
        let profile = service.get_profile(&user_id).await.expect("profile failed");

        assert_eq!(profile.user.id, user_id);
        assert_eq!(profile.role.name, DEFAULT_ROLE);
        assert_eq!(profile.registrations.len(), 1);
        assert_eq!(
            profile.registrations[0].event_title.as_deref(),
            Some("Park cleanup")
        );
        assert!(profile.certificates.is_empty());
    }

    #[tokio::test]
    async fn test_get_profile_unknown_user() {
        let mut users = MockTestUserRepository::new();
        let roles = MockTestRoleRepository::new();
        let profiles = MockTestProfileReader::new();

        users.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = service(users, roles, profiles);
        let result = service.get_profile(&UserId::new()).await;

        assert!(matches!(result, Err(AuthError::UserNotFound(_))));
    }
}
