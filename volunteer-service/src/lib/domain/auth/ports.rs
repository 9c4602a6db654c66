use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Certificate;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Profile;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::RegistrationWithEvent;
use crate::domain::auth::models::Role;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::models::UserWithRole;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated name, email, password, and optional role/city
    ///
    /// # Returns
    /// Created user entity (the hash never leaves the domain layer)
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `MissingDefaultRole` - No role id given and the volunteer role is
    ///   absent from the store (deployment fault)
    /// * `Database` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Verify credentials and mint an access token.
    ///
    /// # Returns
    /// Signed token string embedding the user id and role name
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this email
    /// * `InvalidPassword` - Password does not match
    /// * `Database` - Store operation failed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<String, AuthError>;

    /// Load a user's full profile: role, registrations with event snippets,
    /// and certificates. Pure aggregation, no mutation.
    ///
    /// # Errors
    /// * `UserNotFound` - User does not exist
    /// * `Database` - Store operation failed
    async fn get_profile(&self, user_id: &UserId) -> Result<Profile, AuthError>;

    /// List all users with their roles (admin surface).
    ///
    /// # Errors
    /// * `Database` - Store operation failed
    async fn list_users(&self) -> Result<Vec<UserWithRole>, AuthError>;
}

/// Persistence operations for the user records the core consumes.
///
/// The email unique constraint lives in the store; a racing duplicate
/// insert must surface as `UserAlreadyExists`, never as a second row.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email unique constraint violated
    /// * `Database` - Store operation failed
    async fn insert(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve a user by email with the role eagerly resolved.
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<UserWithRole>, AuthError>;

    /// Retrieve a user by id with the role eagerly resolved.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserWithRole>, AuthError>;

    /// Retrieve all users with roles.
    async fn list_all(&self) -> Result<Vec<UserWithRole>, AuthError>;
}

/// Lookup of role records.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Retrieve a role by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, AuthError>;

    /// Retrieve all roles.
    async fn list_all(&self) -> Result<Vec<Role>, AuthError>;
}

/// Read-only aggregation collaborator for profile data.
///
/// Kept separate from `UserRepository` so the service depends on a narrow
/// read contract rather than the whole event/registration machinery.
#[async_trait]
pub trait ProfileReader: Send + Sync + 'static {
    /// Registrations for a volunteer, each joined with its event's
    /// title/schedule/location when the event still exists.
    async fn registrations_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<RegistrationWithEvent>, AuthError>;

    /// Certificates issued to a volunteer.
    async fn certificates_for_user(&self, user_id: &UserId)
        -> Result<Vec<Certificate>, AuthError>;
}
