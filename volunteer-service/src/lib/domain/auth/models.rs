use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::DisplayNameError;
use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::IdError;

/// Role granted to users created without an explicit role.
pub const DEFAULT_ROLE: &str = "volunteer";

/// Role allowed through the admin gate.
pub const ADMIN_ROLE: &str = "admin";

/// Mid-tier role for running events; seeded but carries no special gate here.
pub const COORDINATOR_ROLE: &str = "coordinator";

/// User aggregate entity.
///
/// `total_hours` and `rating` are owned by the hour-accrual side of the
/// system; authentication reads them but never mutates them.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role_id: RoleId,
    pub city: Option<String>,
    pub total_hours: i64,
    pub rating: f64,
}

/// Named permission level. The set is closed and seeded at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// User with its role record eagerly resolved.
#[derive(Debug, Clone)]
pub struct UserWithRole {
    pub user: User,
    pub role: Role,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub Uuid);

impl RoleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, IdError> {
        Uuid::parse_str(s)
            .map(RoleId)
            .map_err(|e| IdError::InvalidFormat(e.to_string()))
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name is 2-100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Create a new validated display name.
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 2 characters
    /// * `TooLong` - Name longer than 100 characters
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(DisplayNameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored as given;
/// case handling is left to the underlying store's collation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new user with domain types.
///
/// `role_id`, when present, is used verbatim; otherwise the default
/// volunteer role is resolved at registration time.
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: String,
    pub role_id: Option<RoleId>,
    pub city: Option<String>,
}

/// A registration joined with a snippet of its event.
///
/// The event fields are `None` when the event no longer exists.
#[derive(Debug, Clone)]
pub struct RegistrationWithEvent {
    pub id: Uuid,
    pub event_id: Uuid,
    pub volunteer_id: UserId,
    pub registered_at: DateTime<Utc>,
    pub hours_earned: i64,
    pub status: String,
    pub event_title: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Certificate issued to a volunteer.
#[derive(Debug, Clone)]
pub struct Certificate {
    pub id: Uuid,
    pub volunteer_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub hours_required: i64,
    pub issued_at: DateTime<Utc>,
}

/// Aggregated profile: the user, its role, and everything the collaborator
/// store records against it.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub role: Role,
    pub registrations: Vec<RegistrationWithEvent>,
    pub certificates: Vec<Certificate>,
}
