use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Access-token claims.
///
/// `user_id` and `role` are always present; anything else a caller wants to
/// embed goes through `extra`, which is flattened into the token payload.
/// `exp` is computed by [`TokenCodec::encode`](crate::TokenCodec::encode)
/// from the configured TTL, so callers never set it directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Authenticated user identifier
    pub user_id: String,

    /// Role name granted at login
    pub role: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl AccessClaims {
    /// Create claims for a user and role. `exp` is filled in at encode time.
    pub fn new(user_id: impl ToString, role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            role: role.into(),
            exp: 0,
            extra: HashMap::new(),
        }
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Check if the token is expired relative to the given timestamp.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let claims = AccessClaims::new("user123", "volunteer");
        assert_eq!(claims.user_id, "user123");
        assert_eq!(claims.role, "volunteer");
        assert_eq!(claims.exp, 0);
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_with_extra() {
        let claims = AccessClaims::new("user123", "admin").with_extra("city", "Moscow");
        assert_eq!(claims.extra.get("city").unwrap().as_str(), Some("Moscow"));
    }

    #[test]
    fn test_extra_is_flattened() {
        let claims = AccessClaims::new("user123", "admin").with_extra("city", "Moscow");
        let json = serde_json::to_value(&claims).unwrap();
        // Custom fields sit next to the required ones, not under "extra"
        assert_eq!(json["city"], "Moscow");
        assert!(json.get("extra").is_none());
    }

    #[test]
    fn test_is_expired() {
        let mut claims = AccessClaims::new("user123", "volunteer");
        claims.exp = 1000;

        assert!(!claims.is_expired(999));
        assert!(!claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }
}
