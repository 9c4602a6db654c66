//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the volunteer
//! backend:
//! - Password hashing (Argon2id)
//! - Signed access-token generation and validation
//!
//! The service defines its own domain traits and adapts these
//! implementations, so the web crate never depends on the hashing or JWT
//! crates directly.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use chrono::{Duration, Utc};
//! use jsonwebtoken::Algorithm;
//! use auth::{AccessClaims, TokenCodec};
//!
//! let codec = TokenCodec::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Algorithm::HS256,
//!     Duration::minutes(30),
//! );
//! let claims = AccessClaims::new("user123", "volunteer");
//! let token = codec.encode(&claims, Utc::now()).unwrap();
//! let decoded = codec.decode(&token).unwrap();
//! assert_eq!(decoded.user_id, "user123");
//! assert_eq!(decoded.role, "volunteer");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessClaims;
pub use token::TokenCodec;
pub use token::TokenError;
