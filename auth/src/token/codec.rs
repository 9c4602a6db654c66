use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::errors::TokenError;

/// Signs and verifies compact access tokens.
///
/// Constructed once at startup from deployment configuration (secret,
/// signing algorithm, TTL) and treated as immutable for the process
/// lifetime. Verification is a pure computation with no I/O.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a new token codec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `algorithm` - HMAC signing algorithm from configuration
    /// * `ttl` - Validity duration of issued tokens
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            ttl,
        }
    }

    /// Configured token time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Encode claims into a signed token expiring `ttl` after `issued_at`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token serialization or signing failed
    pub fn encode(
        &self,
        claims: &AccessClaims,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let mut claims = claims.clone();
        claims.exp = (issued_at + self.ttl).timestamp();

        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim has passed
    /// * `InvalidToken` - Signature mismatch or unparseable structure
    pub fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Honor exp exactly rather than the default 60s leeway
        validation.leeway = 0;

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    _ => TokenError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Algorithm::HS256, Duration::minutes(30))
    }

    #[test]
    fn test_encode_and_decode() {
        let codec = codec();
        let claims = AccessClaims::new("user123", "admin");

        let token = codec
            .encode(&claims, Utc::now())
            .expect("Failed to encode token");
        assert!(!token.is_empty());

        let decoded = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded.user_id, "user123");
        assert_eq!(decoded.role, "admin");
    }

    #[test]
    fn test_exp_is_issued_at_plus_ttl() {
        let codec = codec();
        let issued_at = Utc::now();

        let token = codec
            .encode(&AccessClaims::new("user123", "volunteer"), issued_at)
            .expect("Failed to encode token");
        let decoded = codec.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded.exp, (issued_at + Duration::minutes(30)).timestamp());
    }

    #[test]
    fn test_extra_claims_survive_round_trip() {
        let codec = codec();
        let claims = AccessClaims::new("user123", "volunteer").with_extra("city", "Moscow");

        let token = codec
            .encode(&claims, Utc::now())
            .expect("Failed to encode token");
        let decoded = codec.decode(&token).expect("Failed to decode token");

        assert_eq!(decoded.extra.get("city").unwrap().as_str(), Some("Moscow"));
    }

    #[test]
    fn test_decode_expired_token() {
        let codec = codec();
        // Issued far enough in the past that exp has already elapsed
        let issued_at = Utc::now() - Duration::hours(1);

        let token = codec
            .encode(&AccessClaims::new("user123", "volunteer"), issued_at)
            .expect("Failed to encode token");

        let result = codec.decode(&token);
        assert!(matches!(result, Err(TokenError::TokenExpired)));
    }

    #[test]
    fn test_decode_garbage_token() {
        let codec = codec();

        let result = codec.decode("invalid.token.here");
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = codec();
        let codec2 = TokenCodec::new(
            b"another_secret_32_bytes_long_key!!",
            Algorithm::HS256,
            Duration::minutes(30),
        );

        let token = codec1
            .encode(&AccessClaims::new("user123", "volunteer"), Utc::now())
            .expect("Failed to encode token");

        let result = codec2.decode(&token);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_is_invalid_not_expired() {
        let codec = codec();

        let token = codec
            .encode(&AccessClaims::new("user123", "volunteer"), Utc::now())
            .expect("Failed to encode token");

        // Flip the signature segment
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[2] = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let tampered = parts.join(".");

        let result = codec.decode(&tampered);
        assert!(matches!(result, Err(TokenError::InvalidToken(_))));
    }
}
