/// JWT bearer token issuance and verification
///
/// Tokens are HS256-signed JWTs carrying the user ID as subject and an
/// absolute expiry. The signing secret is loaded once at startup into a
/// [`TokenService`] and shared read-only by every request.
///
/// # Claims
///
/// - `sub`: User ID
/// - `iss`: Always "ticketdesk"
/// - `iat`: Issued at (Unix timestamp)
/// - `exp`: Expiration (Unix timestamp), `iat + ttl`
///
/// # Example
///
/// ```
/// use ticketdesk_shared::auth::jwt::TokenService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new("a-secret-that-is-at-least-32-bytes!", TokenService::default_ttl());
///
/// let token = tokens.issue(42)?;
/// assert_eq!(tokens.verify(&token)?, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Issuer claim stamped into and required from every token
pub const ISSUER: &str = "ticketdesk";

/// Default access token lifetime in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Signature, structure or issuer is invalid
    #[error("Malformed token: {0}")]
    Malformed(String),
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i64,

    /// Issuer - Always "ticketdesk"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `user_id` that expire `ttl` from now
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Signs and verifies access tokens with a process-wide secret
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Builds the service from a signing secret and default token lifetime
    ///
    /// The secret should be at least 32 bytes; `Config::from_env` enforces
    /// this for the server.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_exp = true;
        // Expiry is exact: a token is rejected as soon as now > exp
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Lifetime applied at login unless configured otherwise
    pub fn default_ttl() -> Duration {
        Duration::minutes(DEFAULT_TTL_MINUTES)
    }

    /// Configured token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a token for `user_id` with the configured lifetime
    pub fn issue(&self, user_id: i64) -> Result<String, JwtError> {
        self.issue_with_ttl(user_id, self.ttl)
    }

    /// Issues a token for `user_id` with an explicit lifetime
    pub fn issue_with_ttl(&self, user_id: i64, ttl: Duration) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
    }

    /// Verifies signature, issuer and expiry, returning the decoded claims
    pub fn decode_claims(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            })
    }

    /// Verifies a token and returns the user ID it was issued for
    pub fn verify(&self, token: &str) -> Result<i64, JwtError> {
        self.decode_claims(token).map(|claims| claims.sub)
    }
}
