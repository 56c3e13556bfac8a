/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Signed, time-limited bearer tokens
/// - [`middleware`]: Resolving a bearer token to an active user
///
/// # Example
///
/// ```
/// use ticketdesk_shared::auth::jwt::TokenService;
/// use ticketdesk_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// let tokens = TokenService::new("secret-key-that-is-at-least-32-bytes", TokenService::default_ttl());
/// let token = tokens.issue(1)?;
/// assert_eq!(tokens.verify(&token)?, 1);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
