//! JWT Token Handler
//! Mission: Generate and validate JWT tokens securely

use crate::auth::blacklist::TokenBlacklist;
use crate::auth::models::{Claims, User};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use tracing::debug;

/// Fixed token lifetime from issuance.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Why a presented token was rejected. Distinguished internally for logging;
/// the HTTP boundary collapses `Revoked` and `InvalidSignature` into one
/// generic response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Revoked,
    InvalidSignature,
    Expired,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Revoked => write!(f, "token has been revoked"),
            TokenError::InvalidSignature => write!(f, "token signature is invalid"),
            TokenError::Expired => write!(f, "token has expired"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT Handler for token operations
pub struct JwtHandler {
    secret: String,
    ttl_secs: i64,
    blacklist: Arc<TokenBlacklist>,
}

impl JwtHandler {
    /// Create a new JWT handler with the process-wide signing secret.
    ///
    /// Fails if the secret is absent or blank; the caller is expected to
    /// refuse to start rather than serve requests that cannot be signed.
    pub fn new(secret: String, blacklist: Arc<TokenBlacklist>) -> Result<Self> {
        Self::with_ttl(secret, TOKEN_TTL_SECS, blacklist)
    }

    fn with_ttl(secret: String, ttl_secs: i64, blacklist: Arc<TokenBlacklist>) -> Result<Self> {
        if secret.trim().is_empty() {
            bail!("JWT signing secret is not configured (set JWT_SECRET)");
        }
        Ok(Self {
            secret,
            ttl_secs,
            blacklist,
        })
    }

    /// Issue a signed token for a user, valid for [`TOKEN_TTL_SECS`].
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expiry = now
            .checked_add_signed(chrono::Duration::seconds(self.ttl_secs))
            .context("Invalid expiry timestamp")?;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: expiry.timestamp() as usize,
        };

        debug!(
            "Issuing token for user {} ({}), valid {}s",
            user.email, user.id, self.ttl_secs
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Validate a presented token and extract its claims.
    ///
    /// Checks run strictly in order: revocation, signature, expiry. A revoked
    /// token is rejected before any cryptographic work, whatever its state.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        if self.blacklist.is_revoked(token) {
            return Err(TokenError::Revoked);
        }

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::InvalidSignature,
        })?;

        let claims = decoded.claims;

        // Re-check expiry against the wall clock; the decoder's default
        // leeway would otherwise let a just-expired token through.
        if Utc::now().timestamp() as usize >= claims.exp {
            return Err(TokenError::Expired);
        }

        debug!("Validated token for subject {}", claims.sub);

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;

    fn test_user(id: i64, role: Role) -> User {
        User {
            id,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now().to_rfc3339(),
            last_login: None,
        }
    }

    fn handler(secret: &str) -> JwtHandler {
        JwtHandler::new(secret.to_string(), Arc::new(TokenBlacklist::new())).unwrap()
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let handler = handler("test-secret-key-12345");
        let user = test_user(42, Role::User);

        let token = handler.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = handler.validate(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS as usize);
    }

    #[test]
    fn test_roundtrip_preserves_admin_role() {
        let handler = handler("test-secret-key-12345");
        let token = handler.issue(&test_user(7, Role::Admin)).unwrap();

        let claims = handler.validate(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn test_garbage_token_rejected_as_invalid_signature() {
        let handler = handler("test-secret-key-12345");

        let result = handler.validate("not.a.token");
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_different_secrets_reject() {
        let handler1 = handler("secret1");
        let handler2 = handler("secret2");

        let token = handler1.issue(&test_user(1, Role::User)).unwrap();

        let result = handler2.validate(&token);
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_blank_secret_rejected_at_construction() {
        let result = JwtHandler::new("   ".to_string(), Arc::new(TokenBlacklist::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_rejected_distinctly() {
        let blacklist = Arc::new(TokenBlacklist::new());
        let issuer =
            JwtHandler::with_ttl("test-secret".to_string(), -120, blacklist.clone()).unwrap();
        let validator = JwtHandler::new("test-secret".to_string(), blacklist).unwrap();

        let token = issuer.issue(&test_user(42, Role::User)).unwrap();

        let result = validator.validate(&token);
        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_expiry_caught_inside_decoder_leeway() {
        // 10 seconds past expiry is within the decoder's default 60s leeway;
        // the explicit wall-clock check must still reject it.
        let blacklist = Arc::new(TokenBlacklist::new());
        let issuer =
            JwtHandler::with_ttl("test-secret".to_string(), -10, blacklist.clone()).unwrap();
        let validator = JwtHandler::new("test-secret".to_string(), blacklist).unwrap();

        let token = issuer.issue(&test_user(1, Role::User)).unwrap();

        let result = validator.validate(&token);
        assert_eq!(result.unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_revoked_token_rejected_while_still_valid() {
        let blacklist = Arc::new(TokenBlacklist::new());
        let handler = JwtHandler::new("test-secret".to_string(), blacklist.clone()).unwrap();

        let token = handler.issue(&test_user(42, Role::User)).unwrap();
        assert!(handler.validate(&token).is_ok());

        blacklist.revoke(&token);

        let result = handler.validate(&token);
        assert_eq!(result.unwrap_err(), TokenError::Revoked);
    }

    #[test]
    fn test_revocation_checked_before_expiry() {
        let blacklist = Arc::new(TokenBlacklist::new());
        let issuer =
            JwtHandler::with_ttl("test-secret".to_string(), -120, blacklist.clone()).unwrap();
        let validator = JwtHandler::new("test-secret".to_string(), blacklist.clone()).unwrap();

        let token = issuer.issue(&test_user(42, Role::User)).unwrap();
        blacklist.revoke(&token);

        // Expired AND revoked: revocation wins.
        let result = validator.validate(&token);
        assert_eq!(result.unwrap_err(), TokenError::Revoked);
    }

    #[test]
    fn test_revocation_checked_before_signature() {
        let blacklist = Arc::new(TokenBlacklist::new());
        let handler = JwtHandler::new("test-secret".to_string(), blacklist.clone()).unwrap();

        // Not even a structurally valid JWT; revocation still wins.
        blacklist.revoke("garbage-string");

        let result = handler.validate("garbage-string");
        assert_eq!(result.unwrap_err(), TokenError::Revoked);
    }
}
