//! # Admin authentication
//!
//! Credentials are verified server-side against an argon2 hash and exchanged
//! for a signed, expiring HS256 token. The REST layer only depends on the
//! [`AuthGate`] trait to check bearer tokens.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TOKEN_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Admin login is not configured")]
    LoginDisabled,

    #[error("Missing or invalid bearer token")]
    Unauthenticated,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<password_hash::Error> for AuthError {
    fn from(e: password_hash::Error) -> Self {
        AuthError::PasswordHash(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(Session),
    Unauthenticated,
}

/// Capability to turn a bearer token into a session
pub trait AuthGate: Send + Sync {
    fn verify(&self, token: &str) -> AuthOutcome;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

#[derive(Clone)]
pub struct JwtAuthGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime: Duration,
}

impl JwtAuthGate {
    pub fn new(secret: &str, lifetime: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    pub fn issue(&self, username: &str) -> Result<(String, Session), AuthError> {
        self.issue_with_ttl(username, self.lifetime)
    }

    pub fn issue_with_ttl(&self, username: &str, ttl: Duration) -> Result<(String, Session), AuthError> {
        let now = Utc::now();
        let expires_at = now + ttl;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok((
            token,
            Session {
                username: username.to_string(),
                expires_at,
            },
        ))
    }

    fn decode_session(&self, token: &str) -> Result<Session, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::Unauthenticated)?;
        Ok(Session {
            username: claims.sub,
            expires_at,
        })
    }
}

impl AuthGate for JwtAuthGate {
    fn verify(&self, token: &str) -> AuthOutcome {
        match self.decode_session(token) {
            Ok(session) => AuthOutcome::Authenticated(session),
            Err(e) => {
                debug!("Rejected token: {}", e);
                AuthOutcome::Unauthenticated
            }
        }
    }
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(hash) => Argon2::default().verify_password(password.as_bytes(), &hash).is_ok(),
        Err(_) => false,
    }
}

/// Hex secret for signing tokens when none is configured
pub fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Single admin account checked against a stored argon2 hash
#[derive(Clone)]
pub struct AdminAuthenticator {
    username: String,
    password_hash: Option<String>,
    gate: Arc<JwtAuthGate>,
}

impl AdminAuthenticator {
    pub fn new(username: impl Into<String>, password_hash: Option<String>, gate: Arc<JwtAuthGate>) -> Self {
        Self {
            username: username.into(),
            password_hash,
            gate,
        }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<(String, Session), AuthError> {
        let Some(hash) = &self.password_hash else {
            warn!("Login attempt for {} while admin login is disabled", username);
            return Err(AuthError::LoginDisabled);
        };
        // Verify the password even on a wrong username so both take equally long
        let password_ok = verify_password(password, hash);
        if username != self.username || !password_ok {
            warn!("Failed admin login for {}", username);
            return Err(AuthError::InvalidCredentials);
        }
        let issued = self.gate.issue(username)?;
        info!("Admin {} logged in, session until {}", username, issued.1.expires_at);
        Ok(issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Arc<JwtAuthGate> {
        Arc::new(JwtAuthGate::new("test-secret", Duration::hours(DEFAULT_TOKEN_HOURS)))
    }

    #[test]
    fn test_issue_and_verify() {
        let gate = gate();
        let (token, session) = gate.issue("owner").unwrap();
        assert_eq!(session.username, "owner");
        assert!(session.expires_at > Utc::now() + Duration::hours(23));

        match gate.verify(&token) {
            AuthOutcome::Authenticated(verified) => {
                assert_eq!(verified.username, "owner");
                assert_eq!(verified.expires_at.timestamp(), session.expires_at.timestamp());
            }
            AuthOutcome::Unauthenticated => panic!("token should verify"),
        }
    }

    #[test]
    fn test_rejects_expired_tampered_and_foreign_tokens() {
        let gate = gate();
        let (expired, _) = gate.issue_with_ttl("owner", Duration::hours(-2)).unwrap();
        assert_eq!(gate.verify(&expired), AuthOutcome::Unauthenticated);

        let (token, _) = gate.issue("owner").unwrap();
        assert_eq!(gate.verify(&format!("{}x", token)), AuthOutcome::Unauthenticated);
        assert_eq!(gate.verify("not-a-token"), AuthOutcome::Unauthenticated);

        let other = JwtAuthGate::new("another-secret", Duration::hours(1));
        let (foreign, _) = other.issue("owner").unwrap();
        assert_eq!(gate.verify(&foreign), AuthOutcome::Unauthenticated);
    }

    #[test]
    fn test_login() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        let auth = AdminAuthenticator::new("owner", Some(hash), gate());

        let (token, session) = auth.login("owner", "s3cret-pass").unwrap();
        assert_eq!(session.username, "owner");
        assert!(matches!(gate().verify(&token), AuthOutcome::Authenticated(_)));

        assert!(matches!(
            auth.login("owner", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("intruder", "s3cret-pass"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_disabled_without_hash() {
        let auth = AdminAuthenticator::new("owner", None, gate());
        assert!(matches!(auth.login("owner", "anything"), Err(AuthError::LoginDisabled)));
    }

    #[test]
    fn test_random_secret() {
        let a = random_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, random_secret());
    }
}
