//! Signed session tokens.
//!
//! Tokens are compact HS256 JWTs. They carry everything needed to authorize
//! a request, so nothing is stored server-side: a token is valid until it
//! expires, and there is no revocation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use secrecy::{ExposeSecret, SecretSlice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cornerstone_core::Role;

use crate::models::User;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_DAYS: i64 = 7;

/// Why a token was rejected.
///
/// Every variant means "deny"; the distinction is for logs only.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a JWT, bad JSON, a missing claim, or an unexpected algorithm.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the header and payload.
    #[error("token signature does not match")]
    BadSignature,
    /// The signature is valid but `exp` has passed.
    #[error("token has expired")]
    Expired,
    /// The signing key was rejected.
    #[error("signing key rejected")]
    InvalidKey,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidKeyFormat => Self::InvalidKey,
            _ => Self::Malformed,
        }
    }
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub role: String,
    /// Issued at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// The role claim, if it names a known role.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Whether the role claim is exactly `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role.as_str()
    }
}

/// Issues and verifies session tokens with one symmetric key.
///
/// Cheap to clone; the key is shared.
#[derive(Clone)]
pub struct TokenService {
    key: Arc<SecretSlice<u8>>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(key: &[u8]) -> Self {
        Self {
            key: Arc::new(SecretSlice::from(key.to_vec())),
        }
    }

    /// Issue a token for a stored user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidKey` if the key is rejected.
    pub fn issue_for(&self, user: &User) -> Result<String, TokenError> {
        self.issue(&user.id.to_string(), user.email.as_str(), user.role.as_str())
    }

    /// Issue a token valid for [`TOKEN_LIFETIME_DAYS`] from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidKey` if the key is rejected.
    pub fn issue(&self, user_id: &str, email: &str, role: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, email, role, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::InvalidKey` if the key is rejected.
    pub fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: user_id.to_owned(),
            email: email.to_owned(),
            role: role.to_owned(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
        };
        let key = EncodingKey::from_secret(self.key.expose_secret());

        Ok(jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)?)
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    ///
    /// Returns the reason the token is not acceptable.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token, discarding the failure reason.
    #[must_use]
    pub fn verify_claims(&self, token: &str) -> Option<Claims> {
        self.verify(token).ok()
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The token must also be unexpired by the wall clock. A token expires
    /// at `exp` itself.
    ///
    /// # Errors
    ///
    /// Returns the reason the token is not acceptable.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let key = DecodingKey::from_secret(self.key.expose_secret());
        let claims = jsonwebtoken::decode::<Claims>(token, &key, &validation())?.claims;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);
    validation
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"q7P$vR2!mZ9@kX4#tL8&wB3*nF6^hJ1%")
    }

    #[test]
    fn test_issue_then_verify_returns_claims() {
        let tokens = service();
        let now = Utc::now();
        let token = tokens.issue_at("u1", "a@x.com", "admin", now).unwrap();

        let claims = tokens.verify_at(&token, now).unwrap();
        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp, now.timestamp() + TOKEN_LIFETIME_DAYS * 24 * 60 * 60);
        assert!(claims.has_role(Role::Admin));
    }

    #[test]
    fn test_round_trip_preserves_arbitrary_roles() {
        let tokens = service();
        for role in ["admin", "editor", "viewer", "contractor"] {
            let token = tokens.issue("42", "crew@buildco.com", role).unwrap();
            let claims = tokens.verify(&token).unwrap();
            assert_eq!(claims.role, role);
        }
        let claims = tokens
            .verify(&tokens.issue("1", "a@b.c", "contractor").unwrap())
            .unwrap();
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_token_has_three_segments_and_hs256_header() {
        let token = service().issue("u1", "a@x.com", "admin").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
        assert_eq!(header.typ.as_deref(), Some("JWT"));
    }

    #[test]
    fn test_token_expires_after_seven_days() {
        let tokens = service();
        let issued = Utc::now() - Duration::days(8);
        let token = tokens.issue_at("u1", "a@x.com", "admin", issued).unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary() {
        let tokens = service();
        let issued = Utc::now() - Duration::days(TOKEN_LIFETIME_DAYS) + Duration::hours(1);
        let token = tokens.issue_at("u1", "a@x.com", "admin", issued).unwrap();

        let just_before = issued + Duration::days(TOKEN_LIFETIME_DAYS) - Duration::seconds(1);
        let at_expiry = issued + Duration::days(TOKEN_LIFETIME_DAYS);
        assert!(tokens.verify(&token).is_ok());
        assert!(tokens.verify_at(&token, just_before).is_ok());
        assert_eq!(
            tokens.verify_at(&token, at_expiry),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_token_issued_in_the_past_verifies_within_lifetime() {
        let tokens = service();
        let issued = Utc::now() - Duration::days(3);
        let token = tokens.issue_at("u1", "a@x.com", "editor", issued).unwrap();

        let claims = tokens.verify_at(&token, issued + Duration::hours(1)).unwrap();
        assert_eq!(claims.iat, issued.timestamp());
        assert_eq!(claims.role, "editor");
    }

    #[test]
    fn test_garbage_is_malformed() {
        let tokens = service();
        for input in [
            "",
            ".",
            "..",
            "not-a-token",
            "a.b.c.d",
            "\u{0}\u{1}\u{2}",
            "eyJhbGciOiJIUzI1NiJ9.eyJ9.sig",
        ] {
            assert!(tokens.verify(input).is_err(), "accepted {input:?}");
        }
        assert_eq!(tokens.verify(""), Err(TokenError::Malformed));
        assert_eq!(tokens.verify("a.b.c.d"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_different_secret_is_bad_signature() {
        let token = service().issue("u1", "a@x.com", "admin").unwrap();
        let other = TokenService::new(b"a-completely-different-signing-key!!");

        assert_eq!(other.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_flipped_signature_character_is_rejected() {
        let tokens = service();
        let token = tokens.issue("u1", "a@x.com", "admin").unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        let target = signature_start + 5;
        let original = token.as_bytes()[target];
        let replacement = if original == b'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(target..=target, &replacement.to_string());

        assert_ne!(tampered, token);
        assert_eq!(tokens.verify(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_forged_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue("u2", "viewer@x.com", "viewer").unwrap();
        let signature = token.rsplit('.').next().unwrap();

        let other = TokenService::new(b"an-attacker-controlled-signing-key!!");
        let admin = other.issue("u2", "viewer@x.com", "admin").unwrap();
        let signing_input = &admin[..admin.rfind('.').unwrap()];
        let forged = format!("{signing_input}.{signature}");

        assert_eq!(tokens.verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_alg_none_is_malformed() {
        let tokens = service();
        let token = tokens.issue("u1", "a@x.com", "admin").unwrap();
        let payload = token.split('.').nth(1).unwrap();
        // {"alg":"none"}
        let header = "eyJhbGciOiJub25lIn0";

        assert_eq!(
            tokens.verify(&format!("{header}.{payload}.")),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_other_hmac_algorithm_is_malformed() {
        let tokens = service();
        let claims = Claims {
            user_id: "u1".to_string(),
            email: "a@x.com".to_string(),
            role: "admin".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"q7P$vR2!mZ9@kX4#tL8&wB3*nF6^hJ1%"),
        )
        .unwrap();

        assert_eq!(tokens.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        #[derive(Serialize)]
        struct NoExpiry<'a> {
            #[serde(rename = "userId")]
            user_id: &'a str,
            email: &'a str,
            role: &'a str,
            iat: i64,
        }

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry {
                user_id: "u1",
                email: "a@x.com",
                role: "admin",
                iat: 0,
            },
            &EncodingKey::from_secret(b"q7P$vR2!mZ9@kX4#tL8&wB3*nF6^hJ1%"),
        )
        .unwrap();

        assert_eq!(service().verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_library_errors_map_to_token_errors() {
        let map = |kind: ErrorKind| TokenError::from(jsonwebtoken::errors::Error::from(kind));
        assert_eq!(map(ErrorKind::ExpiredSignature), TokenError::Expired);
        assert_eq!(map(ErrorKind::InvalidSignature), TokenError::BadSignature);
        assert_eq!(map(ErrorKind::InvalidKeyFormat), TokenError::InvalidKey);
        assert_eq!(map(ErrorKind::InvalidToken), TokenError::Malformed);
        assert_eq!(map(ErrorKind::InvalidAlgorithm), TokenError::Malformed);
    }

    #[test]
    fn test_verify_claims_discards_reason() {
        let tokens = service();
        assert!(tokens.verify_claims("garbage").is_none());
        let token = tokens.issue("u1", "a@x.com", "admin").unwrap();
        assert_eq!(tokens.verify_claims(&token).unwrap().user_id, "u1");
    }

    #[test]
    fn test_claims_serialize_camel_case() {
        let claims = Claims {
            user_id: "u1".to_string(),
            email: "a@x.com".to_string(),
            role: "admin".to_string(),
            iat: 1,
            exp: 2,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], "u1");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", service());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("q7P$"));
    }
}
