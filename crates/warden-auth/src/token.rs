//! HS512 JWT access token issuance and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Clock-skew tolerance applied by [`validate_access_token`].
pub const DEFAULT_LEEWAY_SECS: u64 = 5;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject — account ID (UUID string).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Audience — always `[sub]`.
    pub aud: Vec<String>,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Not-before (Unix timestamp).
    pub nbf: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a signed HS512 access token for `subject`, valid from now
/// for `lifetime_hours`.
pub fn issue_access_token(
    subject: &str,
    secret_key: &str,
    issuer: &str,
    lifetime_hours: i64,
) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = AccessTokenClaims {
        sub: subject.to_string(),
        iss: issuer.to_string(),
        aud: vec![subject.to_string()],
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: expiry(now, lifetime_hours)?.timestamp(),
    };

    let key = EncodingKey::from_secret(secret_key.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &key)
        .map_err(|e| TokenError::Signing(e.to_string()))
}

/// `now + lifetime_hours`, or a signing error when the result does not
/// fit in a timestamp.
pub(crate) fn expiry(
    now: DateTime<Utc>,
    lifetime_hours: i64,
) -> Result<DateTime<Utc>, TokenError> {
    Duration::try_hours(lifetime_hours)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            TokenError::Signing(format!("token lifetime of {lifetime_hours}h is out of range"))
        })
}

/// Decode and verify an access token, returning its claims.
///
/// Checks the signature, `exp` and `nbf` (with `leeway_secs` of clock
/// skew), the issuer, and that the subject is non-empty. Every failure
/// is reported as [`TokenError::Unauthorized`].
pub fn decode_access_token(
    token: &str,
    secret_key: &str,
    issuer: &str,
    leeway_secs: u64,
) -> Result<AccessTokenClaims, TokenError> {
    if token.is_empty() {
        return Err(TokenError::Unauthorized);
    }

    let key = DecodingKey::from_secret(secret_key.as_bytes());

    let mut validation = Validation::new(Algorithm::HS512);
    validation.leeway = leeway_secs;
    validation.validate_nbf = true;
    // The audience mirrors the subject, so there is no fixed value to
    // check it against.
    validation.validate_aud = false;
    validation.set_issuer(&[issuer]);
    validation.set_required_spec_claims(&["sub", "iss", "exp", "nbf"]);

    let claims = jsonwebtoken::decode::<AccessTokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            TokenError::Unauthorized
        })?;

    if claims.sub.is_empty() || claims.iss != issuer {
        return Err(TokenError::Unauthorized);
    }

    Ok(claims)
}

/// Validate an access token and return the subject it asserts.
///
/// Uses the default 5-second leeway. Purely stateless; no store lookup
/// is performed.
pub fn validate_access_token(
    token: &str,
    secret_key: &str,
    issuer: &str,
) -> Result<String, TokenError> {
    decode_access_token(token, secret_key, issuer, DEFAULT_LEEWAY_SECS).map(|claims| claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";
    const ISSUER: &str = "warden-test";

    #[test]
    fn jwt_roundtrip() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 24).unwrap();
        let claims = decode_access_token(&token, SECRET, ISSUER, DEFAULT_LEEWAY_SECS).unwrap();

        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.aud, vec!["account-1".to_string()]);
        assert_eq!(claims.iat, claims.nbf);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn header_is_hs512() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 1).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn validate_returns_subject() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 1).unwrap();
        assert_eq!(
            validate_access_token(&token, SECRET, ISSUER).unwrap(),
            "account-1"
        );
    }

    #[test]
    fn empty_token_rejected() {
        assert!(matches!(
            validate_access_token("", SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn malformed_token_rejected() {
        assert!(matches!(
            validate_access_token("not.a.jwt", SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_issuer_rejected() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 1).unwrap();
        assert!(matches!(
            validate_access_token(&token, SECRET, "someone-else"),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 1).unwrap();
        assert!(matches!(
            validate_access_token(&token, "other-secret", ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn tampered_signature_rejected() {
        let token = issue_access_token("account-1", SECRET, ISSUER, 1).unwrap();
        let (signed, sig) = token.rsplit_once('.').unwrap();
        let mut sig: Vec<char> = sig.chars().collect();
        sig[10] = if sig[10] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{signed}.{}", sig.into_iter().collect::<String>());

        assert!(matches!(
            validate_access_token(&tampered, SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_access_token("account-1", SECRET, ISSUER, -1).unwrap();
        assert!(matches!(
            validate_access_token(&token, SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn out_of_range_lifetime_is_a_signing_error() {
        let err = issue_access_token("account-1", SECRET, ISSUER, i64::MAX).unwrap_err();
        assert!(matches!(err, TokenError::Signing(_)));
    }

    #[test]
    fn expiry_within_leeway_accepted() {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: "account-1".into(),
            iss: ISSUER.into(),
            aud: vec!["account-1".into()],
            iat: now - 60,
            nbf: now - 60,
            exp: now - 2,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(decode_access_token(&token, SECRET, ISSUER, 30).is_ok());
        assert!(decode_access_token(&token, SECRET, ISSUER, 0).is_err());
    }

    #[test]
    fn not_yet_valid_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: "account-1".into(),
            iss: ISSUER.into(),
            aud: vec!["account-1".into()],
            iat: now,
            nbf: now + 600,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            validate_access_token(&token, SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn empty_subject_rejected() {
        let token = issue_access_token("", SECRET, ISSUER, 1).unwrap();
        assert!(matches!(
            validate_access_token(&token, SECRET, ISSUER),
            Err(TokenError::Unauthorized)
        ));
    }

    #[test]
    fn other_algorithm_rejected() {
        let now = Utc::now().timestamp();
        let claims = AccessTokenClaims {
            sub: "account-1".into(),
            iss: ISSUER.into(),
            aud: vec!["account-1".into()],
            iat: now,
            nbf: now,
            exp: now + 3600,
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_access_token(&token, SECRET, ISSUER).is_err());
    }
}
