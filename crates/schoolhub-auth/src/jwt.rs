//! JWT issuing and verification.
//!
//! Any failure to decode (bad signature, malformed token, expired `exp`,
//! unknown role) is reported as a single 401 so callers cannot tell the
//! cases apart.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use schoolhub_config::JwtConfig;
use schoolhub_core::{AppError, Role};

use crate::claims::Claims;

/// Issues a signed access token for `subject_id` with the given role.
///
/// # Errors
///
/// Returns an internal error if token encoding fails.
pub fn create_access_token(
    subject_id: Uuid,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry as usize;

    let claims = Claims {
        sub: subject_id.to_string(),
        role,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// # Errors
///
/// Returns an unauthorized error if the signature is invalid, the token has
/// expired, or the token is malformed.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_plus_day() -> usize {
        Utc::now().timestamp() as usize + 86_400
    }

    fn config(secret: &str) -> JwtConfig {
        JwtConfig::new(secret).unwrap()
    }

    #[test]
    fn round_trip_returns_subject_and_role() {
        let config = config("round-trip-secret");
        for role in Role::ALL {
            let id = Uuid::new_v4();
            let token = create_access_token(id, role, &config).unwrap();
            let claims = verify_token(&token, &config).unwrap();
            assert_eq!(claims.subject_id().unwrap(), id);
            assert_eq!(claims.role, role);
            assert_eq!(claims.exp - claims.iat, 86_400);
        }
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = create_access_token(Uuid::new_v4(), Role::Admin, &config("one")).unwrap();
        let err = verify_token(&token, &config("two")).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn rejects_expired_token() {
        let config = config("expiry-secret");
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::Teacher,
            iat: now - 2 * 86_400,
            exp: now - 86_400,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn rejects_tampered_payload() {
        let config = config("tamper-secret");
        let token = create_access_token(Uuid::new_v4(), Role::Student, &config).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::SuperAdmin,
            iat: 0,
            exp: now_plus_day(),
        };
        let forged_token = encode(
            &Header::default(),
            &forged,
            &EncodingKey::from_secret(b"attacker"),
        )
        .unwrap();
        parts[1] = forged_token.split('.').nth(1).unwrap().to_string();

        assert!(verify_token(&parts.join("."), &config).is_err());
    }

    #[test]
    fn rejects_garbage() {
        let config = config("garbage-secret");
        assert!(verify_token("", &config).is_err());
        assert!(verify_token("not.a.jwt", &config).is_err());
    }
}
