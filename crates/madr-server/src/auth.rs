use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use madr_common::models::auth::Claims;

use crate::config::AuthConfig;

/// Hash a password using argon2id
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Create an access token (JWT) with the configured TTL. The subject claim
/// is the account email.
pub fn create_access_token(email: &str, auth: &AuthConfig) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: email.to_string(),
        iat: now,
        exp: now + auth.token_expiry_minutes * 60,
    };
    jsonwebtoken::encode(
        &Header::new(auth.algorithm),
        &claims,
        &EncodingKey::from_secret(auth.secret_key.as_bytes()),
    )
    .context("Failed to create access token")
}

/// Validate an access token and return its claims. Malformed encoding, a
/// bad signature, an elapsed expiry and missing claims all collapse into
/// the same opaque error; callers must not tell these apart.
pub fn validate_access_token(token: &str, auth: &AuthConfig) -> Result<Claims> {
    let mut validation = Validation::new(auth.algorithm);
    validation.leeway = 0;
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.secret_key.as_bytes()),
        &validation,
    )
    .context("Invalid access token")?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            secret_key: "test-jwt-secret".to_string(),
            algorithm: Algorithm::HS256,
            token_expiry_minutes: 30,
            initial_user: None,
        }
    }

    #[test]
    fn test_password_hash_and_verify_correct() {
        let password = "my-secure-password";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).unwrap());
    }

    #[test]
    fn test_password_verify_wrong() {
        let hash = hash_password("correct-password").unwrap();
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_password_different_salts() {
        let password = "same-password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();
        assert_ne!(hash1, hash2);
        // Both still verify
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_jwt_create_and_validate() {
        let config = test_auth_config();
        let token = create_access_token("teste@gmail.com", &config).unwrap();
        let claims = validate_access_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "teste@gmail.com");
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_jwt_wrong_secret_fails() {
        let config = test_auth_config();
        let token = create_access_token("teste@gmail.com", &config).unwrap();
        let other = AuthConfig {
            secret_key: "another-secret".to_string(),
            ..test_auth_config()
        };
        assert!(validate_access_token(&token, &other).is_err());
    }

    #[test]
    fn test_jwt_garbage_fails() {
        let config = test_auth_config();
        assert!(validate_access_token("not-a-token", &config).is_err());
    }

    #[test]
    fn test_jwt_expired_fails() {
        let config = test_auth_config();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "teste@gmail.com".to_string(),
            iat: now - 3600,
            exp: now - 1800,
        };
        let token = jsonwebtoken::encode(
            &Header::new(config.algorithm),
            &claims,
            &EncodingKey::from_secret(config.secret_key.as_bytes()),
        )
        .unwrap();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_jwt_missing_subject_fails() {
        let config = test_auth_config();
        let now = chrono::Utc::now().timestamp();
        // Token signed with the right secret but carrying no `sub` claim.
        let token = jsonwebtoken::encode(
            &Header::new(config.algorithm),
            &serde_json::json!({"subs": "nome", "iat": now, "exp": now + 600}),
            &EncodingKey::from_secret(config.secret_key.as_bytes()),
        )
        .unwrap();
        assert!(validate_access_token(&token, &config).is_err());
    }

    #[test]
    fn test_jwt_expiry_tracks_config() {
        let config = AuthConfig {
            token_expiry_minutes: 5,
            ..test_auth_config()
        };
        let token = create_access_token("teste@gmail.com", &config).unwrap();
        let claims = validate_access_token(&token, &config).unwrap();
        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }
}
