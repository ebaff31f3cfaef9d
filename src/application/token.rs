use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    user::{Role, User},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks HS256 access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    pub fn issue(&self, user: &User) -> Result<String, DomainError> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> Result<String, DomainError> {
        let expires_at = i64::try_from(self.ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| DomainError::internal("token lifetime is out of range"))?;
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| DomainError::internal(format!("failed to sign token: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => DomainError::unauthorized("token expired"),
                _ => DomainError::unauthorized("invalid token"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Cpf;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Gerson".to_string(),
            email: "gerente@loja.com".to_string(),
            password_hash: String::new(),
            role: Role::Gerente,
            cpf: Cpf::parse("33333333333").unwrap(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let issuer = TokenIssuer::new("test-secret", 3600);
        let user = user();

        let claims = issuer.verify(&issuer.issue(&user).unwrap()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Gerente);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let issuer = TokenIssuer::new("test-secret", 60);
        let token = issuer
            .issue_at(&user(), Utc::now() - Duration::hours(2))
            .unwrap();

        let err = issuer.verify(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(message) if message == "token expired"));
    }

    #[test]
    fn out_of_range_lifetime_is_an_error() {
        for ttl_secs in [100_000_000_000_000, u64::MAX] {
            let result = TokenIssuer::new("test-secret", ttl_secs).issue(&user());
            assert!(matches!(result, Err(DomainError::Internal(_))));
        }
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = TokenIssuer::new("one", 3600).issue(&user()).unwrap();
        assert!(TokenIssuer::new("two", 3600).verify(&token).is_err());
        assert!(TokenIssuer::new("one", 3600).verify("garbage").is_err());
    }
}
