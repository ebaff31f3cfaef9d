use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    application::{
        dto::{LoginRequest, LoginResponse, ProfileResponse},
        password::PasswordHasher,
        token::TokenIssuer,
    },
    domain::{
        errors::DomainError,
        user::{Role, User, normalize_email},
    },
    infrastructure::UserRepository,
};

/// The account behind a verified bearer token, as currently stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn require_any(&self, roles: &[Role]) -> Result<(), DomainError> {
        if roles.contains(&self.role) {
            return Ok(());
        }
        Err(DomainError::forbidden(format!(
            "role {} may not perform this action",
            self.role
        )))
    }
}

impl From<User> for CurrentUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            role: value.role,
        }
    }
}

impl From<CurrentUser> for ProfileResponse {
    fn from(value: CurrentUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
            name: value.name,
            role: value.role,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: PasswordHasher,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, DomainError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(DomainError::validation("email and password are required"));
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(%email, "login attempt for unknown email");
            return Err(invalid_credentials());
        };

        if !self
            .hasher
            .verify(&request.password, &user.password_hash)
            .await?
        {
            warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let access_token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, role = %user.role, "user logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.tokens.ttl_secs(),
        })
    }

    /// Resolves a bearer token to the stored account it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, DomainError> {
        let claims = self.tokens.verify(token)?;
        let Some(user) = self.users.get_by_id(claims.sub).await? else {
            return Err(DomainError::unauthorized("account no longer exists"));
        };
        Ok(CurrentUser::from(user))
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::unauthorized("invalid credentials")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::password::MIN_COST,
        domain::user::{Cpf, NewUser},
        infrastructure::InMemoryStore,
    };

    async fn service_with_user() -> (AuthService, Arc<InMemoryStore>, User) {
        let store = Arc::new(InMemoryStore::new());
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        let user = UserRepository::create(
            store.as_ref(),
            NewUser {
                name: "Fabio".to_string(),
                email: "fabio@loja.com".to_string(),
                password_hash: hasher.hash("segredo").await.unwrap(),
                role: Role::Funcionario,
                cpf: Cpf::parse("22222222222").unwrap(),
            },
        )
        .await
        .unwrap();

        let service = AuthService::new(store.clone(), hasher, TokenIssuer::new("secret", 600));
        (service, store, user)
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn login_then_authenticate_round_trip() {
        let (service, _, user) = service_with_user().await;

        let response = service
            .login(login(" FABIO@loja.com ", "segredo"))
            .await
            .unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 600);

        let current = service.authenticate(&response.access_token).await.unwrap();
        assert_eq!(current.id, user.id);
        assert_eq!(current.role, Role::Funcionario);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let (service, _, _) = service_with_user().await;

        let wrong = service.login(login("fabio@loja.com", "errado")).await.unwrap_err();
        let unknown = service.login(login("ninguem@loja.com", "segredo")).await.unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn token_of_deleted_account_is_rejected() {
        let (service, store, user) = service_with_user().await;
        let token = service
            .login(login("fabio@loja.com", "segredo"))
            .await
            .unwrap()
            .access_token;

        assert!(UserRepository::delete(store.as_ref(), user.id).await.unwrap());
        assert!(matches!(
            service.authenticate(&token).await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn require_any_checks_role_membership() {
        let current = CurrentUser {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            name: "A".to_string(),
            role: Role::Funcionario,
        };

        assert!(current.require_any(&Role::STAFF).is_ok());
        assert!(matches!(
            current.require_any(&Role::MANAGERS),
            Err(DomainError::Forbidden(_))
        ));
    }
}
