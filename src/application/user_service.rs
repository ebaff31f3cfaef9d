use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        dto::{
            CreateUserRequest, ListUsersQueryRequest, PaginatedResponse, UpdateUserRequest,
            UserResponse,
        },
        password::PasswordHasher,
    },
    domain::{
        errors::DomainError,
        user::{Cpf, NewUser, Role, User, UserPatch, UserScope, normalize_email},
    },
    infrastructure::UserRepository,
};

/// Credentials for the manager account created at startup or from the CLI.
#[derive(Debug, Clone)]
pub struct ManagerAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub cpf: String,
}

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }

    pub async fn create_user(
        &self,
        scope: UserScope,
        request: CreateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        request.validate()?;

        let role = request.role.unwrap_or(scope.default_role());
        ensure_in_scope(scope, role)?;

        let email = normalize_email(&request.email);
        let cpf = Cpf::parse(&request.cpf)?;
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("email already exists"));
        }
        if self.repository.find_by_cpf(&cpf).await?.is_some() {
            return Err(DomainError::conflict("cpf already exists"));
        }

        let created = self
            .repository
            .create(NewUser {
                name: request.name.trim().to_string(),
                email,
                password_hash: self.hasher.hash(&request.password).await?,
                role,
                cpf,
            })
            .await?;

        info!(user_id = %created.id, role = %created.role, "{} created", scope.noun());
        Ok(UserResponse::from(created))
    }

    pub async fn get_user(&self, scope: UserScope, id: Uuid) -> Result<UserResponse, DomainError> {
        self.load_in_scope(scope, id).await.map(UserResponse::from)
    }

    pub async fn get_user_by_cpf(
        &self,
        scope: UserScope,
        raw_cpf: &str,
    ) -> Result<UserResponse, DomainError> {
        let cpf = Cpf::parse(raw_cpf)?;
        match self.repository.find_by_cpf(&cpf).await? {
            Some(user) if scope.admits(user.role) => Ok(UserResponse::from(user)),
            _ => Err(not_found(scope)),
        }
    }

    pub async fn list_users(
        &self,
        scope: UserScope,
        query: ListUsersQueryRequest,
    ) -> Result<PaginatedResponse<UserResponse>, DomainError> {
        let paged = self.repository.list(query.into_domain(scope)?).await?;
        Ok(PaginatedResponse::from(paged))
    }

    pub async fn update_user(
        &self,
        scope: UserScope,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        request.validate()?;
        if let Some(role) = request.role {
            ensure_in_scope(scope, role)?;
        }
        self.load_in_scope(scope, id).await?;

        let password_hash = match request.password.as_deref() {
            Some(password) => Some(self.hasher.hash(password).await?),
            None => None,
        };
        let patch = UserPatch {
            name: request.name.map(|name| name.trim().to_string()),
            email: request.email.as_deref().map(normalize_email),
            password_hash,
            role: request.role,
            cpf: request.cpf.as_deref().map(Cpf::parse).transpose()?,
        };

        let Some(updated) = self.repository.update(id, patch).await? else {
            return Err(not_found(scope));
        };

        info!(user_id = %updated.id, "{} updated", scope.noun());
        Ok(UserResponse::from(updated))
    }

    pub async fn delete_user(&self, scope: UserScope, id: Uuid) -> Result<(), DomainError> {
        self.load_in_scope(scope, id).await?;

        if !self.repository.delete(id).await? {
            return Err(not_found(scope));
        }

        info!(user_id = %id, "{} deleted", scope.noun());
        Ok(())
    }

    /// Creates the manager account unless one with that email exists.
    /// Returns whether an account was created.
    pub async fn ensure_manager(&self, account: ManagerAccount) -> Result<bool, DomainError> {
        let email = normalize_email(&account.email);
        if let Some(existing) = self.repository.find_by_email(&email).await? {
            if existing.role != Role::Gerente {
                return Err(DomainError::conflict(format!(
                    "{email} already belongs to a {} account",
                    existing.role
                )));
            }
            return Ok(false);
        }

        self.create_user(
            UserScope::Staff,
            CreateUserRequest {
                name: account.name,
                email,
                password: account.password,
                cpf: account.cpf,
                role: Some(Role::Gerente),
            },
        )
        .await?;

        Ok(true)
    }

    async fn load_in_scope(&self, scope: UserScope, id: Uuid) -> Result<User, DomainError> {
        match self.repository.get_by_id(id).await? {
            Some(user) if scope.admits(user.role) => Ok(user),
            _ => Err(not_found(scope)),
        }
    }
}

fn ensure_in_scope(scope: UserScope, role: Role) -> Result<(), DomainError> {
    if scope.admits(role) {
        return Ok(());
    }
    Err(DomainError::forbidden(format!(
        "role {role} cannot be managed as {}",
        scope.noun()
    )))
}

fn not_found(scope: UserScope) -> DomainError {
    DomainError::not_found(format!("{} not found", scope.noun()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{application::password::MIN_COST, infrastructure::InMemoryStore};

    fn service() -> UserService {
        UserService::new(
            Arc::new(InMemoryStore::new()),
            PasswordHasher::new(MIN_COST).unwrap(),
        )
    }

    fn create(name: &str, email: &str, cpf: &str, role: Option<Role>) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: "segredo".to_string(),
            cpf: cpf.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn client_scope_defaults_role_and_refuses_staff_roles() {
        let service = service();

        let created = service
            .create_user(
                UserScope::Clients,
                create("Carla", "carla@mail.com", "111.111.111-11", None),
            )
            .await
            .unwrap();
        assert_eq!(created.role, Role::Cliente);
        assert_eq!(created.cpf, "11111111111");

        let escalated = service
            .create_user(
                UserScope::Clients,
                create("Mallory", "m@mail.com", "99999999999", Some(Role::Gerente)),
            )
            .await;
        assert!(matches!(escalated, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn scopes_hide_each_others_users() {
        let service = service();
        let client = service
            .create_user(
                UserScope::Clients,
                create("Carla", "carla@mail.com", "11111111111", None),
            )
            .await
            .unwrap();

        assert!(matches!(
            service.get_user(UserScope::Staff, client.id).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service.get_user_by_cpf(UserScope::Staff, "11111111111").await,
            Err(DomainError::NotFound(_))
        ));
        assert_eq!(
            service
                .get_user_by_cpf(UserScope::Clients, "111.111.111-11")
                .await
                .unwrap()
                .id,
            client.id
        );
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let service = service();
        service
            .create_user(UserScope::Clients, create("A", "dup@mail.com", "11111111111", None))
            .await
            .unwrap();

        let duplicate = service
            .create_user(UserScope::Staff, create("B", "DUP@mail.com", "22222222222", None))
            .await;
        assert!(matches!(duplicate, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn password_update_is_rehashed() {
        let repository = Arc::new(InMemoryStore::new());
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        let service = UserService::new(repository.clone(), hasher);
        let created = service
            .create_user(UserScope::Staff, create("Fabio", "f@loja.com", "22222222222", None))
            .await
            .unwrap();

        service
            .update_user(
                UserScope::Staff,
                created.id,
                UpdateUserRequest {
                    password: Some("nova-senha".to_string()),
                    ..UpdateUserRequest::default()
                },
            )
            .await
            .unwrap();

        let stored = UserRepository::get_by_id(repository.as_ref(), created.id)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "nova-senha");
        assert!(hasher.verify("nova-senha", &stored.password_hash).await.unwrap());
    }

    #[tokio::test]
    async fn ensure_manager_is_idempotent() {
        let service = service();
        let account = ManagerAccount {
            name: "Gerson".to_string(),
            email: "gerente@loja.com".to_string(),
            password: "segredo".to_string(),
            cpf: "33333333333".to_string(),
        };

        assert!(service.ensure_manager(account.clone()).await.unwrap());
        assert!(!service.ensure_manager(account).await.unwrap());
    }

    #[tokio::test]
    async fn ensure_manager_refuses_email_of_other_role() {
        let service = service();
        service
            .create_user(
                UserScope::Clients,
                create("Carla", "carla@mail.com", "11111111111", None),
            )
            .await
            .unwrap();

        let result = service
            .ensure_manager(ManagerAccount {
                name: "Gerson".to_string(),
                email: "carla@mail.com".to_string(),
                password: "segredo".to_string(),
                cpf: "33333333333".to_string(),
            })
            .await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }
}
