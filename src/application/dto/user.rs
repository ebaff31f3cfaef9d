use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::dto::{default_page, default_per_page, ensure_max_len, ensure_not_blank},
    domain::{
        errors::DomainError,
        listing::{PageRequest, SortOrder, normalize_search},
        user::{
            Cpf, Role, User, UserListQuery, UserScope, UserSortBy, is_valid_email,
            normalize_email,
        },
    },
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub cpf: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        Cpf::parse(&self.cpf)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.has_changes() {
            return Err(DomainError::validation(
                "at least one field must be provided for update",
            ));
        }
        if let Some(name) = self.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(email) = self.email.as_deref() {
            validate_email(email)?;
        }
        if let Some(password) = self.password.as_deref() {
            validate_password(password)?;
        }
        if let Some(cpf) = self.cpf.as_deref() {
            Cpf::parse(cpf)?;
        }
        Ok(())
    }

    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.password.is_some()
            || self.cpf.is_some()
            || self.role.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            cpf: value.cpf.to_string(),
            role: value.role,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQueryRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub sort_by: UserSortBy,
    #[serde(default)]
    pub order: SortOrder,
}

impl Default for ListUsersQueryRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            search: None,
            role: None,
            sort_by: UserSortBy::default(),
            order: SortOrder::default(),
        }
    }
}

impl ListUsersQueryRequest {
    pub fn into_domain(self, scope: UserScope) -> Result<UserListQuery, DomainError> {
        if let Some(role) = self.role
            && !scope.admits(role)
        {
            return Err(DomainError::validation(format!(
                "role {role} is not listed by this endpoint"
            )));
        }

        Ok(UserListQuery {
            page: PageRequest::new(self.page, self.per_page)?,
            scope,
            role: self.role,
            search: normalize_search(self.search),
            sort_by: self.sort_by,
            order: self.order,
        })
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    ensure_not_blank(name, "name")?;
    ensure_max_len(name, "name", 120)
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = normalize_email(email);
    ensure_not_blank(&email, "email")?;
    ensure_max_len(&email, "email", 320)?;
    if !is_valid_email(&email) {
        return Err(DomainError::validation("email must be a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            name: "Ana Souza".to_string(),
            email: "Ana@Mail.com".to_string(),
            password: "segredo".to_string(),
            cpf: "111.111.111-11".to_string(),
            role: None,
        }
    }

    #[test]
    fn create_request_accepts_well_formed_input() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn create_request_rejects_short_password_and_bad_cpf() {
        let mut short = request();
        short.password = "12345".to_string();
        assert!(short.validate().is_err());

        let mut bad_cpf = request();
        bad_cpf.cpf = "123".to_string();
        assert!(bad_cpf.validate().is_err());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UpdateUserRequest::default().validate().is_err());
    }

    #[test]
    fn list_query_rejects_role_outside_scope() {
        let query = ListUsersQueryRequest {
            role: Some(Role::Cliente),
            ..ListUsersQueryRequest::default()
        };
        assert!(query.into_domain(UserScope::Staff).is_err());
    }
}
