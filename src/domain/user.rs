use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    listing::{PageRequest, SortOrder},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Cliente,
    Funcionario,
    Gerente,
}

impl Role {
    pub const STAFF: [Role; 2] = [Role::Funcionario, Role::Gerente];
    pub const MANAGERS: [Role; 1] = [Role::Gerente];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cliente => "cliente",
            Self::Funcionario => "funcionario",
            Self::Gerente => "gerente",
        }
    }

    pub fn is_staff(self) -> bool {
        Self::STAFF.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Brazilian taxpayer id, stored as its 11 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    pub const LEN: usize = 11;

    /// Accepts punctuated input (`123.456.789-09`) and keeps only the digits.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let digits = raw
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();

        if digits.len() != Self::LEN {
            return Err(DomainError::validation("cpf must contain exactly 11 digits"));
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits of a search term written as a (partial) CPF, such as `111.111`.
    ///
    /// `None` when the term holds anything besides digits and CPF punctuation.
    pub fn search_digits(term: &str) -> Option<String> {
        let cpf_like = term
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | ' '));
        let digits = term
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>();
        (cpf_like && !digits.is_empty()).then_some(digits)
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which population of users an endpoint family manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserScope {
    Clients,
    Staff,
}

impl UserScope {
    pub fn admits(self, role: Role) -> bool {
        match self {
            Self::Clients => role == Role::Cliente,
            Self::Staff => role.is_staff(),
        }
    }

    pub fn default_role(self) -> Role {
        match self {
            Self::Clients => Role::Cliente,
            Self::Staff => Role::Funcionario,
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            Self::Clients => "client",
            Self::Staff => "employee",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub cpf: Cpf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub cpf: Cpf,
}

#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub cpf: Option<Cpf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortBy {
    #[default]
    Name,
    Email,
    Cpf,
    Role,
    CreatedAt,
}

#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: PageRequest,
    pub scope: UserScope,
    pub role: Option<Role>,
    pub search: Option<String>,
    pub sort_by: UserSortBy,
    pub order: SortOrder,
}

impl UserListQuery {
    pub fn new(scope: UserScope) -> Self {
        Self {
            page: PageRequest::default(),
            scope,
            role: None,
            search: None,
            sort_by: UserSortBy::default(),
            order: SortOrder::default(),
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return false;
    }

    !value.contains(' ')
}
