use crate::domain::errors::DomainError;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// bcrypt hashing moved off the async executor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Result<Self, DomainError> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(DomainError::validation(format!(
                "bcrypt cost must be between {MIN_COST} and {MAX_COST}"
            )));
        }
        Ok(Self { cost })
    }

    pub async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| DomainError::internal(format!("hashing task failed: {err}")))?
            .map_err(|err| DomainError::internal(format!("failed to hash password: {err}")))
    }

    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|err| DomainError::internal(format!("verification task failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_verifies_only_the_hashed_password() {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        let hash = hasher.hash("segredo").await.unwrap();

        assert_ne!(hash, "segredo");
        assert!(hasher.verify("segredo", &hash).await.unwrap());
        assert!(!hasher.verify("errado", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_a_mismatch() {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        assert!(!hasher.verify("segredo", "not-a-hash").await.unwrap());
    }

    #[test]
    fn cost_outside_bcrypt_range_is_rejected() {
        assert!(PasswordHasher::new(3).is_err());
        assert!(PasswordHasher::new(32).is_err());
    }
}
