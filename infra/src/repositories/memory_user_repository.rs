//! In-memory identity store

use async_trait::async_trait;
use dashmap::DashMap;

use inno_core::domain::entities::user::User;
use inno_core::errors::DomainError;
use inno_core::repositories::UserRepository;

/// Identity store keyed by lower-cased email
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        for user in users {
            repo.upsert(user);
        }
        repo
    }

    /// Inserts or replaces the user with the same email
    pub fn upsert(&self, user: User) {
        self.users.insert(user.email.to_lowercase(), user);
    }

    pub fn remove(&self, email: &str) -> Option<User> {
        self.users.remove(&email.to_lowercase()).map(|(_, user)| user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .get(&email.trim().to_lowercase())
            .map(|entry| entry.value().clone()))
    }
}
