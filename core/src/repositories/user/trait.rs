//! Identity store contract consumed by the authentication services.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for looking up platform identities
///
/// Persistence lives outside this crate; implementations adapt whatever
/// store holds the authoritative user records.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use inno_core::repositories::UserRepository;
/// use inno_core::domain::entities::user::User;
/// use inno_core::errors::DomainError;
///
/// struct PgUserRepository {
///     // connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for PgUserRepository {
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email
    ///
    /// # Arguments
    /// * `email` - Institutional email, also used as token subject
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    /// * `Err(DomainError)` - Store failure
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
