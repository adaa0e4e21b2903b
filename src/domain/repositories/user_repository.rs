use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::user::{NewUser, User, UserId},
};

/// Access to the persisted Users collection
#[async_trait]
pub trait UserRepository {
    /// Full collection in stored order
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Append a validated user as one serialized read-modify-write step.
    ///
    /// Fails with `DuplicateEmail` (store untouched) if the email is already taken.
    async fn register(&self, new_user: NewUser) -> Result<User, RepositoryError>;
}
