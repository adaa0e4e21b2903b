use tracing::debug;

use crate::domain::{
    error::DomainError,
    models::user::{User, UserId},
    repositories::user_repository::UserRepository,
};

pub struct GetUserUsecase<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> GetUserUsecase<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }

    /// Look up a user by a raw path token.
    ///
    /// Tokens without a leading number resolve to `NotFound`, not a parse error.
    pub async fn get_user(&self, raw_id: &str) -> Result<User, DomainError>
    where
        R: Send + Sync,
    {
        let Some(id) = UserId::parse_lenient(raw_id) else {
            debug!(raw_id, "user id token has no numeric prefix");
            return Err(DomainError::NotFound);
        };

        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound)
    }
}
