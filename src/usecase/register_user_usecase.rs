use tracing::{info, warn};

use crate::domain::{
    error::DomainError,
    models::user::{NewUser, User},
    repositories::user_repository::UserRepository,
};

pub struct RegisterUserUsecase<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> RegisterUserUsecase<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }

    /// Validate the submission and append it to the store.
    ///
    /// The store is not touched when validation fails.
    pub async fn register(
        &self,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
    ) -> Result<User, DomainError>
    where
        R: Send + Sync,
    {
        let new_user = NewUser::parse(name, email, password).inspect_err(|reason| {
            warn!(%reason, "registration rejected");
        })?;

        let user = self.user_repository.register(new_user).await?;
        info!(id = %user.id(), "user registered");

        Ok(user)
    }
}
