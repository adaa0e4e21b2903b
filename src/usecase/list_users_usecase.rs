use crate::domain::{
    error::DomainError, models::user::User, repositories::user_repository::UserRepository,
};

pub struct ListUsersUsecase<R: UserRepository> {
    user_repository: R,
}

impl<R: UserRepository> ListUsersUsecase<R> {
    pub fn new(user_repository: R) -> Self {
        Self { user_repository }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DomainError>
    where
        R: Send + Sync,
    {
        Ok(self.user_repository.list().await?)
    }
}
