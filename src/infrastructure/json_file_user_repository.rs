use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

use crate::domain::{
    error::RepositoryError,
    models::user::{NewUser, User, UserId},
    repositories::user_repository::UserRepository,
};

/// Users collection stored as a single JSON array on disk.
///
/// Every call re-reads the file. Registrations are serialized through `write_lock`
/// so concurrent submissions cannot overwrite each other's appends.
#[derive(Clone)]
pub struct JsonFileUserRepository {
    path: Arc<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<User>, RepositoryError> {
        let data = match fs::read_to_string(self.path.as_path()).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file absent, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to read store file");
                return Err(RepositoryError::Read(e.to_string()));
            }
        };

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&data).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "store file is not a valid user list");
            RepositoryError::Read(e.to_string())
        })
    }

    /// Replace the whole file. Writes a sibling temp file first and renames it over the target.
    async fn save(&self, users: &[User]) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(users)
            .map_err(|e| RepositoryError::Write(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.write_failed(e))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| self.write_failed(e))?;
        if let Err(e) = fs::rename(&tmp_path, self.path.as_path()).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(self.write_failed(e));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, e: std::io::Error) -> RepositoryError {
        error!(path = %self.path.display(), error = %e, "failed to write store file");
        RepositoryError::Write(e.to_string())
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        self.load().await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.id() == id))
    }

    async fn register(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut users = self.load().await?;
        if users.iter().any(|u| u.email() == new_user.email()) {
            return Err(RepositoryError::DuplicateEmail);
        }

        let Some(id) = UserId::next_after(&users) else {
            error!(path = %self.path.display(), "last stored id is i64::MAX, cannot assign another");
            return Err(RepositoryError::Write("user id space exhausted".to_string()));
        };
        let user = new_user.into_user(id);
        users.push(user.clone());
        self.save(&users).await?;

        Ok(user)
    }
}
