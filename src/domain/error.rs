use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Repository error: {0}")]
    Repository(RepositoryError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("User already exists")]
    Conflict,

    #[error("User not found")]
    NotFound,
}

/// Reasons a registration submission is rejected before touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingField,

    #[error("Name must contain only letters and spaces")]
    BadName,

    #[error("Invalid email format")]
    BadEmail,

    #[error("Password must be at least 8 characters long")]
    ShortPassword,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Could not read data file: {0}")]
    Read(String),

    #[error("Could not save user data: {0}")]
    Write(String),
}

impl From<RepositoryError> for DomainError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::DuplicateEmail => DomainError::Conflict,
            other => DomainError::Repository(other),
        }
    }
}
