use aarogya_catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("an account already exists for {0}")]
    EmailTaken(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("session not found or expired")]
    InvalidSession,
    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error("profile {0} not found")]
    ProfileNotFound(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write profile file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read profile file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to serialize profile: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize profile: {0}")]
    Deserialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
