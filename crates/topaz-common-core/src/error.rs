use thiserror::Error;
use topaz_common_api::{
    ArgumentError,
    CredentialError,
    VersionError,
};

/// Failure of a complete CLI invocation setup
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Host connection not found: {0}")]
    ConnectionNotFound(String),

    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

pub type CoreResult<T> = Result<T, CoreError>;
