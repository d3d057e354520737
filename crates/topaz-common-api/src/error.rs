use thiserror::Error;

/// Credential lookup and certificate handling errors
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Unsupported credential type: {0}")]
    UnsupportedType(String),

    #[error("Unable to open the certificate keystore: {0}")]
    KeyStore(String),

    #[error("Unable to encode the certificate: {0}")]
    Encoding(String),

    #[error("Credential store lookup failed: {0}")]
    Store(String),
}

pub type CredentialResult<T> = Result<T, CredentialError>;

/// Topaz CLI installation and version errors
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("The Topaz Workbench CLI is not installed at {0}")]
    NotInstalled(String),

    #[error("The Topaz Workbench CLI version file {0} is missing, the installed version is unknown")]
    VersionFileMissing(String),

    #[error(
        "The installed Topaz Workbench CLI version is unknown or older than the minimum required version {minimum}"
    )]
    UnknownVersion { minimum: String },

    #[error(
        "The installed Topaz Workbench CLI version {installed} is older than the minimum required version {minimum}"
    )]
    OldVersion { installed: String, minimum: String },

    #[error(
        "Topaz Workbench CLI version {installed} does not support an encryption protocol on host connections, version {minimum} or later is required"
    )]
    ProtocolNotSupported { installed: String, minimum: String },

    #[error("Unable to parse the Topaz Workbench CLI version file")]
    MalformedDescriptor,

    #[error("Invalid version number: '{0}'")]
    InvalidVersion(String),

    #[error("Failed to read the Topaz Workbench CLI installation: {0}")]
    Io(#[from] std::io::Error),
}

pub type VersionResult<T> = Result<T, VersionError>;

/// Argument construction errors
#[derive(Error, Debug)]
pub enum ArgumentError {
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

pub type ArgumentResult<T> = Result<T, ArgumentError>;

/// Reasons a `host:port` value is rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPortError {
    #[error("Host:port is required")]
    Empty,

    #[error("Host:port must be in the format host:port")]
    InvalidFormat,

    #[error("Host is missing from host:port")]
    MissingHost,

    #[error("Port is missing from host:port")]
    MissingPort,

    #[error("Port must be numeric")]
    InvalidPort,
}
