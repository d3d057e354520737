//! Shared vocabulary for Topaz CLI integrations
//!
//! This crate holds the value types and collaborator traits that callers
//! exchange with `topaz-common-core`:
//! - `connection` - host connections and `host:port` parsing
//! - `ces` - CES endpoint and its per-host tokens
//! - `credential` - credential variants and the store/keystore seams
//! - `remote` - the filesystem abstraction used to locate the CLI
//! - `constants` - CLI flag spellings
//! - `utils` - script escaping helpers
//!
//! # Example Usage
//!
//! ```
//! use topaz_common_api::{utils::escape_for_script, HostConnection};
//!
//! let connection = HostConnection::new("Test system", "cw01:1234", "1047");
//! assert_eq!(connection.timeout(), "0");
//! assert_eq!(escape_for_script(connection.host()), "\"cw01\"");
//! ```

pub mod ces;
pub mod connection;
pub mod constants;
pub mod credential;
pub mod error;
pub mod remote;
pub mod utils;

pub use ces::{
    CesConnection,
    CesConnectionRecord,
    CesToken,
    CesTokenRecord,
};
pub use connection::{
    generate_id,
    split_host_port,
    HostConnection,
    HostConnectionRecord,
    HostPort,
};
pub use credential::{
    CertificateCredential,
    Credential,
    CredentialKind,
    CredentialStore,
    KeyStore,
    Scope,
    StoredCertificate,
    StoredCredential,
    UsernamePassword,
};
pub use error::{
    ArgumentError,
    ArgumentResult,
    CredentialError,
    CredentialResult,
    HostPortError,
    VersionError,
    VersionResult,
};
pub use remote::RemotePath;
