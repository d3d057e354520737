use std::fmt;
use std::sync::Arc;

use secrecy::{
    ExposeSecret,
    SecretString,
};

use crate::error::{
    CredentialError,
    CredentialResult,
};

/// Visibility context for a credential lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Project(String),
}

impl Scope {
    pub fn project(name: &str) -> Self {
        Self::Project(name.to_string())
    }

    /// A global credential is visible everywhere, a project credential only
    /// inside that project.
    pub fn can_see(&self, owner: &Scope) -> bool {
        match owner {
            Scope::Global => true,
            Scope::Project(_) => owner == self,
        }
    }
}

#[derive(Debug)]
pub struct UsernamePassword {
    username: String,
    password: SecretString,
}

impl UsernamePassword {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: SecretString::from(password.to_string()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }
}

impl Clone for UsernamePassword {
    fn clone(&self) -> Self {
        Self::new(&self.username, self.password.expose_secret())
    }
}

/// A certificate held in a keystore slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredCertificate {
    /// DER-encoded X.509 certificate
    X509(Vec<u8>),
    /// Any other certificate format, identified by its type name
    Other(String),
}

/// Read-only view of a certificate keystore.
pub trait KeyStore: Send + Sync {
    /// Aliases in keystore order. Fails when the keystore cannot be opened.
    fn aliases(&self) -> CredentialResult<Vec<String>>;

    fn certificate(&self, alias: &str) -> CredentialResult<Option<StoredCertificate>>;

    /// Every entry with its alias, read in one pass.
    fn entries(&self) -> CredentialResult<Vec<(String, StoredCertificate)>> {
        let mut entries = Vec::new();
        for alias in self.aliases()? {
            if let Some(certificate) = self.certificate(&alias)? {
                entries.push((alias, certificate));
            }
        }
        Ok(entries)
    }
}

#[derive(Clone)]
pub struct CertificateCredential {
    keystore: Arc<dyn KeyStore>,
}

impl CertificateCredential {
    pub fn new(keystore: Arc<dyn KeyStore>) -> Self {
        Self { keystore }
    }

    pub fn keystore(&self) -> &dyn KeyStore {
        self.keystore.as_ref()
    }
}

impl fmt::Debug for CertificateCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateCredential").finish_non_exhaustive()
    }
}

/// Every credential kind a store may hold.
#[derive(Debug, Clone)]
pub enum CredentialKind {
    UsernamePassword(UsernamePassword),
    Certificate(CertificateCredential),
    /// A kind the CLI cannot use, e.g. a secret text or SSH key
    Other(String),
}

impl CredentialKind {
    pub fn type_name(&self) -> &str {
        match self {
            Self::UsernamePassword(_) => "username/password",
            Self::Certificate(_) => "certificate",
            Self::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub id: String,
    pub description: String,
    pub kind: CredentialKind,
}

impl StoredCredential {
    pub fn new(id: &str, kind: CredentialKind) -> Self {
        Self {
            id: id.to_string(),
            description: String::new(),
            kind,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Credential material the CLI accepts.
#[derive(Debug, Clone)]
pub enum Credential {
    UsernamePassword(UsernamePassword),
    Certificate(CertificateCredential),
}

impl TryFrom<StoredCredential> for Credential {
    type Error = CredentialError;

    fn try_from(stored: StoredCredential) -> Result<Self, Self::Error> {
        match stored.kind {
            CredentialKind::UsernamePassword(credential) => Ok(Self::UsernamePassword(credential)),
            CredentialKind::Certificate(credential) => Ok(Self::Certificate(credential)),
            CredentialKind::Other(kind) => Err(CredentialError::UnsupportedType(kind)),
        }
    }
}

/// External credential store.
pub trait CredentialStore: Send + Sync {
    /// All credentials visible from `scope`, in store order.
    fn credentials(&self, scope: &Scope) -> CredentialResult<Vec<StoredCredential>>;
}
