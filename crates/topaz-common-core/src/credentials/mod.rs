//! Credential lookup and certificate extraction
//!
//! Credentials come from an external [`CredentialStore`]. The resolver
//! narrows them to the kinds the Topaz CLI accepts, and the free functions
//! pull the X.509 subject and encoded certificate out of a keystore.

mod memory;
mod pem_keystore;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
pub use memory::MemoryCredentialStore;
pub use pem_keystore::PemKeyStore;
use topaz_common_api::{
    CertificateCredential,
    Credential,
    CredentialError,
    CredentialResult,
    CredentialStore,
    KeyStore,
    Scope,
    StoredCertificate,
    StoredCredential,
};
use x509_parser::objects::{
    oid2abbrev,
    oid_registry,
};
use x509_parser::x509::{
    AttributeTypeAndValue,
    X509Name,
};

pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Credential visible from `scope` with exactly `credential_id`.
    ///
    /// When several match, the last one in store order wins.
    pub fn resolve(
        &self, scope: &Scope, credential_id: &str,
    ) -> CredentialResult<Option<StoredCredential>> {
        let found = self
            .store
            .credentials(scope)?
            .into_iter()
            .filter(|credential| credential.id == credential_id)
            .last();

        if found.is_none() {
            tracing::debug!(credential_id, ?scope, "No credential found");
        }

        Ok(found)
    }

    /// Resolves and classifies in one step.
    pub fn resolve_credential(
        &self, scope: &Scope, credential_id: &str,
    ) -> CredentialResult<Option<Credential>> {
        self.resolve(scope, credential_id)?
            .map(classify)
            .transpose()
    }
}

/// Narrows a stored credential to one the CLI can use.
pub fn classify(stored: StoredCredential) -> CredentialResult<Credential> {
    let id = stored.id.clone();
    Credential::try_from(stored).inspect_err(|e| {
        tracing::warn!(credential_id = %id, "{}", e);
    })
}

/// DER bytes of the first X.509 entry in keystore order.
fn first_x509(keystore: &dyn KeyStore) -> CredentialResult<Option<Vec<u8>>> {
    let found = keystore
        .entries()?
        .into_iter()
        .find_map(|(_, certificate)| match certificate {
            StoredCertificate::X509(der) => Some(der),
            StoredCertificate::Other(_) => None,
        });

    if found.is_none() {
        tracing::warn!("No X.509 certificate found in the keystore");
    }
    Ok(found)
}

fn attribute_value(attribute: &AttributeTypeAndValue<'_>) -> String {
    match attribute.as_str() {
        Ok(value) => value.to_string(),
        Err(_) => {
            let hex: String = attribute
                .attr_value()
                .data
                .iter()
                .map(|byte| format!("{:02x}", byte))
                .collect();
            format!("#{}", hex)
        }
    }
}

/// Formats a distinguished name most specific RDN first
/// (`CN=jenkins, O=Compuware, C=US`), the reverse of the encoded order.
fn format_name(name: &X509Name<'_>) -> String {
    let rdns: Vec<String> = name
        .iter_rdn()
        .map(|rdn| {
            rdn.iter()
                .map(|attribute| {
                    let oid = attribute.attr_type();
                    let key = oid2abbrev(oid, oid_registry())
                        .map(str::to_string)
                        .unwrap_or_else(|_| oid.to_id_string());
                    format!("{}={}", key, attribute_value(attribute))
                })
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect();

    rdns.into_iter().rev().collect::<Vec<_>>().join(", ")
}

/// Subject and Base64 encoding of the certificate a credential presents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateIdentity {
    /// Subject DN, empty when the certificate carries no principal
    pub subject: String,
    /// DER encoding as Base64 without line breaks
    pub encoded: String,
}

/// Reads the keystore once and extracts subject and encoding of its first
/// X.509 certificate.
pub fn certificate_identity(
    credential: &CertificateCredential,
) -> CredentialResult<Option<CertificateIdentity>> {
    let Some(der) = first_x509(credential.keystore())? else {
        return Ok(None);
    };

    let (_, certificate) = x509_parser::parse_x509_certificate(&der)
        .map_err(|e| CredentialError::Encoding(e.to_string()))?;

    Ok(Some(CertificateIdentity {
        subject: format_name(certificate.subject()),
        encoded: STANDARD.encode(&der),
    }))
}

/// Subject distinguished name of the first X.509 certificate, or an empty
/// string when the keystore holds none.
pub fn certificate_subject(credential: &CertificateCredential) -> CredentialResult<String> {
    Ok(certificate_identity(credential)?
        .map(|identity| identity.subject)
        .unwrap_or_default())
}

/// Base64 of the first X.509 certificate's DER encoding, without line
/// breaks.
pub fn encode_certificate(credential: &CertificateCredential) -> CredentialResult<Option<String>> {
    Ok(certificate_identity(credential)?.map(|identity| identity.encoded))
}
