use std::sync::{
    PoisonError,
    RwLock,
};

use topaz_common_api::{
    CredentialError,
    CredentialResult,
    CredentialStore,
    Scope,
    StoredCredential,
};

/// In-process credential store.
///
/// Each credential is owned by a scope; lookups return what the requesting
/// scope can see, in insertion order.
pub struct MemoryCredentialStore {
    credentials: RwLock<Vec<(Scope, StoredCredential)>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(Vec::new()),
        }
    }

    pub fn add(&self, owner: Scope, credential: StoredCredential) -> CredentialResult<()> {
        let mut credentials = self
            .credentials
            .write()
            .map_err(|e| CredentialError::Store(format!("Lock poisoned: {}", e)))?;
        tracing::debug!(
            credential_id = %credential.id,
            kind = credential.kind.type_name(),
            "Adding credential"
        );
        credentials.push((owner, credential));
        Ok(())
    }

    pub fn with_credential(mut self, owner: Scope, credential: StoredCredential) -> Self {
        self.credentials
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .push((owner, credential));
        self
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn credentials(&self, scope: &Scope) -> CredentialResult<Vec<StoredCredential>> {
        let credentials = self
            .credentials
            .read()
            .map_err(|e| CredentialError::Store(format!("Lock poisoned: {}", e)))?;

        Ok(credentials
            .iter()
            .filter(|(owner, _)| scope.can_see(owner))
            .map(|(_, credential)| credential.clone())
            .collect())
    }
}
