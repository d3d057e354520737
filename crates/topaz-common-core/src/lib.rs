pub mod arguments;
pub mod cli_version;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod registry;

#[cfg(test)]
mod test_fixtures;

use std::sync::Arc;

pub use arguments::{
    ArgumentBuilder,
    ArgumentList,
};
pub use cli_version::{
    check_cli_compatibility,
    check_compatibility,
    check_protocol_supported,
    compare_versions,
    read_installed_version,
    LocalPath,
};
pub use config::{
    CliLocations,
    ConfigLoader,
    GlobalConfiguration,
};
pub use credentials::{
    CredentialResolver,
    MemoryCredentialStore,
    PemKeyStore,
};
pub use error::{
    CoreError,
    CoreResult,
};
pub use registry::ConnectionRegistry;
use topaz_common_api::{
    CredentialStore,
    RemotePath,
    Scope,
};

/// Everything needed to prepare a Topaz CLI invocation.
pub struct CoreContext {
    pub registry: Arc<ConnectionRegistry>,

    pub credentials: Arc<CredentialResolver>,
}

/// Inputs for [`CoreContext::prepare_invocation`].
pub struct Invocation<'a> {
    pub connection_id: &'a str,
    pub credential_id: &'a str,
    pub scope: &'a Scope,
    pub cli_directory: &'a dyn RemotePath,
    pub minimum_version: &'a str,
}

impl CoreContext {
    pub fn new(registry: Arc<ConnectionRegistry>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            registry,
            credentials: Arc::new(CredentialResolver::new(store)),
        }
    }

    /// Checks the installed CLI, then resolves the connection and credential
    /// and builds the argument list.
    pub fn prepare_invocation(&self, invocation: &Invocation<'_>) -> CoreResult<ArgumentList> {
        let cli_version =
            check_cli_compatibility(invocation.cli_directory, invocation.minimum_version)?;

        let connection = self
            .registry
            .find_by_id(Some(invocation.connection_id))
            .ok_or_else(|| CoreError::ConnectionNotFound(invocation.connection_id.to_string()))?;

        let credential = self
            .credentials
            .resolve_credential(invocation.scope, invocation.credential_id)?
            .ok_or_else(|| CoreError::CredentialNotFound(invocation.credential_id.to_string()))?;

        Ok(ArgumentBuilder::new(&cli_version).build(&connection, &credential)?)
    }
}
