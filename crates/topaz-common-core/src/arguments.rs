//! Command line construction for the Topaz CLI

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use secrecy::{
    ExposeSecret,
    SecretString,
};
use topaz_common_api::constants::{
    CERT_PARM,
    CODE_PAGE_PARM,
    DATA_PARM,
    HOST_PARM,
    PORT_PARM,
    PROTOCOL_PARM,
    PW_PARM,
    TARGET_FOLDER_PARM,
    TIMEOUT_PARM,
    TOPAZ_CLI_WORKSPACE,
    USERID_PARM,
};
use topaz_common_api::utils::{
    escape_for_script,
    resolve_path,
    wrap_in_double_quotes,
};
use topaz_common_api::{
    ArgumentResult,
    Credential,
    HostConnection,
};

use crate::cli_version::check_protocol_supported;
use crate::credentials::certificate_identity;

pub const MASK: &str = "******";

enum Argument {
    Plain(String),
    Masked(SecretString),
}

/// Ordered CLI arguments, some of which must never be logged.
#[derive(Default)]
pub struct ArgumentList {
    arguments: Vec<Argument>,
}

impl ArgumentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, argument: &str) -> &mut Self {
        self.arguments.push(Argument::Plain(argument.to_string()));
        self
    }

    pub fn add_pair(&mut self, flag: &str, value: &str) -> &mut Self {
        self.add(flag).add(value)
    }

    pub fn add_masked(&mut self, value: &str) -> &mut Self {
        self.arguments
            .push(Argument::Masked(SecretString::from(value.to_string())));
        self
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Real values, for handing to the process launcher.
    pub fn to_vec(&self) -> Vec<String> {
        self.arguments
            .iter()
            .map(|argument| match argument {
                Argument::Plain(value) => value.clone(),
                Argument::Masked(value) => value.expose_secret().to_string(),
            })
            .collect()
    }

    /// Values safe to log, with masked entries replaced by [`MASK`].
    pub fn to_masked_vec(&self) -> Vec<String> {
        self.arguments
            .iter()
            .map(|argument| match argument {
                Argument::Plain(value) => value.clone(),
                Argument::Masked(_) => MASK.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_masked_vec().join(" "))
    }
}

impl fmt::Debug for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_masked_vec()).finish()
    }
}

/// Builds the connection and credential arguments for one CLI invocation.
///
/// Arguments come out in a fixed order: the script (if any), host, port,
/// credential material, protocol, code page, timeout, then the optional
/// data workspace and target folder.
pub struct ArgumentBuilder {
    cli_version: String,
    script: Option<String>,
    workspace: Option<PathBuf>,
    target_folder: Option<String>,
}

impl ArgumentBuilder {
    /// `cli_version` is the installed CLI version, used to decide whether
    /// the protocol argument can be passed.
    pub fn new(cli_version: &str) -> Self {
        Self {
            cli_version: cli_version.to_string(),
            script: None,
            workspace: None,
            target_folder: None,
        }
    }

    pub fn script(mut self, script: &Path) -> Self {
        self.script = Some(script.to_string_lossy().into_owned());
        self
    }

    /// Adds `-data` pointing at the CLI workspace inside `workspace`.
    pub fn workspace(mut self, workspace: &Path) -> Self {
        self.workspace = Some(workspace.to_path_buf());
        self
    }

    /// Adds `-targetFolder`, resolved against the workspace when relative.
    pub fn target_folder(mut self, folder: &str) -> Self {
        self.target_folder = Some(folder.to_string());
        self
    }

    pub fn build(
        &self, connection: &HostConnection, credential: &Credential,
    ) -> ArgumentResult<ArgumentList> {
        let mut arguments = ArgumentList::new();

        if let Some(script) = &self.script {
            arguments.add(&escape_for_script(script));
        }

        arguments
            .add_pair(HOST_PARM, &escape_for_script(connection.host()))
            .add_pair(PORT_PARM, &escape_for_script(connection.port()));

        self.add_credential(&mut arguments, credential)?;

        if connection.has_protocol() {
            match check_protocol_supported(&self.cli_version) {
                Ok(()) => {
                    arguments.add_pair(PROTOCOL_PARM, connection.protocol());
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = connection.connection_id(),
                        protocol = connection.protocol(),
                        "Omitting protocol: {}",
                        e
                    );
                }
            }
        }

        arguments
            .add_pair(CODE_PAGE_PARM, connection.code_page())
            .add_pair(TIMEOUT_PARM, &escape_for_script(connection.timeout()));

        if let Some(workspace) = &self.workspace {
            arguments.add_pair(DATA_PARM, &resolve_path(TOPAZ_CLI_WORKSPACE, workspace));

            if let Some(folder) = &self.target_folder {
                arguments.add_pair(TARGET_FOLDER_PARM, &resolve_path(folder, workspace));
            }
        } else if let Some(folder) = &self.target_folder {
            arguments.add_pair(TARGET_FOLDER_PARM, &escape_for_script(folder));
        }

        tracing::debug!(
            connection_id = connection.connection_id(),
            arguments = %arguments,
            "Built Topaz CLI arguments"
        );

        Ok(arguments)
    }

    fn add_credential(
        &self, arguments: &mut ArgumentList, credential: &Credential,
    ) -> ArgumentResult<()> {
        match credential {
            Credential::UsernamePassword(credential) => {
                arguments
                    .add_pair(USERID_PARM, &escape_for_script(credential.username()))
                    .add(PW_PARM)
                    .add_masked(&escape_for_script(credential.password().expose_secret()));
            }
            Credential::Certificate(credential) => {
                let identity = certificate_identity(credential)?;
                let subject = identity
                    .as_ref()
                    .map_or("", |identity| identity.subject.as_str());
                arguments.add_pair(
                    USERID_PARM,
                    &escape_for_script(&wrap_in_double_quotes(subject)),
                );

                match identity {
                    Some(identity) => {
                        arguments.add_pair(CERT_PARM, &escape_for_script(&identity.encoded));
                    }
                    None => {
                        tracing::warn!(
                            "Certificate credential has no X.509 certificate, omitting {}",
                            CERT_PARM
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
