use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use topaz_common_api::{
    CesConnection,
    HostConnection,
};

pub const DEFAULT_WINDOWS_LOCATION: &str = r"C:\Program Files\Compuware\Topaz Workbench CLI";

pub const DEFAULT_LINUX_LOCATION: &str = "/opt/Compuware/TopazCLI";

/// Where the Topaz Workbench CLI is installed on build agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliLocations {
    pub windows_location: String,
    pub linux_location: String,
}

impl Default for CliLocations {
    fn default() -> Self {
        Self {
            windows_location: DEFAULT_WINDOWS_LOCATION.to_string(),
            linux_location: DEFAULT_LINUX_LOCATION.to_string(),
        }
    }
}

impl CliLocations {
    pub fn location(&self, windows: bool) -> PathBuf {
        if windows {
            PathBuf::from(&self.windows_location)
        } else {
            PathBuf::from(&self.linux_location)
        }
    }

    /// Install location for the platform this process runs on.
    pub fn current(&self) -> PathBuf {
        self.location(cfg!(windows))
    }
}

/// The persisted global configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfiguration {
    #[serde(default)]
    pub cli: CliLocations,

    #[serde(default)]
    pub host_connections: Vec<HostConnection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ces: Option<CesConnection>,
}

impl GlobalConfiguration {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("topaz-common"))
            .unwrap_or_else(|| PathBuf::from(".topaz-common"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }
}
