use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::interpolation::{
    interpolate_toml,
    InterpolationError,
};
use super::schema::GlobalConfiguration;

pub const CONFIG_PATH_ENV: &str = "TOPAZ_COMMON_CONFIG_PATH";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type ConfigLoadResult<T> = Result<T, ConfigLoadError>;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn discover_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            tracing::debug!("Using config path from {}: {}", CONFIG_PATH_ENV, path);
            return PathBuf::from(path);
        }

        let path = GlobalConfiguration::default_config_path();
        tracing::debug!("Using default config path: {}", path.display());
        path
    }

    pub fn load_default() -> ConfigLoadResult<GlobalConfiguration> {
        Self::load_or_default(&Self::discover_config_path())
    }

    pub fn load(path: &Path) -> ConfigLoadResult<GlobalConfiguration> {
        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        tracing::info!(
            path = %path.display(),
            host_connections = config.host_connections.len(),
            "Loaded global configuration"
        );

        Ok(config)
    }

    /// Loads `path`, or returns an empty configuration when it does not exist.
    pub fn load_or_default(path: &Path) -> ConfigLoadResult<GlobalConfiguration> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(
                "No config at {}, starting from defaults",
                path.display()
            );
            Ok(GlobalConfiguration::default())
        }
    }

    pub fn parse(content: &str) -> ConfigLoadResult<GlobalConfiguration> {
        let mut value: toml::Value = toml::from_str(content)?;

        interpolate_toml(&mut value)?;

        let config: GlobalConfiguration = value.try_into().map_err(|e| {
            ConfigLoadError::InvalidConfig(format!("Failed to deserialize config: {}", e))
        })?;

        let validation = config.validate();
        for error in &validation.errors {
            tracing::warn!("Config error: {}", error);
        }
        for warning in &validation.warnings {
            tracing::debug!("Config warning: {}", warning);
        }

        Ok(config)
    }

    pub fn to_toml(config: &GlobalConfiguration) -> ConfigLoadResult<String> {
        Ok(toml::to_string_pretty(config)?)
    }

    pub fn save(config: &GlobalConfiguration, path: &Path) -> ConfigLoadResult<()> {
        let content = Self::to_toml(config)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "Wrote global configuration");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use topaz_common_api::{
        CesConnection,
        CesToken,
        HostConnection,
    };

    use super::*;

    #[test]
    fn test_parse_full_config() {
        let content = r#"
[cli]
linux_location = "/opt/topaz"

[[host_connections]]
description = "Test system"
host_port = "cw01:1234"
protocol = "TLSv1.2"
code_page = "1047"
timeout = ""
connection_id = "1"

[[host_connections]]
description = "Second"
host_port = "cw02:4321"
code_page = "037"

[ces]
url = "http://ces:2020"

[[ces.tokens]]
host_name = "cw01"
token = "secret"
ces_token_id = "t1"
"#;

        let config = ConfigLoader::parse(content).unwrap();
        assert_eq!(config.cli.linux_location, "/opt/topaz");
        assert_eq!(
            config.cli.windows_location,
            super::super::schema::DEFAULT_WINDOWS_LOCATION
        );

        assert_eq!(config.host_connections.len(), 2);
        let first = &config.host_connections[0];
        assert_eq!(first.host(), "cw01");
        assert_eq!(first.timeout(), "0");
        assert_eq!(first.connection_id(), "1");
        assert!(!config.host_connections[1].connection_id().is_empty());

        let ces = config.ces.unwrap();
        assert_eq!(ces.url(), "http://ces:2020");
        assert_eq!(ces.tokens()[0].ces_token_id(), "t1");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = ConfigLoader::parse("").unwrap();
        assert!(config.host_connections.is_empty());
        assert!(config.ces.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = ConfigLoader::parse("[[host_connections]\n");
        assert!(matches!(result, Err(ConfigLoadError::ParseError(_))));
    }

    #[test]
    fn test_parse_with_env_token() {
        std::env::set_var("TOPAZ_TEST_LOADER_TOKEN", "from-env");
        let content = r#"
[ces]
url = "http://ces:2020"

[[ces.tokens]]
host_name = "cw01"
token = "${TOPAZ_TEST_LOADER_TOKEN}"
"#;

        let config = ConfigLoader::parse(content).unwrap();
        let ces = config.ces.unwrap();
        let token = ces.find_token_by_host("cw01").unwrap();
        assert_eq!(
            secrecy::ExposeSecret::expose_secret(token.token()),
            "from-env"
        );
        std::env::remove_var("TOPAZ_TEST_LOADER_TOKEN");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        assert!(matches!(
            ConfigLoader::load(&path),
            Err(ConfigLoadError::FileNotFound(_))
        ));
        let config = ConfigLoader::load_or_default(&path).unwrap();
        assert!(config.host_connections.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = GlobalConfiguration {
            host_connections: vec![HostConnection::new("Test", "cw01:1234", "1047")
                .with_connection_id("1")
                .with_timeout("30")],
            ces: Some(CesConnection::new(
                "http://ces:2020",
                vec![CesToken::new("cw01", "secret").with_id("t1")],
            )),
            ..Default::default()
        };
        ConfigLoader::save(&config, &path).unwrap();

        let loaded = ConfigLoader::load(&path).unwrap();
        assert_eq!(loaded.host_connections, config.host_connections);
        assert_eq!(loaded.cli, config.cli);
        assert_eq!(
            loaded.ces.unwrap().tokens()[0].host_name(),
            "cw01"
        );
    }

    #[test]
    fn test_to_toml() {
        let config = GlobalConfiguration {
            host_connections: vec![HostConnection::new("Test", "cw01:1234", "1047")],
            ..Default::default()
        };
        let toml_str = ConfigLoader::to_toml(&config).unwrap();

        assert!(toml_str.contains("[cli]"));
        assert!(toml_str.contains("[[host_connections]]"));
        assert!(toml_str.contains("host_port = \"cw01:1234\""));
        assert!(!toml_str.contains("[ces]"));
    }

    #[test]
    fn test_discover_config_path_env_override() {
        std::env::set_var(CONFIG_PATH_ENV, "/custom/path/config.toml");
        let path = ConfigLoader::discover_config_path();
        assert_eq!(path, PathBuf::from("/custom/path/config.toml"));
        std::env::remove_var(CONFIG_PATH_ENV);
    }
}
