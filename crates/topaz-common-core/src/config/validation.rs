use std::collections::HashSet;

use secrecy::ExposeSecret;
use topaz_common_api::{
    CesConnection,
    HostConnection,
    HostPort,
};

use super::schema::GlobalConfiguration;

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigError>,
    pub warnings: Vec<ConfigWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: String, message: String, code: ConfigErrorCode) {
        self.errors.push(ConfigError {
            field,
            message,
            code,
        });
    }

    pub fn add_warning(&mut self, field: String, message: String, code: ConfigWarningCode) {
        self.warnings.push(ConfigWarning {
            field,
            message,
            code,
        });
    }

    pub fn summary(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            "Configuration is valid".to_string()
        } else {
            format!(
                "{} error(s), {} warning(s)",
                self.errors.len(),
                self.warnings.len()
            )
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub field: String,
    pub message: String,
    pub code: ConfigErrorCode,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorCode {
    MissingRequired,
    InvalidValue,
    DuplicateId,
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "MISSING_REQUIRED"),
            Self::InvalidValue => write!(f, "INVALID_VALUE"),
            Self::DuplicateId => write!(f, "DUPLICATE_ID"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub code: ConfigWarningCode,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigWarningCode {
    NoEncryption,
    NoTokens,
}

impl std::fmt::Display for ConfigWarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEncryption => write!(f, "NO_ENCRYPTION"),
            Self::NoTokens => write!(f, "NO_TOKENS"),
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &GlobalConfiguration) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::validate_host_connections(&config.host_connections, &mut result);
        if let Some(ces) = &config.ces {
            Self::validate_ces(ces, &mut result);
        }

        result
    }

    fn validate_host_connections(connections: &[HostConnection], result: &mut ValidationResult) {
        let mut seen_ids = HashSet::new();

        for (index, connection) in connections.iter().enumerate() {
            let prefix = format!("host_connections[{}]", index);

            if connection.description().is_empty() {
                result.add_error(
                    format!("{}.description", prefix),
                    "Connection description is required".to_string(),
                    ConfigErrorCode::MissingRequired,
                );
            }

            if let Err(e) = HostPort::parse(connection.host_port()) {
                result.add_error(
                    format!("{}.host_port", prefix),
                    e.to_string(),
                    ConfigErrorCode::InvalidValue,
                );
            }

            if !is_numeric(connection.code_page()) {
                result.add_error(
                    format!("{}.code_page", prefix),
                    format!("Code page '{}' must be numeric", connection.code_page()),
                    ConfigErrorCode::InvalidValue,
                );
            }

            if !is_numeric(connection.timeout()) {
                result.add_error(
                    format!("{}.timeout", prefix),
                    format!(
                        "Timeout '{}' must be a non-negative number of seconds",
                        connection.timeout()
                    ),
                    ConfigErrorCode::InvalidValue,
                );
            }

            if !seen_ids.insert(connection.connection_id().to_lowercase()) {
                result.add_error(
                    format!("{}.connection_id", prefix),
                    format!(
                        "Connection id '{}' is used more than once",
                        connection.connection_id()
                    ),
                    ConfigErrorCode::DuplicateId,
                );
            }

            if !connection.has_protocol() {
                result.add_warning(
                    format!("{}.protocol", prefix),
                    format!(
                        "Connection '{}' does not use an encryption protocol",
                        connection.description()
                    ),
                    ConfigWarningCode::NoEncryption,
                );
            }
        }
    }

    fn validate_ces(ces: &CesConnection, result: &mut ValidationResult) {
        if ces.url().is_empty() {
            result.add_error(
                "ces.url".to_string(),
                "CES URL is required".to_string(),
                ConfigErrorCode::MissingRequired,
            );
        }

        if ces.tokens().is_empty() {
            result.add_warning(
                "ces.tokens".to_string(),
                "CES is configured without any host tokens".to_string(),
                ConfigWarningCode::NoTokens,
            );
        }

        let mut seen_ids = HashSet::new();
        for (index, token) in ces.tokens().iter().enumerate() {
            let prefix = format!("ces.tokens[{}]", index);

            if token.host_name().is_empty() {
                result.add_error(
                    format!("{}.host_name", prefix),
                    "Host name is required".to_string(),
                    ConfigErrorCode::MissingRequired,
                );
            }

            if token.token().expose_secret().trim().is_empty() {
                result.add_error(
                    format!("{}.token", prefix),
                    "Token is required".to_string(),
                    ConfigErrorCode::MissingRequired,
                );
            }

            if !seen_ids.insert(token.ces_token_id()) {
                result.add_error(
                    format!("{}.ces_token_id", prefix),
                    format!("CES token id '{}' is used more than once", token.ces_token_id()),
                    ConfigErrorCode::DuplicateId,
                );
            }
        }
    }
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

impl GlobalConfiguration {
    pub fn validate(&self) -> ValidationResult {
        ConfigValidator::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use topaz_common_api::CesToken;

    use super::*;

    fn valid_connection(id: &str) -> HostConnection {
        HostConnection::new("Test", "cw01:1234", "1047")
            .with_protocol("TLSv1.2")
            .with_connection_id(id)
    }

    #[test]
    fn test_valid_config() {
        let config = GlobalConfiguration {
            host_connections: vec![valid_connection("1"), valid_connection("2")],
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.is_ok());
        assert_eq!(result.summary(), "Configuration is valid");
    }

    #[test]
    fn test_invalid_host_port() {
        let config = GlobalConfiguration {
            host_connections: vec![HostConnection::new("Test", "cw01", "1047")],
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "host_connections[0].host_port"
            && e.code == ConfigErrorCode::InvalidValue));
    }

    #[test]
    fn test_non_numeric_code_page_and_timeout() {
        let config = GlobalConfiguration {
            host_connections: vec![
                HostConnection::new("Test", "cw01:1234", "ebcdic").with_timeout("soon")
            ],
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field.ends_with(".code_page")));
        assert!(result.errors.iter().any(|e| e.field.ends_with(".timeout")));
    }

    #[test]
    fn test_duplicate_ids_ignore_case() {
        let config = GlobalConfiguration {
            host_connections: vec![valid_connection("abc"), valid_connection("ABC")],
            ..Default::default()
        };

        let result = config.validate();
        assert!(result
            .errors
            .iter()
            .any(|e| e.code == ConfigErrorCode::DuplicateId));
    }

    #[test]
    fn test_missing_protocol_warning() {
        let config = GlobalConfiguration {
            host_connections: vec![HostConnection::new("Test", "cw01:1234", "1047")],
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.is_ok());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == ConfigWarningCode::NoEncryption));
        assert!(result.summary().contains("1 warning(s)"));
    }

    #[test]
    fn test_ces_validation() {
        let config = GlobalConfiguration {
            ces: Some(CesConnection::new(
                "",
                vec![
                    CesToken::new("", "token").with_id("t1"),
                    CesToken::new("cw01", "  ").with_id("t1"),
                ],
            )),
            ..Default::default()
        };

        let result = config.validate();
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"ces.url"));
        assert!(fields.contains(&"ces.tokens[0].host_name"));
        assert!(fields.contains(&"ces.tokens[1].token"));
        assert!(fields.contains(&"ces.tokens[1].ces_token_id"));
    }

    #[test]
    fn test_ces_without_tokens_warning() {
        let config = GlobalConfiguration {
            ces: Some(CesConnection::new("http://ces:2020", Vec::new())),
            ..Default::default()
        };

        let result = config.validate();
        assert!(result.is_ok());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.code == ConfigWarningCode::NoTokens));
    }
}
