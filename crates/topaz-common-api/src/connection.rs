use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

use crate::error::HostPortError;

pub const DEFAULT_TIMEOUT: &str = "0";

const HOST_PORT_SEPARATOR: char = ':';

/// Returns `id` unchanged when it has content, otherwise a fresh random UUID.
pub fn generate_id(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Splits `host:port` the same way [`HostPort::parse`] reads it.
///
/// Empty segments between colons are skipped and both parts are trimmed.
/// Values without exactly two segments fall back to a split on the first
/// colon, with an empty port when there is none.
pub fn split_host_port(value: &str) -> (&str, &str) {
    let mut parts = value
        .split(HOST_PORT_SEPARATOR)
        .filter(|part| !part.is_empty());

    match (parts.next(), parts.next(), parts.next()) {
        (Some(host), Some(port), None) => (host.trim(), port.trim()),
        _ => value
            .split_once(HOST_PORT_SEPARATOR)
            .map_or((value.trim(), ""), |(host, port)| (host.trim(), port.trim())),
    }
}

/// Serialized form of a [`HostConnection`].
///
/// Every field may be missing or blank; conversion into a `HostConnection`
/// trims the values, defaults the timeout and generates a missing id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConnectionRecord {
    pub description: String,
    pub host_port: String,
    pub protocol: String,
    pub code_page: String,
    pub timeout: String,
    pub connection_id: String,
    pub ces_url: String,
}

/// A named host endpoint the Topaz CLI connects to.
///
/// Instances are immutable; a registry update replaces whole connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HostConnectionRecord", into = "HostConnectionRecord")]
pub struct HostConnection {
    description: String,
    host_port: String,
    protocol: String,
    code_page: String,
    timeout: String,
    connection_id: String,
    ces_url: String,
}

impl From<HostConnectionRecord> for HostConnection {
    fn from(record: HostConnectionRecord) -> Self {
        let timeout = record.timeout.trim();
        let timeout = if timeout.is_empty() {
            DEFAULT_TIMEOUT
        } else {
            timeout
        };

        Self {
            description: record.description.trim().to_string(),
            host_port: record.host_port.trim().to_string(),
            protocol: record.protocol.trim().to_string(),
            code_page: record.code_page.trim().to_string(),
            timeout: timeout.to_string(),
            connection_id: generate_id(Some(record.connection_id.trim())),
            ces_url: record.ces_url.trim().to_string(),
        }
    }
}

impl From<HostConnection> for HostConnectionRecord {
    fn from(connection: HostConnection) -> Self {
        Self {
            description: connection.description,
            host_port: connection.host_port,
            protocol: connection.protocol,
            code_page: connection.code_page,
            timeout: connection.timeout,
            connection_id: connection.connection_id,
            ces_url: connection.ces_url,
        }
    }
}

impl HostConnection {
    /// Creates a connection with no protocol, the default timeout and a
    /// generated id.
    pub fn new(description: &str, host_port: &str, code_page: &str) -> Self {
        HostConnectionRecord {
            description: description.to_string(),
            host_port: host_port.to_string(),
            code_page: code_page.to_string(),
            ..Default::default()
        }
        .into()
    }

    pub fn with_protocol(self, protocol: &str) -> Self {
        self.rebuild(|record| record.protocol = protocol.to_string())
    }

    pub fn with_timeout(self, timeout: &str) -> Self {
        self.rebuild(|record| record.timeout = timeout.to_string())
    }

    pub fn with_connection_id(self, connection_id: &str) -> Self {
        self.rebuild(|record| record.connection_id = connection_id.to_string())
    }

    pub fn with_ces_url(self, ces_url: &str) -> Self {
        self.rebuild(|record| record.ces_url = ces_url.to_string())
    }

    fn rebuild(self, update: impl FnOnce(&mut HostConnectionRecord)) -> Self {
        let mut record = HostConnectionRecord::from(self);
        update(&mut record);
        record.into()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    /// Host part of `host:port`, as read by [`split_host_port`].
    pub fn host(&self) -> &str {
        split_host_port(&self.host_port).0
    }

    /// Port part of `host:port`, empty when there is no colon.
    pub fn port(&self) -> &str {
        split_host_port(&self.host_port).1
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// True when a protocol other than "None" is configured.
    pub fn has_protocol(&self) -> bool {
        !self.protocol.trim().is_empty() && !self.protocol.eq_ignore_ascii_case("none")
    }

    pub fn code_page(&self) -> &str {
        &self.code_page
    }

    pub fn timeout(&self) -> &str {
        &self.timeout
    }

    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    pub fn ces_url(&self) -> &str {
        &self.ces_url
    }
}

/// A validated `host:port` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub host: String,
    pub port: String,
}

impl HostPort {
    /// Parses `host:port`.
    ///
    /// Empty segments between colons are ignored, so `host::1234` is
    /// accepted while `a:b:c` is not.
    pub fn parse(value: &str) -> Result<Self, HostPortError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(HostPortError::Empty);
        }

        let parts: Vec<&str> = value
            .split(HOST_PORT_SEPARATOR)
            .filter(|part| !part.is_empty())
            .collect();

        match parts.as_slice() {
            [host, port] => Self::validate(host.trim(), port.trim()),
            [_, _, _, ..] => Err(HostPortError::InvalidFormat),
            _ => match value.find(HOST_PORT_SEPARATOR) {
                None => Err(HostPortError::InvalidFormat),
                Some(0) => Err(HostPortError::MissingHost),
                Some(_) => Err(HostPortError::MissingPort),
            },
        }
    }

    fn validate(host: &str, port: &str) -> Result<Self, HostPortError> {
        if host.is_empty() {
            return Err(HostPortError::MissingHost);
        }
        if port.is_empty() {
            return Err(HostPortError::MissingPort);
        }
        if !port.chars().all(char::is_numeric) {
            return Err(HostPortError::InvalidPort);
        }

        Ok(Self {
            host: host.to_string(),
            port: port.to_string(),
        })
    }
}

impl std::fmt::Display for HostPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
