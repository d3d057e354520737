use secrecy::{
    ExposeSecret,
    SecretString,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::connection::generate_id;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CesTokenRecord {
    pub host_name: String,
    pub token: String,
    pub ces_token_id: String,
}

/// Access token for one host on the CES endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "CesTokenRecord", into = "CesTokenRecord")]
pub struct CesToken {
    host_name: String,
    token: SecretString,
    ces_token_id: String,
}

impl Clone for CesToken {
    fn clone(&self) -> Self {
        Self {
            host_name: self.host_name.clone(),
            token: SecretString::from(self.token.expose_secret().to_string()),
            ces_token_id: self.ces_token_id.clone(),
        }
    }
}

impl From<CesTokenRecord> for CesToken {
    fn from(record: CesTokenRecord) -> Self {
        Self {
            host_name: record.host_name.trim().to_string(),
            token: SecretString::from(record.token.trim().to_string()),
            ces_token_id: generate_id(Some(record.ces_token_id.trim())),
        }
    }
}

impl From<CesToken> for CesTokenRecord {
    fn from(token: CesToken) -> Self {
        Self {
            host_name: token.host_name,
            token: token.token.expose_secret().to_string(),
            ces_token_id: token.ces_token_id,
        }
    }
}

impl CesToken {
    pub fn new(host_name: &str, token: &str) -> Self {
        CesTokenRecord {
            host_name: host_name.to_string(),
            token: token.to_string(),
            ces_token_id: String::new(),
        }
        .into()
    }

    pub fn with_id(self, ces_token_id: &str) -> Self {
        let mut record = CesTokenRecord::from(self);
        record.ces_token_id = ces_token_id.to_string();
        record.into()
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn ces_token_id(&self) -> &str {
        &self.ces_token_id
    }

    /// Same contract as [`generate_id`].
    pub fn generate_id(id: Option<&str>) -> String {
        generate_id(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CesConnectionRecord {
    pub url: String,
    pub tokens: Vec<CesTokenRecord>,
}

/// CES endpoint with its ordered token list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CesConnectionRecord", into = "CesConnectionRecord")]
pub struct CesConnection {
    url: String,
    tokens: Vec<CesToken>,
}

impl From<CesConnectionRecord> for CesConnection {
    fn from(record: CesConnectionRecord) -> Self {
        Self {
            url: record.url.trim().to_string(),
            tokens: record.tokens.into_iter().map(CesToken::from).collect(),
        }
    }
}

impl From<CesConnection> for CesConnectionRecord {
    fn from(connection: CesConnection) -> Self {
        Self {
            url: connection.url,
            tokens: connection
                .tokens
                .into_iter()
                .map(CesTokenRecord::from)
                .collect(),
        }
    }
}

impl CesConnection {
    pub fn new(url: &str, tokens: Vec<CesToken>) -> Self {
        Self {
            url: url.trim().to_string(),
            tokens,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn tokens(&self) -> &[CesToken] {
        &self.tokens
    }

    /// First token whose host matches, ignoring case.
    pub fn find_token_by_host(&self, host_name: &str) -> Option<&CesToken> {
        self.tokens
            .iter()
            .find(|token| token.host_name.eq_ignore_ascii_case(host_name.trim()))
    }

    pub fn find_token_by_id(&self, ces_token_id: &str) -> Option<&CesToken> {
        self.tokens
            .iter()
            .find(|token| token.ces_token_id == ces_token_id)
    }
}
