use std::path::{
    Path,
    PathBuf,
};

use topaz_common_api::{
    CredentialError,
    CredentialResult,
    KeyStore,
    StoredCertificate,
};

const CERTIFICATE_TAG: &str = "CERTIFICATE";

enum PemSource {
    Inline(String),
    File(PathBuf),
}

/// Keystore backed by a PEM bundle.
///
/// Every block becomes one entry aliased `entry-<index>`. `CERTIFICATE`
/// blocks are X.509 entries, any other block is reported by its tag. File
/// bundles are read on each access, so an unreadable file surfaces as a
/// keystore error at lookup time.
pub struct PemKeyStore {
    source: PemSource,
}

impl PemKeyStore {
    pub fn from_pem_str(pem: &str) -> Self {
        Self {
            source: PemSource::Inline(pem.to_string()),
        }
    }

    pub fn from_file(path: &Path) -> Self {
        Self {
            source: PemSource::File(path.to_path_buf()),
        }
    }

    /// Reads and parses the bundle once.
    fn load(&self) -> CredentialResult<Vec<StoredCertificate>> {
        let content = match &self.source {
            PemSource::Inline(content) => content.clone(),
            PemSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                CredentialError::KeyStore(format!("{}: {}", path.display(), e))
            })?,
        };

        let blocks =
            pem::parse_many(content).map_err(|e| CredentialError::KeyStore(e.to_string()))?;

        Ok(blocks
            .into_iter()
            .map(|block| {
                if block.tag() == CERTIFICATE_TAG {
                    StoredCertificate::X509(block.into_contents())
                } else {
                    StoredCertificate::Other(block.tag().to_string())
                }
            })
            .collect())
    }
}

fn alias(index: usize) -> String {
    format!("entry-{}", index)
}

impl KeyStore for PemKeyStore {
    fn aliases(&self) -> CredentialResult<Vec<String>> {
        Ok((0..self.load()?.len()).map(alias).collect())
    }

    fn certificate(&self, alias: &str) -> CredentialResult<Option<StoredCertificate>> {
        let Some(index) = alias
            .strip_prefix("entry-")
            .and_then(|index| index.parse::<usize>().ok())
        else {
            return Ok(None);
        };

        Ok(self.load()?.into_iter().nth(index))
    }

    fn entries(&self) -> CredentialResult<Vec<(String, StoredCertificate)>> {
        Ok(self
            .load()?
            .into_iter()
            .enumerate()
            .map(|(index, certificate)| (alias(index), certificate))
            .collect())
    }
}
