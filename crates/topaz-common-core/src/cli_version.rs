//! Topaz CLI installation checks
//!
//! The CLI ships a `version.xml` descriptor in its install directory whose
//! root element carries a `version` attribute.

use std::cmp::Ordering;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use quick_xml::events::Event;
use quick_xml::Reader;
use topaz_common_api::constants::{
    HOST_CONNECTION_PROTOCOL_MINIMUM_VERSION,
    VERSION_FILE,
};
use topaz_common_api::{
    RemotePath,
    VersionError,
    VersionResult,
};

/// [`RemotePath`] over the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalPath {
    path: PathBuf,
}

impl LocalPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemotePath for LocalPath {
    fn exists(&self) -> io::Result<bool> {
        self.path.try_exists()
    }

    fn child(&self, name: &str) -> Box<dyn RemotePath> {
        Box::new(Self::new(self.path.join(name)))
    }

    fn read_to_string(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    fn remote(&self) -> String {
        self.path.display().to_string()
    }
}

fn components(version: &str) -> VersionResult<Vec<u64>> {
    version
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| VersionError::InvalidVersion(version.to_string()))
        })
        .collect()
}

/// Compares dotted versions component by component, padding the shorter one
/// with zeros. An empty `version` is older than anything.
pub fn compare_versions(version: &str, other: &str) -> VersionResult<Ordering> {
    if version.trim().is_empty() {
        return Ok(Ordering::Less);
    }

    let left = components(version)?;
    let right = components(other)?;

    for index in 0..left.len().max(right.len()) {
        let a = left.get(index).copied().unwrap_or(0);
        let b = right.get(index).copied().unwrap_or(0);
        match a.cmp(&b) {
            Ordering::Equal => continue,
            ordering => return Ok(ordering),
        }
    }

    Ok(Ordering::Equal)
}

/// Returns the `version` attribute of the descriptor's root element, or an
/// empty string when the attribute is absent.
///
/// Documents with a DOCTYPE are rejected and no entities are resolved.
pub fn parse_version_descriptor(content: &str) -> VersionResult<String> {
    let mut reader = Reader::from_str(content);
    let mut version: Option<String> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| {
            tracing::debug!("Version descriptor parse error: {}", e);
            VersionError::MalformedDescriptor
        })?;

        let root = match &event {
            Event::DocType(_) => {
                tracing::warn!("Rejected version descriptor containing a DOCTYPE");
                return Err(VersionError::MalformedDescriptor);
            }
            Event::Start(element) => {
                depth += 1;
                Some(element)
            }
            Event::Empty(element) => Some(element),
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(VersionError::MalformedDescriptor)?;
                None
            }
            Event::Eof => break,
            _ => None,
        };

        if let Some(element) = root.filter(|_| version.is_none()) {
            let value = match element
                .try_get_attribute("version")
                .map_err(|_| VersionError::MalformedDescriptor)?
            {
                Some(attribute) => attribute
                    .unescape_value()
                    .map_err(|_| VersionError::MalformedDescriptor)?
                    .into_owned(),
                None => String::new(),
            };
            version = Some(value);
        }
    }

    if depth != 0 {
        return Err(VersionError::MalformedDescriptor);
    }

    version.ok_or(VersionError::MalformedDescriptor)
}

/// Reads the version of the CLI installed in `cli_directory`.
pub fn read_installed_version(cli_directory: &dyn RemotePath) -> VersionResult<String> {
    if !cli_directory.exists()? {
        return Err(VersionError::NotInstalled(cli_directory.remote()));
    }

    let version_file = cli_directory.child(VERSION_FILE);
    if !version_file.exists()? {
        return Err(VersionError::VersionFileMissing(version_file.remote()));
    }

    let version = parse_version_descriptor(&version_file.read_to_string()?)?;
    tracing::debug!(
        location = %cli_directory.remote(),
        version = %version,
        "Read Topaz CLI version"
    );

    Ok(version)
}

/// Fails unless `installed` is known and at least `minimum`.
pub fn check_compatibility(installed: &str, minimum: &str) -> VersionResult<()> {
    if installed.trim().is_empty() {
        return Err(VersionError::UnknownVersion {
            minimum: minimum.to_string(),
        });
    }

    if compare_versions(installed, minimum)? == Ordering::Less {
        return Err(VersionError::OldVersion {
            installed: installed.to_string(),
            minimum: minimum.to_string(),
        });
    }

    Ok(())
}

/// Fails unless `installed` accepts the `-protocol` argument.
pub fn check_protocol_supported(installed: &str) -> VersionResult<()> {
    let minimum = HOST_CONNECTION_PROTOCOL_MINIMUM_VERSION;
    if compare_versions(installed, minimum)? == Ordering::Less {
        return Err(VersionError::ProtocolNotSupported {
            installed: installed.to_string(),
            minimum: minimum.to_string(),
        });
    }

    Ok(())
}

/// Reads the installed version and checks it against `minimum`.
///
/// Returns the installed version for later feature checks.
pub fn check_cli_compatibility(
    cli_directory: &dyn RemotePath, minimum: &str,
) -> VersionResult<String> {
    let installed = read_installed_version(cli_directory)?;
    check_compatibility(&installed, minimum)?;

    tracing::info!(
        installed = %installed,
        minimum,
        "Topaz CLI version is compatible"
    );
    Ok(installed)
}
