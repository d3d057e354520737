use std::path::Path;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

use topaz_common_api::{
    split_host_port,
    CesConnection,
    HostConnection,
};

use crate::config::{
    CliLocations,
    ConfigLoadResult,
    ConfigLoader,
    GlobalConfiguration,
};

/// Copy-on-write store of the globally configured connections.
///
/// Every update publishes a new immutable snapshot, so readers on other
/// threads see either the old or the new connection list and never a
/// partially written one.
pub struct ConnectionRegistry {
    host_connections: RwLock<Arc<[HostConnection]>>,

    ces_connection: RwLock<Option<Arc<CesConnection>>>,

    cli_locations: RwLock<Arc<CliLocations>>,

    dirty: AtomicBool,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            host_connections: RwLock::new(Arc::from(Vec::new())),
            ces_connection: RwLock::new(None),
            cli_locations: RwLock::new(Arc::new(CliLocations::default())),
            dirty: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &GlobalConfiguration) -> Self {
        tracing::debug!(
            host_connections = config.host_connections.len(),
            ces = config.ces.is_some(),
            "Building connection registry from configuration"
        );

        Self {
            host_connections: RwLock::new(Arc::from(config.host_connections.clone())),
            ces_connection: RwLock::new(config.ces.clone().map(Arc::new)),
            cli_locations: RwLock::new(Arc::new(config.cli.clone())),
            dirty: AtomicBool::new(false),
        }
    }

    /// Loads the registry from a TOML file.
    pub fn load(path: &Path) -> ConfigLoadResult<Self> {
        let config = ConfigLoader::load(path)?;
        Ok(Self::from_config(&config))
    }

    pub fn to_config(&self) -> GlobalConfiguration {
        GlobalConfiguration {
            cli: self.cli_locations().as_ref().clone(),
            host_connections: self.host_connections().to_vec(),
            ces: self.ces_connection().map(|ces| ces.as_ref().clone()),
        }
    }

    /// Writes the current snapshot and clears the dirty flag.
    pub fn save(&self, path: &Path) -> ConfigLoadResult<()> {
        ConfigLoader::save(&self.to_config(), path)?;
        self.dirty.store(false, Ordering::SeqCst);
        tracing::info!(path = %path.display(), "Saved connection registry");
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Current snapshot of host connections.
    pub fn host_connections(&self) -> Arc<[HostConnection]> {
        let guard = self
            .host_connections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replaces all host connections at once.
    pub fn set_host_connections(&self, connections: Vec<HostConnection>) {
        let count = connections.len();
        self.publish(Arc::from(connections));
        tracing::info!(count, "Replaced host connections");
    }

    /// Appends a connection by publishing a new snapshot.
    pub fn add(&self, connection: HostConnection) {
        let mut guard = self
            .host_connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut connections = guard.to_vec();
        tracing::debug!(
            connection_id = connection.connection_id(),
            "Adding host connection"
        );
        connections.push(connection);

        *guard = Arc::from(connections);
        self.dirty.store(true, Ordering::SeqCst);
    }

    fn publish(&self, connections: Arc<[HostConnection]>) {
        let mut guard = self
            .host_connections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = connections;
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// First connection whose id matches, ignoring case.
    pub fn find_by_id(&self, connection_id: Option<&str>) -> Option<HostConnection> {
        let connection_id = connection_id?;

        self.host_connections()
            .iter()
            .find(|connection| connection.connection_id().eq_ignore_ascii_case(connection_id))
            .cloned()
    }

    /// First connection matching host, port and code page, ignoring case.
    pub fn find_by_host_port_and_code_page(
        &self, host_port: &str, code_page: &str,
    ) -> Option<HostConnection> {
        let (host, port) = split_host_port(host_port);

        self.host_connections()
            .iter()
            .find(|connection| {
                connection.host().eq_ignore_ascii_case(host)
                    && connection.port().eq_ignore_ascii_case(port)
                    && connection.code_page().eq_ignore_ascii_case(code_page)
            })
            .cloned()
    }

    pub fn find_by_description(&self, description: &str) -> Option<HostConnection> {
        self.host_connections()
            .iter()
            .find(|connection| {
                connection
                    .description()
                    .eq_ignore_ascii_case(description.trim())
            })
            .cloned()
    }

    pub fn ces_connection(&self) -> Option<Arc<CesConnection>> {
        self.ces_connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_ces_connection(&self, ces: Option<CesConnection>) {
        let mut guard = self
            .ces_connection
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = ces.map(Arc::new);
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn cli_locations(&self) -> Arc<CliLocations> {
        let guard = self
            .cli_locations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn set_cli_locations(&self, locations: CliLocations) {
        let mut guard = self
            .cli_locations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(locations);
        self.dirty.store(true, Ordering::SeqCst);
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tempfile::TempDir;
    use topaz_common_api::CesToken;

    use super::*;

    fn connection(id: &str, host_port: &str, code_page: &str) -> HostConnection {
        HostConnection::new(&format!("conn {}", id), host_port, code_page).with_connection_id(id)
    }

    #[test]
    fn test_registry_creation() {
        let registry = ConnectionRegistry::new();
        assert!(registry.host_connections().is_empty());
        assert!(registry.ces_connection().is_none());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn test_add_marks_dirty() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047"));

        assert_eq!(registry.host_connections().len(), 1);
        assert!(registry.is_dirty());
    }

    #[test]
    fn test_find_by_id_ignores_case() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("ABC-1", "cw01:1234", "1047"));

        let found = registry.find_by_id(Some("abc-1")).unwrap();
        assert_eq!(found.connection_id(), "ABC-1");
    }

    #[test]
    fn test_find_by_id_missing() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047"));

        assert!(registry.find_by_id(Some("2")).is_none());
        assert!(registry.find_by_id(None).is_none());
    }

    #[test]
    fn test_find_by_id_first_match_wins() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("dup", "cw01:1234", "1047"));
        registry.add(connection("DUP", "cw02:1234", "1047"));

        assert_eq!(
            registry.find_by_id(Some("dup")).unwrap().host_port(),
            "cw01:1234"
        );
    }

    #[test]
    fn test_find_by_host_port_and_code_page() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047"));
        registry.add(connection("2", "CW02:1234", "037"));

        let found = registry
            .find_by_host_port_and_code_page("cw02:1234", "037")
            .unwrap();
        assert_eq!(found.connection_id(), "2");

        assert!(registry
            .find_by_host_port_and_code_page("cw02:1234", "1047")
            .is_none());
        assert!(registry
            .find_by_host_port_and_code_page("cw01:9999", "1047")
            .is_none());
        assert!(registry
            .find_by_host_port_and_code_page("cw01", "1047")
            .is_none());
    }

    #[test]
    fn test_find_by_host_port_with_loose_separator() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01 : 1234", "1047"));

        let found = registry
            .find_by_host_port_and_code_page("cw01::1234", "1047")
            .unwrap();
        assert_eq!(found.connection_id(), "1");
    }

    #[test]
    fn test_find_by_description() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047"));

        assert!(registry.find_by_description("CONN 1").is_some());
        assert!(registry.find_by_description("conn 2").is_none());
    }

    #[test]
    fn test_set_host_connections_replaces_snapshot() {
        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047"));
        let before = registry.host_connections();

        registry.set_host_connections(vec![
            connection("2", "cw02:1234", "1047"),
            connection("3", "cw03:1234", "1047"),
        ]);

        // the old snapshot is untouched
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].connection_id(), "1");

        let after = registry.host_connections();
        assert_eq!(after.len(), 2);
        assert!(registry.find_by_id(Some("1")).is_none());
    }

    #[test]
    fn test_concurrent_readers_see_whole_snapshots() {
        let registry = Arc::new(ConnectionRegistry::new());

        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for size in 1..=50 {
                    let connections = (0..size)
                        .map(|i| connection(&format!("{}-{}", size, i), "cw01:1234", "1047"))
                        .collect();
                    registry.set_host_connections(connections);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = registry.host_connections();
                        if let Some(first) = snapshot.first() {
                            let prefix = format!("{}-", snapshot.len());
                            assert!(snapshot
                                .iter()
                                .all(|c| c.connection_id().starts_with(&prefix)));
                            assert!(first.connection_id().starts_with(&prefix));
                        }
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(registry.host_connections().len(), 50);
    }

    #[test]
    fn test_ces_connection() {
        let registry = ConnectionRegistry::new();
        registry.set_ces_connection(Some(CesConnection::new(
            "http://ces:2020",
            vec![CesToken::new("cw01", "token")],
        )));

        let ces = registry.ces_connection().unwrap();
        assert_eq!(ces.url(), "http://ces:2020");
        assert!(ces.find_token_by_host("CW01").is_some());
        assert!(registry.is_dirty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let registry = ConnectionRegistry::new();
        registry.add(connection("1", "cw01:1234", "1047").with_protocol("TLSv1.2"));
        registry.set_ces_connection(Some(CesConnection::new(
            "http://ces:2020",
            vec![CesToken::new("cw01", "token").with_id("t1")],
        )));
        registry.save(&path).unwrap();
        assert!(!registry.is_dirty());

        let loaded = ConnectionRegistry::load(&path).unwrap();
        let found = loaded.find_by_id(Some("1")).unwrap();
        assert_eq!(found.protocol(), "TLSv1.2");
        assert_eq!(found.timeout(), "0");

        let ces = loaded.ces_connection().unwrap();
        assert_eq!(ces.find_token_by_id("t1").unwrap().host_name(), "cw01");
        assert_eq!(
            loaded.cli_locations().linux_location,
            CliLocations::default().linux_location
        );
    }
}
