use anyhow::Result;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::CatalogSource;
use crate::model::MissionDatabase;
use crate::store::traits::CatalogStore;

/// Catalogs held in memory. Snapshots are shared, so a query keeps the
/// snapshot it started with even if the instance is replaced meanwhile.
#[derive(Debug, Default)]
pub struct MemoryStore {
    catalogs: RwLock<BTreeMap<String, Arc<MissionDatabase>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, instance: impl Into<String>, mdb: MissionDatabase) {
        self.catalogs.write().insert(instance.into(), Arc::new(mdb));
    }

    /// Load every configured catalog definition file.
    pub fn load_sources(&self, sources: &[CatalogSource]) -> Result<()> {
        for source in sources {
            let mdb = MissionDatabase::load_from_path(&source.path)?;
            log::info!(
                "Loaded catalog '{}' for instance {} from {} ({} parameters)",
                mdb.name(),
                source.instance,
                source.path,
                mdb.parameters().len()
            );
            self.insert(source.instance.clone(), mdb);
        }
        Ok(())
    }
}

impl CatalogStore for MemoryStore {
    fn get_catalog(&self, instance: &str) -> Option<Arc<MissionDatabase>> {
        self.catalogs.read().get(instance).cloned()
    }

    fn list_instances(&self) -> Vec<String> {
        self.catalogs.read().keys().cloned().collect()
    }
}
