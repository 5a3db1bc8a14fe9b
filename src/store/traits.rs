use std::sync::Arc;

use crate::model::MissionDatabase;

/// Catalog snapshots by instance name.
pub trait CatalogStore: Send + Sync {
    fn get_catalog(&self, instance: &str) -> Option<Arc<MissionDatabase>>;

    /// Instance names in ascending order.
    fn list_instances(&self) -> Vec<String>;
}
