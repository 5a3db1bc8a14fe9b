use serde::{Deserialize, Serialize};

use crate::model::NamedObjectId;

/// A reference held by a container entry, by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerEntry {
    Parameter(String),
    Container(String),
}

/// A sequence container: an ordered layout of parameters and nested
/// containers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub qualified_name: String,
    pub name: String,
    pub space_system: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    pub base_container: Option<String>,
    pub archive_partition: bool,
    pub size_in_bits: Option<u32>,
    pub entries: Vec<ContainerEntry>,
}
