use serde::Serialize;

use crate::model::NamedObjectId;

/// A node of the namespace tree.
///
/// Parent and children are held as qualified names and navigated through
/// the owning `MissionDatabase`, which keeps the tree free of reference
/// cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpaceSystem {
    /// Empty for the root.
    pub qualified_name: String,
    pub name: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub version: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    pub parent: Option<String>,
    pub sub_systems: Vec<String>,
    pub parameters: Vec<String>,
    pub parameter_types: Vec<String>,
    pub containers: Vec<String>,
    pub commands: Vec<String>,
    pub algorithms: Vec<String>,
}

impl SpaceSystem {
    pub fn new(qualified_name: String, name: String, parent: Option<String>) -> Self {
        Self {
            qualified_name,
            name,
            description: None,
            long_description: None,
            version: None,
            aliases: Vec::new(),
            parent,
            sub_systems: Vec::new(),
            parameters: Vec::new(),
            parameter_types: Vec::new(),
            containers: Vec::new(),
            commands: Vec::new(),
            algorithms: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.qualified_name.is_empty()
    }
}
