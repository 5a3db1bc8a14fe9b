use serde::{Deserialize, Serialize};

use crate::model::EntityKind;

/// Privileges that apply to the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemPrivilege {
    /// Read every entity of the mission database.
    ReadCatalog,
}

/// Privileges granted on individual objects, keyed by qualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectPrivilegeType {
    ReadParameter,
    ReadAlgorithm,
    Command,
    CatalogAdmin,
}

impl ObjectPrivilegeType {
    /// The object privilege that grants read access to entities of `kind`.
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Parameter => ObjectPrivilegeType::ReadParameter,
            EntityKind::Algorithm => ObjectPrivilegeType::ReadAlgorithm,
            EntityKind::Command => ObjectPrivilegeType::Command,
            EntityKind::Container | EntityKind::ParameterType | EntityKind::SpaceSystem => {
                ObjectPrivilegeType::CatalogAdmin
            }
        }
    }
}
