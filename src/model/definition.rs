//! JSON definition format from which a `MissionDatabase` is built.

use serde::{Deserialize, Serialize};

use crate::model::{AlgorithmScope, Argument, ContainerEntry, DataSource, DataType, NamedObjectId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDefinition {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub space_systems: Vec<SpaceSystemDef>,
}

/// Fields shared by every definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    /// Additional (namespace, name) pairs under which the entity can be
    /// looked up, e.g. `{"namespace": "MDB:OPS Name", "name": "BATT_V"}`.
    #[serde(default)]
    pub aliases: Vec<NamedObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSystemDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub parameter_types: Vec<ParameterTypeDef>,
    #[serde(default)]
    pub parameters: Vec<ParameterDef>,
    #[serde(default)]
    pub containers: Vec<ContainerDef>,
    #[serde(default)]
    pub commands: Vec<CommandDef>,
    #[serde(default)]
    pub algorithms: Vec<AlgorithmDef>,
    #[serde(default)]
    pub space_systems: Vec<SpaceSystemDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTypeDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

/// References (`type`, container entries, base names) are either
/// qualified (`/sys/TYPE`) or relative to the enclosing space system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default, rename = "type")]
    pub type_ref: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default)]
    pub base_container: Option<String>,
    #[serde(default)]
    pub archive_partition: bool,
    #[serde(default)]
    pub size_in_bits: Option<u32>,
    #[serde(default)]
    pub entries: Vec<ContainerEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default)]
    pub base_command: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub significance: Option<String>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmDef {
    #[serde(flatten)]
    pub head: NameDef,
    #[serde(default)]
    pub scope: AlgorithmScope,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub input_parameters: Vec<String>,
    #[serde(default)]
    pub output_parameters: Vec<String>,
}
