use serde::{Deserialize, Serialize};

use crate::model::NamedObjectId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub qualified_name: String,
    pub name: String,
    pub space_system: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    pub base_command: Option<String>,
    /// Abstract commands only serve as a base for other commands and
    /// cannot be issued themselves.
    pub is_abstract: bool,
    pub significance: Option<String>,
    pub arguments: Vec<Argument>,
}
