use serde::{Deserialize, Serialize};

use crate::model::NamedObjectId;

/// Context in which an algorithm runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlgorithmScope {
    Global,
    CommandVerification,
    ContainerProcessing,
}

impl Default for AlgorithmScope {
    fn default() -> Self {
        AlgorithmScope::Global
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Algorithm {
    pub qualified_name: String,
    pub name: String,
    pub space_system: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    pub scope: AlgorithmScope,
    pub language: Option<String>,
    pub text: Option<String>,
    pub input_parameters: Vec<String>,
    pub output_parameters: Vec<String>,
}
