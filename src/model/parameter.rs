use serde::{Deserialize, Serialize};

use crate::model::NamedObjectId;

/// Where the values of a parameter originate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Telemetered,
    Derived,
    Constant,
    Local,
    System,
    Command,
    CommandHistory,
    External1,
    External2,
    External3,
    Ground,
}

/// Structural description of a parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "engType", rename_all = "lowercase")]
pub enum DataType {
    Integer {
        #[serde(default = "default_signed")]
        signed: bool,
        #[serde(default = "default_size_in_bits", rename = "sizeInBits")]
        size_in_bits: u32,
    },
    Float {
        #[serde(default = "default_size_in_bits", rename = "sizeInBits")]
        size_in_bits: u32,
    },
    Boolean,
    String,
    Binary,
    Enumeration {
        #[serde(default)]
        values: Vec<EnumValue>,
    },
    Time,
    Aggregate {
        members: Vec<Member>,
    },
    Array {
        #[serde(default = "default_dimensions")]
        dimensions: usize,
        element: Box<DataType>,
    },
}

fn default_signed() -> bool {
    true
}

fn default_size_in_bits() -> u32 {
    32
}

fn default_dimensions() -> usize {
    1
}

impl DataType {
    /// Engineering type name used by the `types` listing filter.
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::Integer { .. } => "integer",
            DataType::Float { .. } => "float",
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::Binary => "binary",
            DataType::Enumeration { .. } => "enumeration",
            DataType::Time => "time",
            DataType::Aggregate { .. } => "aggregate",
            DataType::Array { .. } => "array",
        }
    }

    pub fn member(&self, name: &str) -> Option<&Member> {
        match self {
            DataType::Aggregate { members } => members.iter().find(|m| m.name == name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: i64,
    pub label: String,
}

/// A named field of an aggregate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

/// A named, reusable parameter type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterType {
    pub qualified_name: String,
    pub name: String,
    pub space_system: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    pub units: Option<String>,
    pub data_type: DataType,
}

impl ParameterType {
    pub fn type_name(&self) -> &'static str {
        self.data_type.type_name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub qualified_name: String,
    pub name: String,
    pub space_system: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub aliases: Vec<NamedObjectId>,
    /// Qualified name of the parameter type, if the parameter has one.
    pub type_ref: Option<String>,
    pub data_source: Option<DataSource>,
}
