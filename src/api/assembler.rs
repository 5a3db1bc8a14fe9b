use serde::Serialize;

use crate::model::{
    parent_of, AggregatePath, Algorithm, AlgorithmScope, Argument, Command, Container,
    ContainerEntry, DataSource, DataType, MissionDatabase, NamedObjectId, Parameter,
    ParameterType, SpaceSystem,
};

/// How much of an entity is projected into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DetailLevel {
    Link,
    Summary,
    Full,
}

impl DetailLevel {
    /// List endpoints return summaries unless `details=true`.
    pub fn for_listing(details: bool) -> Self {
        if details {
            DetailLevel::Full
        } else {
            DetailLevel::Summary
        }
    }

    fn full(self) -> bool {
        self == DetailLevel::Full
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub qualified_name: String,
    pub name: String,
}

pub fn link(qualified_name: &str) -> LinkInfo {
    let name = parent_of(qualified_name)
        .map(|parent| &qualified_name[parent.len() + 1..])
        .unwrap_or(qualified_name);
    LinkInfo {
        qualified_name: qualified_name.to_string(),
        name: name.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    pub containers: Vec<LinkInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTypeInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub eng_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<ParameterTypeInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    /// Member path inside the parameter, for member matches and member
    /// lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by: Option<UsageInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<LinkInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<LinkInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_container: Option<LinkInfo>,
    pub archive_partition: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bits: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<EntryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_by: Option<UsageInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_command: Option<LinkInfo>,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub argument: Vec<Argument>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    pub scope: AlgorithmScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input_parameter: Vec<LinkInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output_parameter: Vec<LinkInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceSystemInfo {
    pub qualified_name: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<NamedObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_system: Vec<LinkInfo>,
}

fn long_description(level: DetailLevel, value: &Option<String>) -> Option<String> {
    if level.full() {
        value.clone()
    } else {
        None
    }
}

pub fn parameter_type_info(t: &ParameterType, level: DetailLevel) -> ParameterTypeInfo {
    ParameterTypeInfo {
        qualified_name: t.qualified_name.clone(),
        name: t.name.clone(),
        alias: t.aliases.clone(),
        short_description: t.description.clone(),
        long_description: long_description(level, &t.long_description),
        eng_type: t.type_name().to_string(),
        units: t.units.clone(),
        data_type: level.full().then(|| t.data_type.clone()),
    }
}

pub fn parameter_info(
    mdb: &MissionDatabase,
    p: &Parameter,
    path: Option<&AggregatePath>,
    level: DetailLevel,
) -> ParameterInfo {
    if level == DetailLevel::Link {
        let LinkInfo {
            qualified_name,
            name,
        } = link(&p.qualified_name);
        return ParameterInfo {
            qualified_name,
            name,
            alias: Vec::new(),
            short_description: None,
            long_description: None,
            parameter_type: None,
            data_source: None,
            path: path.map(ToString::to_string),
            used_by: None,
        };
    }

    let used_by = level.full().then(|| UsageInfo {
        containers: mdb
            .containers_using_parameter(&p.qualified_name)
            .into_iter()
            .map(|c| link(&c.qualified_name))
            .collect(),
    });

    ParameterInfo {
        qualified_name: p.qualified_name.clone(),
        name: p.name.clone(),
        alias: p.aliases.clone(),
        short_description: p.description.clone(),
        long_description: long_description(level, &p.long_description),
        parameter_type: mdb
            .parameter_type_of(p)
            .map(|t| parameter_type_info(t, level)),
        data_source: p.data_source,
        path: path.map(ToString::to_string),
        used_by,
    }
}

pub fn container_info(mdb: &MissionDatabase, c: &Container, level: DetailLevel) -> ContainerInfo {
    let entries = if level.full() {
        c.entries
            .iter()
            .map(|entry| match entry {
                ContainerEntry::Parameter(qn) => EntryInfo {
                    parameter: Some(link(qn)),
                    container: None,
                },
                ContainerEntry::Container(qn) => EntryInfo {
                    parameter: None,
                    container: Some(link(qn)),
                },
            })
            .collect()
    } else {
        Vec::new()
    };
    let used_by = level.full().then(|| UsageInfo {
        containers: mdb
            .containers_using_container(&c.qualified_name)
            .into_iter()
            .map(|user| link(&user.qualified_name))
            .collect(),
    });

    ContainerInfo {
        qualified_name: c.qualified_name.clone(),
        name: c.name.clone(),
        alias: c.aliases.clone(),
        short_description: c.description.clone(),
        long_description: long_description(level, &c.long_description),
        base_container: c.base_container.as_deref().map(link),
        archive_partition: c.archive_partition,
        size_in_bits: c.size_in_bits,
        entries,
        used_by,
    }
}

pub fn command_info(c: &Command, level: DetailLevel) -> CommandInfo {
    CommandInfo {
        qualified_name: c.qualified_name.clone(),
        name: c.name.clone(),
        alias: c.aliases.clone(),
        short_description: c.description.clone(),
        long_description: long_description(level, &c.long_description),
        base_command: c.base_command.as_deref().map(link),
        is_abstract: c.is_abstract,
        significance: c.significance.clone(),
        argument: if level.full() {
            c.arguments.clone()
        } else {
            Vec::new()
        },
    }
}

pub fn algorithm_info(a: &Algorithm, level: DetailLevel) -> AlgorithmInfo {
    let full = level.full();
    let links = |names: &[String]| -> Vec<LinkInfo> {
        if full {
            names.iter().map(|qn| link(qn)).collect()
        } else {
            Vec::new()
        }
    };
    AlgorithmInfo {
        qualified_name: a.qualified_name.clone(),
        name: a.name.clone(),
        alias: a.aliases.clone(),
        short_description: a.description.clone(),
        long_description: long_description(level, &a.long_description),
        scope: a.scope,
        language: a.language.clone(),
        text: if full { a.text.clone() } else { None },
        input_parameter: links(a.input_parameters.as_slice()),
        output_parameter: links(a.output_parameters.as_slice()),
    }
}

pub fn space_system_info(ss: &SpaceSystem, level: DetailLevel) -> SpaceSystemInfo {
    let mut sub_system: Vec<LinkInfo> = ss.sub_systems.iter().map(|qn| link(qn)).collect();
    sub_system.sort_by(|a, b| a.qualified_name.cmp(&b.qualified_name));
    SpaceSystemInfo {
        qualified_name: ss.qualified_name.clone(),
        name: ss.name.clone(),
        alias: ss.aliases.clone(),
        short_description: ss.description.clone(),
        long_description: long_description(level, &ss.long_description),
        version: ss.version.clone(),
        sub_system,
    }
}
