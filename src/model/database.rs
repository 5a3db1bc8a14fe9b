use anyhow::{anyhow, bail, Context, Result};
use itertools::Itertools;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::model::{
    canonical_namespace, qualify, Algorithm, AlgorithmDef, CatalogDefinition, Command, CommandDef,
    Container, ContainerDef, ContainerEntry, Named, NamedObjectId, Parameter, ParameterDef,
    ParameterType, ParameterTypeDef, SpaceSystem, SpaceSystemDef,
};

/// All entities of one kind, keyed by qualified name, plus the
/// `(namespace, name)` index used for id lookups.
#[derive(Debug, Clone)]
pub struct EntityTable<T> {
    by_name: BTreeMap<String, T>,
    by_namespace: HashMap<String, HashMap<String, String>>,
}

impl<T> Default for EntityTable<T> {
    fn default() -> Self {
        Self {
            by_name: BTreeMap::new(),
            by_namespace: HashMap::new(),
        }
    }
}

impl<T: Named> EntityTable<T> {
    pub fn get(&self, qualified_name: &str) -> Option<&T> {
        self.by_name.get(qualified_name)
    }

    /// Look up by `(namespace, name)`, or by qualified name when the id
    /// carries no namespace.
    pub fn get_by_id(&self, id: &NamedObjectId) -> Option<&T> {
        match &id.namespace {
            None => self.by_name.get(&id.name),
            Some(namespace) => self
                .by_namespace
                .get(namespace)
                .and_then(|names| names.get(&id.name))
                .and_then(|qualified_name| self.by_name.get(qualified_name)),
        }
    }

    /// Entities in ascending qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Register `item` under its qualified name, under `namespace` and
    /// under each of its declared aliases.
    fn insert(&mut self, item: T, namespace: Option<&str>) -> Result<()> {
        let qualified_name = item.qualified_name().to_string();
        if self.by_name.contains_key(&qualified_name) {
            bail!("duplicate {} {}", T::KIND, qualified_name);
        }

        let mut keys: Vec<(String, String)> = item
            .aliases()
            .iter()
            .filter_map(|alias| {
                alias
                    .namespace
                    .as_ref()
                    .map(|ns| (ns.clone(), alias.name.clone()))
            })
            .collect();
        if let Some(ns) = namespace {
            keys.push((ns.to_string(), item.name().to_string()));
        }
        for (ns, name) in keys {
            let names = self.by_namespace.entry(ns.clone()).or_default();
            if let Some(existing) = names.get(&name) {
                if existing != &qualified_name {
                    bail!(
                        "{} alias {}/{} is used by both {} and {}",
                        T::KIND,
                        ns,
                        name,
                        existing,
                        qualified_name
                    );
                }
            }
            names.insert(name, qualified_name.clone());
        }

        self.by_name.insert(qualified_name, item);
        Ok(())
    }
}

/// Aggregate counts reported by the mission database summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    pub parameter_count: usize,
    pub container_count: usize,
    pub command_count: usize,
    pub algorithm_count: usize,
    pub parameter_type_count: usize,
}

/// Immutable snapshot of one mission database.
#[derive(Debug, Clone)]
pub struct MissionDatabase {
    name: String,
    version: Option<String>,
    root: SpaceSystem,
    space_systems: EntityTable<SpaceSystem>,
    parameters: EntityTable<Parameter>,
    parameter_types: EntityTable<ParameterType>,
    containers: EntityTable<Container>,
    commands: EntityTable<Command>,
    algorithms: EntityTable<Algorithm>,
    /// parameter -> containers with an entry for it
    parameter_users: HashMap<String, Vec<String>>,
    /// container -> containers with an entry for it
    container_users: HashMap<String, Vec<String>>,
}

impl MissionDatabase {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn space_systems(&self) -> &EntityTable<SpaceSystem> {
        &self.space_systems
    }

    pub fn parameters(&self) -> &EntityTable<Parameter> {
        &self.parameters
    }

    pub fn parameter_types(&self) -> &EntityTable<ParameterType> {
        &self.parameter_types
    }

    pub fn containers(&self) -> &EntityTable<Container> {
        &self.containers
    }

    pub fn commands(&self) -> &EntityTable<Command> {
        &self.commands
    }

    pub fn algorithms(&self) -> &EntityTable<Algorithm> {
        &self.algorithms
    }

    pub fn root(&self) -> &SpaceSystem {
        &self.root
    }

    pub fn space_system(&self, qualified_name: &str) -> Option<&SpaceSystem> {
        self.space_systems.get(qualified_name)
    }

    pub fn parameter_type_of(&self, parameter: &Parameter) -> Option<&ParameterType> {
        parameter
            .type_ref
            .as_deref()
            .and_then(|qn| self.parameter_types.get(qn))
    }

    /// Containers referencing `parameter`, sorted by qualified name.
    pub fn containers_using_parameter(&self, parameter: &str) -> Vec<&Container> {
        self.users(&self.parameter_users, parameter)
    }

    /// Containers that include `container` as an entry, sorted by
    /// qualified name.
    pub fn containers_using_container(&self, container: &str) -> Vec<&Container> {
        self.users(&self.container_users, container)
    }

    fn users(&self, index: &HashMap<String, Vec<String>>, key: &str) -> Vec<&Container> {
        index
            .get(key)
            .map(|names| {
                names
                    .iter()
                    .filter_map(|qn| self.containers.get(qn))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Walk from `space_system` up to (excluding) the root.
    pub fn ancestors<'a>(&'a self, space_system: &str) -> impl Iterator<Item = &'a SpaceSystem> {
        let mut current = self.space_system(space_system);
        std::iter::from_fn(move || {
            let node = current.filter(|ss| !ss.is_root())?;
            current = node.parent.as_deref().and_then(|p| self.space_system(p));
            Some(node)
        })
    }

    /// Number of containers defined in `space_system` or below it.
    pub fn container_count(&self, space_system: &SpaceSystem, recursive: bool) -> usize {
        let own = space_system.containers.len();
        if !recursive {
            return own;
        }
        own + space_system
            .sub_systems
            .iter()
            .filter_map(|qn| self.space_system(qn))
            .map(|child| self.container_count(child, true))
            .sum::<usize>()
    }

    pub fn counts(&self) -> CatalogCounts {
        CatalogCounts {
            parameter_count: self.parameters.len(),
            container_count: self.containers.len(),
            command_count: self.commands.len(),
            algorithm_count: self.algorithms.len(),
            parameter_type_count: self.parameter_types.len(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: CatalogDefinition =
            serde_json::from_str(json).context("invalid catalog definition")?;
        Self::build(definition)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Build and cross-check a snapshot from its definition.
    pub fn build(definition: CatalogDefinition) -> Result<Self> {
        let mut mdb = MissionDatabase {
            name: definition.name,
            version: definition.version,
            root: SpaceSystem::new(String::new(), String::new(), None),
            space_systems: EntityTable::default(),
            parameters: EntityTable::default(),
            parameter_types: EntityTable::default(),
            containers: EntityTable::default(),
            commands: EntityTable::default(),
            algorithms: EntityTable::default(),
            parameter_users: HashMap::new(),
            container_users: HashMap::new(),
        };

        let mut root = SpaceSystem::new(String::new(), String::new(), None);
        let mut nodes = Vec::new();
        for def in definition.space_systems {
            root.sub_systems
                .push(mdb.add_space_system(def, "", &mut nodes)?);
        }
        mdb.root = root.clone();
        mdb.space_systems.insert(root, None)?;
        for node in nodes {
            let namespace = node
                .parent
                .as_deref()
                .map(canonical_namespace)
                .map(str::to_string);
            mdb.space_systems.insert(node, namespace.as_deref())?;
        }

        mdb.check_references()?;
        mdb.index_users();
        Ok(mdb)
    }

    fn add_space_system(
        &mut self,
        def: SpaceSystemDef,
        parent: &str,
        nodes: &mut Vec<SpaceSystem>,
    ) -> Result<String> {
        if def.head.name.is_empty() || def.head.name.contains('/') {
            bail!("invalid space system name '{}' under '{}'", def.head.name, parent);
        }
        let qualified_name = qualify(parent, &def.head.name);
        let mut node = SpaceSystem::new(
            qualified_name.clone(),
            def.head.name.clone(),
            Some(parent.to_string()),
        );
        node.description = def.head.description;
        node.long_description = def.head.long_description;
        node.aliases = def.head.aliases;
        node.version = def.version;

        let ns = qualified_name.as_str();
        for t in def.parameter_types {
            node.parameter_types.push(self.add_parameter_type(t, ns)?);
        }
        for p in def.parameters {
            node.parameters.push(self.add_parameter(p, ns)?);
        }
        for c in def.containers {
            node.containers.push(self.add_container(c, ns)?);
        }
        for c in def.commands {
            node.commands.push(self.add_command(c, ns)?);
        }
        for a in def.algorithms {
            node.algorithms.push(self.add_algorithm(a, ns)?);
        }
        for child in def.space_systems {
            node.sub_systems
                .push(self.add_space_system(child, &qualified_name, nodes)?);
        }

        nodes.push(node);
        Ok(qualified_name)
    }

    fn add_parameter_type(&mut self, def: ParameterTypeDef, ns: &str) -> Result<String> {
        let qualified_name = member_name(ns, &def.head.name)?;
        self.parameter_types.insert(
            ParameterType {
                qualified_name: qualified_name.clone(),
                name: def.head.name,
                space_system: ns.to_string(),
                description: def.head.description,
                long_description: def.head.long_description,
                aliases: def.head.aliases,
                units: def.units,
                data_type: def.data_type,
            },
            Some(canonical_namespace(ns)),
        )?;
        Ok(qualified_name)
    }

    fn add_parameter(&mut self, def: ParameterDef, ns: &str) -> Result<String> {
        let qualified_name = member_name(ns, &def.head.name)?;
        self.parameters.insert(
            Parameter {
                qualified_name: qualified_name.clone(),
                name: def.head.name,
                space_system: ns.to_string(),
                description: def.head.description,
                long_description: def.head.long_description,
                aliases: def.head.aliases,
                type_ref: def.type_ref.map(|r| reference(ns, &r)),
                data_source: def.data_source,
            },
            Some(canonical_namespace(ns)),
        )?;
        Ok(qualified_name)
    }

    fn add_container(&mut self, def: ContainerDef, ns: &str) -> Result<String> {
        let qualified_name = member_name(ns, &def.head.name)?;
        let entries = def
            .entries
            .into_iter()
            .map(|entry| match entry {
                ContainerEntry::Parameter(r) => ContainerEntry::Parameter(reference(ns, &r)),
                ContainerEntry::Container(r) => ContainerEntry::Container(reference(ns, &r)),
            })
            .collect();
        self.containers.insert(
            Container {
                qualified_name: qualified_name.clone(),
                name: def.head.name,
                space_system: ns.to_string(),
                description: def.head.description,
                long_description: def.head.long_description,
                aliases: def.head.aliases,
                base_container: def.base_container.map(|r| reference(ns, &r)),
                archive_partition: def.archive_partition,
                size_in_bits: def.size_in_bits,
                entries,
            },
            Some(canonical_namespace(ns)),
        )?;
        Ok(qualified_name)
    }

    fn add_command(&mut self, def: CommandDef, ns: &str) -> Result<String> {
        let qualified_name = member_name(ns, &def.head.name)?;
        self.commands.insert(
            Command {
                qualified_name: qualified_name.clone(),
                name: def.head.name,
                space_system: ns.to_string(),
                description: def.head.description,
                long_description: def.head.long_description,
                aliases: def.head.aliases,
                base_command: def.base_command.map(|r| reference(ns, &r)),
                is_abstract: def.is_abstract,
                significance: def.significance,
                arguments: def.arguments,
            },
            Some(canonical_namespace(ns)),
        )?;
        Ok(qualified_name)
    }

    fn add_algorithm(&mut self, def: AlgorithmDef, ns: &str) -> Result<String> {
        let qualified_name = member_name(ns, &def.head.name)?;
        self.algorithms.insert(
            Algorithm {
                qualified_name: qualified_name.clone(),
                name: def.head.name,
                space_system: ns.to_string(),
                description: def.head.description,
                long_description: def.head.long_description,
                aliases: def.head.aliases,
                scope: def.scope,
                language: def.language,
                text: def.text,
                input_parameters: def
                    .input_parameters
                    .iter()
                    .map(|r| reference(ns, r))
                    .collect(),
                output_parameters: def
                    .output_parameters
                    .iter()
                    .map(|r| reference(ns, r))
                    .collect(),
            },
            Some(canonical_namespace(ns)),
        )?;
        Ok(qualified_name)
    }

    fn check_references(&self) -> Result<()> {
        for p in self.parameters.iter() {
            if let Some(type_ref) = &p.type_ref {
                if self.parameter_types.get(type_ref).is_none() {
                    bail!("parameter {} references unknown type {}", p.qualified_name, type_ref);
                }
            }
        }
        for c in self.containers.iter() {
            if let Some(base) = &c.base_container {
                self.containers
                    .get(base)
                    .ok_or_else(|| anyhow!("container {} has unknown base {}", c.qualified_name, base))?;
            }
            for entry in &c.entries {
                let found = match entry {
                    ContainerEntry::Parameter(qn) => self.parameters.get(qn).is_some(),
                    ContainerEntry::Container(qn) => self.containers.get(qn).is_some(),
                };
                if !found {
                    bail!("container {} has a dangling entry {:?}", c.qualified_name, entry);
                }
            }
        }
        for c in self.commands.iter() {
            if let Some(base) = &c.base_command {
                self.commands
                    .get(base)
                    .ok_or_else(|| anyhow!("command {} has unknown base {}", c.qualified_name, base))?;
            }
        }
        for a in self.algorithms.iter() {
            for qn in a.input_parameters.iter().chain(&a.output_parameters) {
                if self.parameters.get(qn).is_none() {
                    bail!("algorithm {} references unknown parameter {}", a.qualified_name, qn);
                }
            }
        }
        Ok(())
    }

    fn index_users(&mut self) {
        let mut parameter_users: HashMap<String, Vec<String>> = HashMap::new();
        let mut container_users: HashMap<String, Vec<String>> = HashMap::new();
        for c in self.containers.iter() {
            for entry in &c.entries {
                let (index, target) = match entry {
                    ContainerEntry::Parameter(qn) => (&mut parameter_users, qn),
                    ContainerEntry::Container(qn) => (&mut container_users, qn),
                };
                index
                    .entry(target.clone())
                    .or_default()
                    .push(c.qualified_name.clone());
            }
        }
        for users in parameter_users.values_mut().chain(container_users.values_mut()) {
            let sorted: Vec<String> = std::mem::take(users).into_iter().sorted().dedup().collect();
            *users = sorted;
        }
        self.parameter_users = parameter_users;
        self.container_users = container_users;
    }
}

fn member_name(ns: &str, name: &str) -> Result<String> {
    if name.is_empty() || name.contains('/') {
        bail!("invalid entity name '{}' in space system '{}'", name, ns);
    }
    Ok(qualify(ns, name))
}

/// Resolve a definition reference against the enclosing space system.
fn reference(ns: &str, r: &str) -> String {
    if r.starts_with('/') {
        r.to_string()
    } else {
        qualify(ns, r)
    }
}
