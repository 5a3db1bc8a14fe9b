use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the segments of a qualified name.
pub const PATH_SEPARATOR: char = '/';

/// The entity kinds that can be looked up by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    SpaceSystem,
    Parameter,
    ParameterType,
    Container,
    Command,
    Algorithm,
}

impl EntityKind {
    /// Human label used in error messages ("No such parameter type").
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::SpaceSystem => "space system",
            EntityKind::Parameter => "parameter",
            EntityKind::ParameterType => "parameter type",
            EntityKind::Container => "container",
            EntityKind::Command => "command",
            EntityKind::Algorithm => "algorithm",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A `(namespace, name)` reference.
///
/// Without a namespace the name is taken as a fully qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamedObjectId {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl NamedObjectId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    pub fn qualified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }
}

impl fmt::Display for NamedObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{namespace: {}, name: {}}}", ns, self.name),
            None => write!(f, "{{name: {}}}", self.name),
        }
    }
}

/// Namespace under which members of a space system are registered.
/// The root space system has an empty qualified name but registers its
/// members under `/`.
pub fn canonical_namespace(space_system: &str) -> &str {
    if space_system.is_empty() {
        "/"
    } else {
        space_system
    }
}

/// Join a space system qualified name and a member name.
pub fn qualify(space_system: &str, name: &str) -> String {
    if space_system.is_empty() || space_system == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", space_system, name)
    }
}

/// Qualified name of the space system owning `qualified_name`.
pub fn parent_of(qualified_name: &str) -> Option<&str> {
    qualified_name
        .rfind(PATH_SEPARATOR)
        .map(|idx| &qualified_name[..idx])
}

/// True if `qualified_name` lives strictly below `prefix` in the tree.
/// The root prefix (empty or `/`) contains everything.
pub fn is_under(qualified_name: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches(PATH_SEPARATOR);
    if prefix.is_empty() {
        return qualified_name.starts_with(PATH_SEPARATOR);
    }
    qualified_name.len() > prefix.len() + 1
        && qualified_name.starts_with(prefix)
        && qualified_name[prefix.len()..].starts_with(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_and_parent() {
        assert_eq!(qualify("", "sys1"), "/sys1");
        assert_eq!(qualify("/sys1", "P1"), "/sys1/P1");
        assert_eq!(parent_of("/sys1/P1"), Some("/sys1"));
        assert_eq!(parent_of("/sys1"), Some(""));
        assert_eq!(canonical_namespace(""), "/");
    }

    #[test]
    fn test_is_under_requires_path_boundary() {
        assert!(is_under("/sys1/P1", "/sys1"));
        assert!(is_under("/sys1/sub/P2", "/sys1"));
        assert!(is_under("/sys1/sub/P2", "/sys1/"));
        assert!(!is_under("/sys10/P1", "/sys1"));
        assert!(!is_under("/sys1", "/sys1"));
        assert!(is_under("/sys1", ""));
        assert!(is_under("/sys1", "/"));
    }
}
