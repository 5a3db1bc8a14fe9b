use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::{EntityKind, ObjectPrivilegeType, SystemPrivilege, UserContext};

/// Capability checks consulted by the query engine.
pub trait PrivilegeGate: Send + Sync {
    fn has_system_privilege(&self, user: &UserContext, privilege: SystemPrivilege) -> bool;

    fn has_object_privilege(
        &self,
        user: &UserContext,
        privilege: ObjectPrivilegeType,
        qualified_name: &str,
    ) -> bool;

    /// Read access to one entity: the catalog-wide privilege, or the
    /// object privilege of the entity's kind on its qualified name.
    fn has_access(&self, user: &UserContext, kind: EntityKind, qualified_name: &str) -> bool {
        self.has_system_privilege(user, SystemPrivilege::ReadCatalog)
            || self.has_object_privilege(user, ObjectPrivilegeType::for_kind(kind), qualified_name)
    }
}

/// An object privilege on a qualified name, or on every name starting
/// with a prefix when the pattern ends in `*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectGrant {
    pub kind: ObjectPrivilegeType,
    pub pattern: String,
}

impl ObjectGrant {
    pub fn matches(&self, kind: ObjectPrivilegeType, qualified_name: &str) -> bool {
        if self.kind != kind {
            return false;
        }
        match self.pattern.strip_suffix('*') {
            Some(prefix) => qualified_name.starts_with(prefix),
            None => self.pattern == qualified_name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrivileges {
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub system: HashSet<SystemPrivilege>,
    #[serde(default)]
    pub objects: Vec<ObjectGrant>,
}

/// Static privilege table keyed by user id. Users without an entry hold
/// no privileges.
#[derive(Debug, Clone, Default)]
pub struct PrivilegeTable {
    users: HashMap<String, UserPrivileges>,
}

impl PrivilegeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(users: HashMap<String, UserPrivileges>) -> Self {
        Self { users }
    }

    pub fn superuser(mut self, user_id: impl Into<String>) -> Self {
        self.users.entry(user_id.into()).or_default().superuser = true;
        self
    }

    pub fn grant_system(mut self, user_id: impl Into<String>, privilege: SystemPrivilege) -> Self {
        self.users
            .entry(user_id.into())
            .or_default()
            .system
            .insert(privilege);
        self
    }

    pub fn grant_object(
        mut self,
        user_id: impl Into<String>,
        kind: ObjectPrivilegeType,
        pattern: impl Into<String>,
    ) -> Self {
        self.users
            .entry(user_id.into())
            .or_default()
            .objects
            .push(ObjectGrant {
                kind,
                pattern: pattern.into(),
            });
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn privileges(&self, user: &UserContext) -> Option<&UserPrivileges> {
        self.users.get(&user.user_id)
    }
}

impl PrivilegeGate for PrivilegeTable {
    fn has_system_privilege(&self, user: &UserContext, privilege: SystemPrivilege) -> bool {
        self.privileges(user)
            .map_or(false, |p| p.superuser || p.system.contains(&privilege))
    }

    fn has_object_privilege(
        &self,
        user: &UserContext,
        privilege: ObjectPrivilegeType,
        qualified_name: &str,
    ) -> bool {
        self.privileges(user).map_or(false, |p| {
            p.superuser
                || p.objects
                    .iter()
                    .any(|grant| grant.matches(privilege, qualified_name))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_user_has_nothing() {
        let table = PrivilegeTable::new().superuser("admin");
        let guest = UserContext::anonymous();
        assert!(!table.has_system_privilege(&guest, SystemPrivilege::ReadCatalog));
        assert!(!table.has_access(&guest, EntityKind::Parameter, "/sys1/P1"));
        assert!(table.has_access(&UserContext::new("admin"), EntityKind::Command, "/x/C"));
    }

    #[test]
    fn test_object_grants_are_kind_specific() {
        let table = PrivilegeTable::new()
            .grant_object("ops", ObjectPrivilegeType::ReadParameter, "/sys1/*")
            .grant_object("ops", ObjectPrivilegeType::Command, "/sys2/RESET");
        let ops = UserContext::new("ops");

        assert!(table.has_access(&ops, EntityKind::Parameter, "/sys1/sub/P2"));
        assert!(!table.has_access(&ops, EntityKind::Parameter, "/sys2/P3"));
        assert!(!table.has_access(&ops, EntityKind::Algorithm, "/sys1/calib"));
        assert!(table.has_access(&ops, EntityKind::Command, "/sys2/RESET"));
        assert!(!table.has_access(&ops, EntityKind::Command, "/sys2/RESET2"));
        // containers need catalog admin
        assert!(!table.has_access(&ops, EntityKind::Container, "/sys1/pkt"));
    }

    #[test]
    fn test_read_catalog_grants_every_kind() {
        let table = PrivilegeTable::new().grant_system("viewer", SystemPrivilege::ReadCatalog);
        let viewer = UserContext::new("viewer");
        for kind in [
            EntityKind::Parameter,
            EntityKind::Container,
            EntityKind::Command,
            EntityKind::Algorithm,
        ] {
            assert!(table.has_access(&viewer, kind, "/any/thing"));
        }
    }

    #[test]
    fn test_privileges_deserialize_from_config() {
        let users: HashMap<String, UserPrivileges> = serde_json::from_str(
            r#"{"ops": {"system": ["ReadCatalog"],
                        "objects": [{"kind": "ReadParameter", "pattern": "/sys1/*"}]}}"#,
        )
        .unwrap();
        let table = PrivilegeTable::from_config(users);
        assert_eq!(table.user_count(), 1);
        assert!(table.has_system_privilege(&UserContext::new("ops"), SystemPrivilege::ReadCatalog));
    }
}
