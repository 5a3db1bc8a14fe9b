use crate::model::{
    Algorithm, Command, Container, EntityKind, EntityTable, MissionDatabase, NamedObjectId,
    Parameter, ParameterType, SpaceSystem,
};

/// Anything addressable by qualified name inside a `MissionDatabase`.
pub trait Named: Sized {
    const KIND: EntityKind;

    fn qualified_name(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
    fn aliases(&self) -> &[NamedObjectId];

    /// The table of `mdb` holding entities of this kind.
    fn table(mdb: &MissionDatabase) -> &EntityTable<Self>;
}

/// Entities that are direct members of a space system and can be listed.
pub trait CatalogItem: Named {
    /// Qualified name of the owning space system.
    fn space_system(&self) -> &str;

    /// Qualified names of the members of this kind defined directly in
    /// `space_system`.
    fn members_of(space_system: &SpaceSystem) -> &[String];
}

macro_rules! impl_catalog_item {
    ($ty:ty, $kind:expr, $table:ident, $members:ident) => {
        impl Named for $ty {
            const KIND: EntityKind = $kind;

            fn qualified_name(&self) -> &str {
                &self.qualified_name
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn description(&self) -> Option<&str> {
                self.description.as_deref()
            }

            fn aliases(&self) -> &[NamedObjectId] {
                &self.aliases
            }

            fn table(mdb: &MissionDatabase) -> &EntityTable<Self> {
                mdb.$table()
            }
        }

        impl CatalogItem for $ty {
            fn space_system(&self) -> &str {
                &self.space_system
            }

            fn members_of(space_system: &SpaceSystem) -> &[String] {
                &space_system.$members
            }
        }
    };
}

impl_catalog_item!(Parameter, EntityKind::Parameter, parameters, parameters);
impl_catalog_item!(Container, EntityKind::Container, containers, containers);
impl_catalog_item!(Command, EntityKind::Command, commands, commands);
impl_catalog_item!(Algorithm, EntityKind::Algorithm, algorithms, algorithms);

impl Named for ParameterType {
    const KIND: EntityKind = EntityKind::ParameterType;

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn aliases(&self) -> &[NamedObjectId] {
        &self.aliases
    }

    fn table(mdb: &MissionDatabase) -> &EntityTable<Self> {
        mdb.parameter_types()
    }
}

impl Named for SpaceSystem {
    const KIND: EntityKind = EntityKind::SpaceSystem;

    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn aliases(&self) -> &[NamedObjectId] {
        &self.aliases
    }

    fn table(mdb: &MissionDatabase) -> &EntityTable<Self> {
        mdb.space_systems()
    }
}
