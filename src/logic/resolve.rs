use crate::error::{CatalogError, CatalogResult};
use crate::model::{
    AggregatePath, MissionDatabase, Named, NamedObjectId, Parameter, SpaceSystem,
};

/// An entity found by path, together with the id that matched.
#[derive(Debug, Clone)]
pub struct Resolved<'m, T> {
    pub entity: &'m T,
    pub id: NamedObjectId,
}

/// A parameter found by path, with the member path suffix (if any).
#[derive(Debug, Clone)]
pub struct ParameterWithId<'m> {
    pub parameter: &'m Parameter,
    /// Namespace that matched, and the name with the member path
    /// re-attached in canonical form.
    pub id: NamedObjectId,
    pub path: Option<AggregatePath>,
}

impl<'m> ParameterWithId<'m> {
    /// Check the member path against the parameter's declared type.
    pub fn verify_member_path(&self, mdb: &MissionDatabase) -> CatalogResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let valid = mdb
            .parameter_type_of(self.parameter)
            .map_or(false, |t| path.verify(&t.data_type));
        if valid {
            Ok(())
        } else {
            Err(CatalogError::not_found(format!(
                "Nonexistent array/aggregate path in name {}{}",
                self.parameter.qualified_name, path
            )))
        }
    }
}

/// Split a display path at its last `/` into `(namespace, name)`.
///
/// Returns `None` when there is no `/` or it is the last character.
pub fn split_namespace(path: &str) -> Option<(&str, &str)> {
    let idx = path.rfind('/')?;
    if idx == path.len() - 1 {
        return None;
    }
    Some((&path[..idx], &path[idx + 1..]))
}

/// Try the canonical `/`-prefixed namespace first, then the namespace
/// exactly as written (legacy aliases such as `MDB:OPS Name`).
fn lookup<'m, T: Named>(
    mdb: &'m MissionDatabase,
    namespace: &str,
    name: &str,
) -> Option<Resolved<'m, T>> {
    let table = T::table(mdb);
    [
        NamedObjectId::new(format!("/{}", namespace), name),
        NamedObjectId::new(namespace, name),
    ]
    .into_iter()
    .find_map(|id| table.get_by_id(&id).map(|entity| Resolved { entity, id }))
}

/// Resolve a display path to an entity of kind `T`.
pub fn resolve<'m, T: Named>(mdb: &'m MissionDatabase, path: &str) -> CatalogResult<Resolved<'m, T>> {
    let (namespace, name) = split_namespace(path)
        .filter(|(namespace, _)| !namespace.is_empty())
        .ok_or_else(|| {
            CatalogError::not_found(format!("No such {} (missing namespace?)", T::KIND))
        })?;

    lookup(mdb, namespace, name)
        .ok_or_else(|| CatalogError::not_found(format!("No such {}", T::KIND)))
}

/// Resolve a space system. Unlike other kinds a path without namespace
/// is accepted and taken relative to the root.
pub fn resolve_space_system<'m>(
    mdb: &'m MissionDatabase,
    path: &str,
) -> CatalogResult<&'m SpaceSystem> {
    if path.trim_end_matches('/').is_empty() {
        return Ok(mdb.root());
    }
    let (namespace, name) = split_namespace(path).unwrap_or(("", path));
    lookup::<SpaceSystem>(mdb, namespace, name)
        .map(|resolved| resolved.entity)
        .ok_or_else(|| CatalogError::not_found("No such space system"))
}

/// Resolve a parameter path that may carry a member path suffix, such as
/// `/sys1/Vec.samples[2].value`.
///
/// The member path is parsed but not yet checked against the type; call
/// [`ParameterWithId::verify_member_path`] once access has been granted.
pub fn resolve_parameter<'m>(
    mdb: &'m MissionDatabase,
    path: &str,
) -> CatalogResult<ParameterWithId<'m>> {
    let (base, member_path) = match AggregatePath::find_separator(path) {
        Some(idx) => {
            let parsed = AggregatePath::parse(&path[idx..]).map_err(|e| {
                CatalogError::not_found(format!(
                    "Invalid array/aggregate path in name {} ({})",
                    path, e
                ))
            })?;
            (&path[..idx], Some(parsed))
        }
        None => (path, None),
    };

    let Resolved { entity, mut id } = match resolve::<Parameter>(mdb, base) {
        Ok(resolved) => resolved,
        Err(CatalogError::NotFound(msg)) if msg.contains("missing namespace") => {
            return Err(CatalogError::NotFound(msg))
        }
        Err(CatalogError::NotFound(_)) => {
            return Err(CatalogError::not_found(format!(
                "No parameter named {}",
                path
            )))
        }
        Err(e) => return Err(e),
    };

    if let Some(member_path) = &member_path {
        id.name.push_str(&member_path.to_string());
    }

    Ok(ParameterWithId {
        parameter: entity,
        id,
        path: member_path,
    })
}

/// Look up a parameter by id, as given in batch requests.
pub fn resolve_parameter_id<'m>(
    mdb: &'m MissionDatabase,
    id: &NamedObjectId,
) -> Option<&'m Parameter> {
    mdb.parameters().get_by_id(id)
}
