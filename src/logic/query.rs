use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::logic::page_token::{Page, PageKey, PageRequest, Paged};
use crate::logic::privilege::PrivilegeGate;
use crate::logic::resolve::{
    resolve, resolve_parameter, resolve_parameter_id, resolve_space_system, ParameterWithId,
};
use crate::logic::scope::{restrict, ChildSystems};
use crate::logic::search::{search_members, MemberMatch, SearchMatcher};
use crate::model::{
    Algorithm, AlgorithmScope, CatalogCounts, CatalogItem, Command, Container, DataSource, EntityKind,
    MissionDatabase, NamedObjectId, Parameter, ParameterType, SpaceSystem, SystemPrivilege,
    UserContext,
};

pub const DEFAULT_LIMIT: usize = 100;

/// Scope, free-text query and window shared by every list operation.
#[derive(Debug, Clone, Default)]
pub struct ListRequest {
    pub system: Option<String>,
    pub q: Option<String>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Default)]
pub struct ListParametersRequest {
    pub list: ListRequest,
    /// Engineering type names, compared case-insensitively.
    pub types: Vec<String>,
    pub source: Option<DataSource>,
    pub search_members: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListCommandsRequest {
    pub list: ListRequest,
    pub no_abstract: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListAlgorithmsRequest {
    pub list: ListRequest,
    pub scope: Option<AlgorithmScope>,
}

/// An item of a parameter listing: a parameter, or a member inside an
/// aggregate parameter found by member search.
#[derive(Debug, Clone)]
pub enum ParameterMatch<'m> {
    Parameter(&'m Parameter),
    Member(MemberMatch<'m>),
}

impl<'m> ParameterMatch<'m> {
    pub fn parameter(&self) -> &'m Parameter {
        match self {
            ParameterMatch::Parameter(p) => p,
            ParameterMatch::Member(m) => m.parameter,
        }
    }
}

impl Paged for ParameterMatch<'_> {
    fn page_key(&self) -> PageKey<'_> {
        match self {
            ParameterMatch::Parameter(p) => PageKey {
                name: &p.qualified_name,
                path: None,
            },
            ParameterMatch::Member(m) => PageKey {
                name: &m.parameter.qualified_name,
                path: Some(&m.rendered[m.parameter.qualified_name.len()..]),
            },
        }
    }
}

/// A parameter returned by a batch get, with the id it was asked for.
#[derive(Debug, Clone)]
pub struct BatchItem<'m> {
    pub id: NamedObjectId,
    pub parameter: &'m Parameter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionDatabaseSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub counts: CatalogCounts,
    pub space_systems: Vec<String>,
}

/// `system` with trailing separators removed; the root stays `/`.
fn scope_path(system: &str) -> &str {
    match system.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Read-only queries against one catalog snapshot on behalf of one user.
pub struct CatalogQuery<'a> {
    mdb: &'a MissionDatabase,
    gate: &'a dyn PrivilegeGate,
    user: &'a UserContext,
    default_limit: usize,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(mdb: &'a MissionDatabase, gate: &'a dyn PrivilegeGate, user: &'a UserContext) -> Self {
        Self {
            mdb,
            gate,
            user,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = default_limit;
        self
    }

    pub fn mdb(&self) -> &'a MissionDatabase {
        self.mdb
    }

    pub fn user(&self) -> &'a UserContext {
        self.user
    }

    fn require_read_catalog(&self) -> CatalogResult<()> {
        if self
            .gate
            .has_system_privilege(self.user, SystemPrivilege::ReadCatalog)
        {
            Ok(())
        } else {
            Err(CatalogError::forbidden(format!(
                "Insufficient privileges: {} needs {:?}",
                self.user.user_id,
                SystemPrivilege::ReadCatalog
            )))
        }
    }

    fn authorize<T: CatalogItem>(&self, item: &T) -> CatalogResult<()> {
        if self.gate.has_access(self.user, T::KIND, item.qualified_name()) {
            Ok(())
        } else {
            Err(CatalogError::forbidden(format!(
                "Insufficient privileges to access {} {}",
                T::KIND,
                item.qualified_name()
            )))
        }
    }

    /// Authorized, scoped and filtered candidates of kind `T`, with the
    /// child space systems visible under the scope.
    fn candidates<T: CatalogItem>(
        &self,
        request: &ListRequest,
        children: ChildSystems,
        filter: impl Fn(&T) -> bool,
    ) -> CatalogResult<(Vec<&'a T>, Vec<String>, SearchMatcher)> {
        let matcher = SearchMatcher::new(request.q.as_deref().unwrap_or_default());
        let scope = match request.system.as_deref() {
            None => None,
            Some(system) => match resolve_space_system(self.mdb, scope_path(system)) {
                Ok(scope) => Some(scope),
                Err(CatalogError::NotFound(_)) => {
                    log::debug!("No space system {}, nothing to list", system);
                    return Ok((Vec::new(), Vec::new(), matcher));
                }
                Err(e) => return Err(e),
            },
        };

        let authorized = T::table(self.mdb)
            .iter()
            .filter(|item| self.gate.has_access(self.user, T::KIND, item.qualified_name()));
        let scoped = restrict(self.mdb, authorized, scope, !matcher.is_empty(), children);

        let items = scoped.items.into_iter().filter(|item| filter(*item)).collect();
        Ok((items, scoped.space_systems, matcher))
    }

    fn list<T: CatalogItem>(
        &self,
        request: &ListRequest,
        children: ChildSystems,
        filter: impl Fn(&T) -> bool,
    ) -> CatalogResult<Page<&'a T>> {
        let (items, space_systems, matcher) = self.candidates(request, children, filter)?;
        let items: Vec<&'a T> = items
            .into_iter()
            .filter(|item| matcher.matches(*item))
            .collect();
        log::debug!(
            "Listing {} under {:?} for {}: {} matches",
            T::KIND,
            request.system,
            self.user.user_id,
            items.len()
        );
        Ok(Page::build(items, &request.page, self.default_limit)?.with_space_systems(space_systems))
    }

    pub fn list_parameters(
        &self,
        request: &ListParametersRequest,
    ) -> CatalogResult<Page<ParameterMatch<'a>>> {
        let mdb = self.mdb;
        let (candidates, space_systems, matcher) =
            self.candidates(&request.list, ChildSystems::All, |p: &Parameter| {
                if let Some(source) = request.source {
                    if p.data_source != Some(source) {
                        return false;
                    }
                }
                request.types.is_empty()
                    || mdb.parameter_type_of(p).map_or(false, |t| {
                        request
                            .types
                            .iter()
                            .any(|wanted| wanted.eq_ignore_ascii_case(t.type_name()))
                    })
            })?;

        let mut matches: Vec<ParameterMatch<'a>> = candidates
            .iter()
            .filter(|p| matcher.matches(**p))
            .map(|p| ParameterMatch::Parameter(*p))
            .collect();
        if request.search_members && !matcher.is_empty() {
            for p in &candidates {
                matches.extend(
                    search_members(mdb, *p, &matcher)
                        .into_iter()
                        .map(ParameterMatch::Member),
                );
            }
        }

        log::debug!(
            "Listing parameters under {:?} for {}: {} matches",
            request.list.system,
            self.user.user_id,
            matches.len()
        );
        Ok(Page::build(matches, &request.list.page, self.default_limit)?
            .with_space_systems(space_systems))
    }

    pub fn list_containers(&self, request: &ListRequest) -> CatalogResult<Page<&'a Container>> {
        self.list(request, ChildSystems::WithContainers, |_: &Container| true)
    }

    pub fn list_commands(&self, request: &ListCommandsRequest) -> CatalogResult<Page<&'a Command>> {
        self.list(&request.list, ChildSystems::All, |c: &Command| {
            !(request.no_abstract && c.is_abstract)
        })
    }

    pub fn list_algorithms(
        &self,
        request: &ListAlgorithmsRequest,
    ) -> CatalogResult<Page<&'a Algorithm>> {
        self.list(&request.list, ChildSystems::All, |a: &Algorithm| {
            request.scope.map_or(true, |scope| a.scope == scope)
        })
    }

    pub fn list_space_systems(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> CatalogResult<Page<&'a SpaceSystem>> {
        self.require_read_catalog()?;
        let matcher = SearchMatcher::new(q.unwrap_or_default());
        let items: Vec<&'a SpaceSystem> = self
            .mdb
            .space_systems()
            .iter()
            .filter(|ss| !ss.is_root() && matcher.matches(*ss))
            .collect();
        Page::build(items, page, self.default_limit)
    }

    /// Resolve, authorize, then check the member path if the name has one.
    pub fn get_parameter(&self, path: &str) -> CatalogResult<ParameterWithId<'a>> {
        let resolved = resolve_parameter(self.mdb, path)?;
        self.authorize(resolved.parameter)?;
        resolved.verify_member_path(self.mdb)?;
        Ok(resolved)
    }

    fn get<T: CatalogItem>(&self, path: &str) -> CatalogResult<&'a T> {
        let resolved = resolve::<T>(self.mdb, path)?;
        self.authorize(resolved.entity)?;
        Ok(resolved.entity)
    }

    pub fn get_container(&self, path: &str) -> CatalogResult<&'a Container> {
        self.get(path)
    }

    pub fn get_command(&self, path: &str) -> CatalogResult<&'a Command> {
        self.get(path)
    }

    pub fn get_algorithm(&self, path: &str) -> CatalogResult<&'a Algorithm> {
        self.get(path)
    }

    pub fn get_parameter_type(&self, path: &str) -> CatalogResult<&'a ParameterType> {
        self.require_read_catalog()?;
        Ok(resolve::<ParameterType>(self.mdb, path)?.entity)
    }

    pub fn get_space_system(&self, path: &str) -> CatalogResult<&'a SpaceSystem> {
        self.require_read_catalog()?;
        resolve_space_system(self.mdb, path)
    }

    /// Look up parameters by id. Ids the user may not read are left out;
    /// an id that matches nothing fails the whole call.
    pub fn batch_get_parameters(&self, ids: &[NamedObjectId]) -> CatalogResult<Vec<BatchItem<'a>>> {
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            if id.name.is_empty() {
                return Err(CatalogError::bad_request("Parameter id without a name"));
            }
            let parameter = resolve_parameter_id(self.mdb, id)
                .ok_or_else(|| CatalogError::bad_request(format!("Invalid parameter id {}", id)))?;
            if !self
                .gate
                .has_access(self.user, EntityKind::Parameter, &parameter.qualified_name)
            {
                log::warn!(
                    "Not providing information about parameter {} because no privileges exist for {}",
                    parameter.qualified_name,
                    self.user.user_id
                );
                continue;
            }
            items.push(BatchItem {
                id: id.clone(),
                parameter,
            });
        }
        Ok(items)
    }

    pub fn mission_database(&self) -> CatalogResult<MissionDatabaseSummary> {
        self.require_read_catalog()?;
        let mut space_systems = self.mdb.root().sub_systems.clone();
        space_systems.sort();
        Ok(MissionDatabaseSummary {
            name: self.mdb.name().to_string(),
            version: self.mdb.version().map(str::to_string),
            counts: self.mdb.counts(),
            space_systems,
        })
    }
}
