use crate::model::{is_under, CatalogItem, MissionDatabase, SpaceSystem};

/// Which direct children of a scope are offered for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildSystems {
    /// Direct children holding at least one of the candidates at any
    /// depth.
    All,
    /// Only children with at least one container at any depth.
    WithContainers,
}

/// Candidates of one list request after scoping, plus the child space
/// systems visible below the scope.
#[derive(Debug)]
pub struct ScopedCandidates<'m, T> {
    pub items: Vec<&'m T>,
    pub space_systems: Vec<String>,
}

/// Restrict `candidates` to `scope`.
///
/// Without a scope every candidate is kept. With a free-text query the
/// scope selects a whole subtree. Otherwise only direct members of the
/// scope are kept and its children are listed for navigation.
pub fn restrict<'m, T: CatalogItem>(
    mdb: &'m MissionDatabase,
    candidates: impl Iterator<Item = &'m T>,
    scope: Option<&SpaceSystem>,
    has_query: bool,
    children: ChildSystems,
) -> ScopedCandidates<'m, T> {
    let Some(scope) = scope else {
        return ScopedCandidates {
            items: candidates.collect(),
            space_systems: Vec::new(),
        };
    };

    if has_query {
        return ScopedCandidates {
            items: candidates
                .filter(|item| is_under(item.qualified_name(), &scope.qualified_name))
                .collect(),
            space_systems: Vec::new(),
        };
    }

    let candidates: Vec<&'m T> = candidates.collect();
    let holds_candidate = |child: &SpaceSystem| {
        candidates.iter().any(|item| {
            let owner = item.space_system();
            owner == child.qualified_name || is_under(owner, &child.qualified_name)
        })
    };

    let mut space_systems: Vec<String> = scope
        .sub_systems
        .iter()
        .filter_map(|qn| mdb.space_system(qn))
        .filter(|child| match children {
            ChildSystems::All => holds_candidate(*child),
            ChildSystems::WithContainers => mdb.container_count(child, true) > 0,
        })
        .map(|child| child.qualified_name.clone())
        .collect();
    space_systems.sort();

    let items = candidates
        .into_iter()
        .filter(|item| item.space_system() == scope.qualified_name)
        .collect();

    ScopedCandidates {
        items,
        space_systems,
    }
}
