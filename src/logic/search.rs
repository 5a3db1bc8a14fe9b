use crate::model::{
    AggregatePath, DataType, MissionDatabase, Named, Parameter, PathElement, Subscript,
};

/// Case-insensitive free-text matcher. The query is split on whitespace
/// and every term must occur in the name, the description or an alias.
#[derive(Debug, Clone, Default)]
pub struct SearchMatcher {
    terms: Vec<String>,
}

impl SearchMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            terms: query.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches<T: Named>(&self, item: &T) -> bool {
        let name = item.name().to_lowercase();
        let description = item.description().map(str::to_lowercase);
        let aliases: Vec<String> = item
            .aliases()
            .iter()
            .map(|alias| alias.name.to_lowercase())
            .collect();

        self.terms.iter().all(|term| {
            name.contains(term.as_str())
                || description
                    .as_deref()
                    .map_or(false, |d| d.contains(term.as_str()))
                || aliases.iter().any(|a| a.contains(term.as_str()))
        })
    }

    pub fn matches_text(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.terms.iter().all(|term| text.contains(term.as_str()))
    }

    fn matches_any_term(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.terms.iter().any(|term| text.contains(term.as_str()))
    }

    /// A member matches when its own field name holds at least one term
    /// and its path from the parameter holds all of them, so
    /// `samples value` finds `.samples[].value` but not `.samples`.
    fn matches_member(&self, field: &str, path: &AggregatePath) -> bool {
        self.matches_any_term(field) && self.matches_text(&path.to_string())
    }
}

/// A member inside an aggregate or array parameter whose name matched.
#[derive(Debug, Clone)]
pub struct MemberMatch<'m> {
    pub parameter: &'m Parameter,
    pub path: AggregatePath,
    /// Qualified name of the parameter followed by the member path.
    pub rendered: String,
}

/// Every member path of `parameter` matched by `matcher`, see
/// [`SearchMatcher::matches_member`]. Array levels are represented by `[]`
/// subscripts.
pub fn search_members<'m>(
    mdb: &'m MissionDatabase,
    parameter: &'m Parameter,
    matcher: &SearchMatcher,
) -> Vec<MemberMatch<'m>> {
    let mut paths = Vec::new();
    if matcher.is_empty() {
        return Vec::new();
    }
    if let Some(parameter_type) = mdb.parameter_type_of(parameter) {
        walk(&parameter_type.data_type, &mut Vec::new(), matcher, &mut paths);
    }
    paths
        .into_iter()
        .map(|path| MemberMatch {
            parameter,
            rendered: format!("{}{}", parameter.qualified_name, path),
            path,
        })
        .collect()
}

fn walk(
    data_type: &DataType,
    prefix: &mut Vec<PathElement>,
    matcher: &SearchMatcher,
    out: &mut Vec<AggregatePath>,
) {
    match data_type {
        DataType::Aggregate { members } => {
            for member in members {
                prefix.push(PathElement::field(member.name.as_str()));
                let path = AggregatePath(prefix.clone());
                if matcher.matches_member(&member.name, &path) {
                    out.push(path);
                }
                walk(&member.data_type, prefix, matcher, out);
                prefix.pop();
            }
        }
        DataType::Array {
            dimensions,
            element,
        } => {
            let any = std::iter::repeat(Subscript::Any).take(*dimensions);
            match prefix.last_mut() {
                Some(last) => {
                    let restore = last.index.len();
                    last.index.extend(any);
                    walk(element, prefix, matcher, out);
                    if let Some(last) = prefix.last_mut() {
                        last.index.truncate(restore);
                    }
                }
                None => {
                    prefix.push(PathElement {
                        name: None,
                        index: any.collect(),
                    });
                    walk(element, prefix, matcher, out);
                    prefix.pop();
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::rich_catalog;

    #[test]
    fn test_matcher_is_case_insensitive_over_name_description_aliases() {
        let mdb = rich_catalog();
        let p1 = mdb.parameters().get("/sys1/P1").unwrap();
        let p3 = mdb.parameters().get("/sys2/P3").unwrap();

        assert!(SearchMatcher::new("p1").matches(p1));
        assert!(SearchMatcher::new("BATTERY").matches(p1));
        assert!(SearchMatcher::new("battery volt").matches(p1));
        assert!(!SearchMatcher::new("battery current").matches(p1));
        assert!(SearchMatcher::new("ops_p3").matches(p3));
        assert!(SearchMatcher::new("").matches(p3));
    }

    #[test]
    fn test_search_members_walks_aggregates_and_arrays() {
        let mdb = rich_catalog();
        let vec = mdb.parameters().get("/sys1/Vec").unwrap();

        let value: Vec<String> = search_members(&mdb, vec, &SearchMatcher::new("value"))
            .into_iter()
            .map(|m| m.rendered)
            .collect();
        assert_eq!(value, vec!["/sys1/Vec.samples[].value"]);

        let x: Vec<String> = search_members(&mdb, vec, &SearchMatcher::new("X"))
            .into_iter()
            .map(|m| m.rendered)
            .collect();
        assert_eq!(x, vec!["/sys1/Vec.x"]);

        let samples = search_members(&mdb, vec, &SearchMatcher::new("samples"));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].path.to_string(), ".samples");
    }

    #[test]
    fn test_search_members_matches_terms_along_the_path() {
        let mdb = rich_catalog();
        let vec = mdb.parameters().get("/sys1/Vec").unwrap();

        let both: Vec<String> = search_members(&mdb, vec, &SearchMatcher::new("samples value"))
            .into_iter()
            .map(|m| m.rendered)
            .collect();
        assert_eq!(both, vec!["/sys1/Vec.samples[].value"]);

        assert!(search_members(&mdb, vec, &SearchMatcher::new("x value")).is_empty());
    }

    #[test]
    fn test_search_members_ignores_scalars_and_empty_queries() {
        let mdb = rich_catalog();
        let p1 = mdb.parameters().get("/sys1/P1").unwrap();
        let vec = mdb.parameters().get("/sys1/Vec").unwrap();
        assert!(search_members(&mdb, p1, &SearchMatcher::new("x")).is_empty());
        assert!(search_members(&mdb, vec, &SearchMatcher::new("  ")).is_empty());
    }
}
