use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::model::Named;

const TOKEN_VERSION: u32 = 1;

/// Continuation cursor: the sort key of the last item of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageToken {
    pub name: String,
    /// Member path of the last item when it was a member match.
    pub path: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    v: u32,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl PageToken {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    fn from_key(key: PageKey<'_>) -> Self {
        Self {
            name: key.name.to_string(),
            path: key.path.map(str::to_string),
        }
    }

    pub fn key(&self) -> PageKey<'_> {
        PageKey {
            name: &self.name,
            path: self.path.as_deref(),
        }
    }

    pub fn encode(&self) -> CatalogResult<String> {
        let json = serde_json::to_vec(&Envelope {
            v: TOKEN_VERSION,
            name: self.name.clone(),
            path: self.path.clone(),
        })
        .map_err(anyhow::Error::from)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(token: &str) -> CatalogResult<Self> {
        let invalid = || CatalogError::bad_request("Invalid continuation token");
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|_| invalid())?;
        let envelope: Envelope = serde_json::from_slice(&bytes).map_err(|_| invalid())?;
        if envelope.v != TOKEN_VERSION {
            return Err(CatalogError::bad_request(format!(
                "Unsupported continuation token version {}",
                envelope.v
            )));
        }
        Ok(Self {
            name: envelope.name,
            path: envelope.path,
        })
    }
}

/// Canonical sort key. Plain entities have no path and sort before the
/// member matches of the same parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PageKey<'a> {
    pub name: &'a str,
    pub path: Option<&'a str>,
}

pub trait Paged {
    fn page_key(&self) -> PageKey<'_>;
}

impl<T: Named> Paged for &T {
    fn page_key(&self) -> PageKey<'_> {
        PageKey {
            name: self.qualified_name(),
            path: None,
        }
    }
}

/// Window selection of a list request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub pos: Option<usize>,
    pub limit: Option<usize>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_size: usize,
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    pub space_systems: Vec<String>,
}

impl<T: Paged> Page<T> {
    /// Sort `items` canonically and cut out the requested window.
    ///
    /// A continuation token takes precedence over `pos`.
    pub fn build(
        mut items: Vec<T>,
        request: &PageRequest,
        default_limit: usize,
    ) -> CatalogResult<Self> {
        let limit = request.limit.unwrap_or(default_limit);
        if limit == 0 {
            return Err(CatalogError::bad_request("limit must be greater than zero"));
        }

        items.sort_by(|a, b| a.page_key().cmp(&b.page_key()));
        let total_size = items.len();

        let skip = match (&request.next, request.pos) {
            (Some(next), pos) => {
                if pos.is_some() {
                    log::debug!("Both pos and next given; continuing from the token");
                }
                let token = PageToken::decode(next)?;
                let after = token.key();
                items.partition_point(|item| item.page_key() <= after)
            }
            (None, Some(pos)) => pos.min(items.len()),
            (None, None) => 0,
        };
        items.drain(..skip);

        let continuation_token = if items.len() > limit {
            items.truncate(limit);
            match items.last() {
                Some(last) => Some(PageToken::from_key(last.page_key()).encode()?),
                None => None,
            }
        } else {
            None
        };

        Ok(Self {
            total_size,
            items,
            continuation_token,
            space_systems: Vec::new(),
        })
    }
}

impl<T> Page<T> {
    pub fn with_space_systems(mut self, space_systems: Vec<String>) -> Self {
        self.space_systems = space_systems;
        self
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total_size: self.total_size,
            items: self.items.into_iter().map(f).collect(),
            continuation_token: self.continuation_token,
            space_systems: self.space_systems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::testing::three_parameters;
    use crate::model::Parameter;

    fn request(limit: usize, next: Option<String>) -> PageRequest {
        PageRequest {
            pos: None,
            limit: Some(limit),
            next,
        }
    }

    fn names(page: &Page<&Parameter>) -> Vec<String> {
        page.items.iter().map(|p| p.qualified_name.clone()).collect()
    }

    #[test]
    fn test_token_round_trip() {
        let token = PageToken::new("/sys1/P1");
        assert_eq!(PageToken::decode(&token.encode().unwrap()).unwrap(), token);

        let member = PageToken {
            name: "/sys1/Vec".to_string(),
            path: Some(".samples[].value".to_string()),
        };
        assert_eq!(PageToken::decode(&member.encode().unwrap()).unwrap(), member);
    }

    #[test]
    fn test_bad_tokens_are_rejected() {
        assert!(matches!(
            PageToken::decode("not a token!"),
            Err(CatalogError::BadRequest(_))
        ));
        assert!(matches!(
            PageToken::decode(&URL_SAFE_NO_PAD.encode("/sys1/P1")),
            Err(CatalogError::BadRequest(_))
        ));
        let old = URL_SAFE_NO_PAD.encode(r#"{"v":0,"name":"/sys1/P1"}"#);
        assert!(matches!(
            PageToken::decode(&old),
            Err(CatalogError::BadRequest(_))
        ));
    }

    #[test]
    fn test_cursor_pagination_walks_every_item_once() {
        let mdb = three_parameters();
        let all: Vec<&Parameter> = mdb.parameters().iter().collect();

        let page1 = Page::build(all.clone(), &request(1, None), 100).unwrap();
        assert_eq!(names(&page1), vec!["/sys1/P1"]);
        assert_eq!(page1.total_size, 3);
        let token1 = page1.continuation_token.clone().unwrap();
        assert_eq!(PageToken::decode(&token1).unwrap().name, "/sys1/P1");

        let page2 = Page::build(all.clone(), &request(1, Some(token1)), 100).unwrap();
        assert_eq!(names(&page2), vec!["/sys1/sub/P2"]);
        let token2 = page2.continuation_token.clone().unwrap();
        assert_eq!(PageToken::decode(&token2).unwrap().name, "/sys1/sub/P2");

        let page3 = Page::build(all, &request(1, Some(token2)), 100).unwrap();
        assert_eq!(names(&page3), vec!["/sys2/P3"]);
        assert!(page3.continuation_token.is_none());
    }

    #[test]
    fn test_offset_mode_and_limits() {
        let mdb = three_parameters();
        let mut all: Vec<&Parameter> = mdb.parameters().iter().collect();
        all.reverse();

        let page = Page::build(
            all.clone(),
            &PageRequest {
                pos: Some(1),
                limit: None,
                next: None,
            },
            100,
        )
        .unwrap();
        assert_eq!(names(&page), vec!["/sys1/sub/P2", "/sys2/P3"]);
        assert!(page.continuation_token.is_none());

        let past_end = Page::build(
            all.clone(),
            &PageRequest {
                pos: Some(10),
                limit: None,
                next: None,
            },
            100,
        )
        .unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total_size, 3);

        assert!(matches!(
            Page::build(all.clone(), &request(0, None), 100),
            Err(CatalogError::BadRequest(_))
        ));

        // exact fit emits no token
        let exact = Page::build(all, &request(3, None), 100).unwrap();
        assert!(exact.continuation_token.is_none());
    }

    #[test]
    fn test_cursor_wins_over_pos() {
        let mdb = three_parameters();
        let all: Vec<&Parameter> = mdb.parameters().iter().collect();
        let token = PageToken::new("/sys1/sub/P2").encode().unwrap();
        let page = Page::build(
            all,
            &PageRequest {
                pos: Some(0),
                limit: None,
                next: Some(token),
            },
            100,
        )
        .unwrap();
        assert_eq!(names(&page), vec!["/sys2/P3"]);
    }
}
