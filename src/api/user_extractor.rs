use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use crate::model::UserContext;

/// Axum extractor for UserContext from request headers
///
/// - X-User-Id: user identifier, `anonymous` when absent
/// - X-User-Name: optional display name
#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(user_from_headers(&parts.headers))
    }
}

pub fn user_from_headers(headers: &HeaderMap) -> UserContext {
    match extract_header_value(headers, "x-user-id") {
        Some(user_id) => {
            UserContext::with_details(user_id, extract_header_value(headers, "x-user-name"))
        }
        None => UserContext::anonymous(),
    }
}

/// Extract header value as string
fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderName, HeaderValue};

    #[test]
    fn test_user_context_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("operator"),
        );
        headers.insert(
            HeaderName::from_static("x-user-name"),
            HeaderValue::from_static("Flight Operator"),
        );

        let user = user_from_headers(&headers);
        assert_eq!(user.user_id, "operator");
        assert_eq!(user.user_name, Some("Flight Operator".to_string()));
    }

    #[test]
    fn test_missing_or_blank_header_is_anonymous() {
        assert_eq!(user_from_headers(&HeaderMap::new()), UserContext::anonymous());

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("x-user-id"),
            HeaderValue::from_static("  "),
        );
        assert_eq!(user_from_headers(&headers).user_id, UserContext::ANONYMOUS);
    }
}
