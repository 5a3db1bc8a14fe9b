use serde::{Deserialize, Serialize};

/// The identity acting on a request, extracted from request headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub user_name: Option<String>,
}

impl UserContext {
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Create a new UserContext with just a user ID
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: None,
        }
    }

    pub fn with_details(user_id: String, name: Option<String>) -> Self {
        Self {
            user_id,
            user_name: name,
        }
    }

    /// Identity used when a request carries no user headers. It holds
    /// whatever privileges the security configuration grants to
    /// `anonymous`, which is none by default.
    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS)
    }
}

impl Default for UserContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
