pub mod page_token;
pub mod privilege;
pub mod query;
pub mod resolve;
pub mod scope;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use page_token::*;
pub use privilege::*;
pub use query::*;
pub use resolve::*;
pub use scope::*;
pub use search::*;
