pub mod auth;
pub mod limit;
pub mod response;

pub use auth::AuthUser;
pub use limit::limited_listing;
pub use response::{ApiResponse, ApiResult};

/// Raw query pairs in request order. Keys may repeat.
pub type QueryPairs = Vec<(String, String)>;

/// First value for `key`; later repeats are ignored.
pub fn first_query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}
