// handlers/public - endpoints that never look at the Authorization header.
pub mod auth;
pub mod recipes;
pub mod reviews;
pub mod root;
