// handlers/protected - every handler here takes an `AuthUser`, so anonymous
// requests are rejected with 401 before the handler runs.
pub mod reviews;
