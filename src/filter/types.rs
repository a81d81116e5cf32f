use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::FilterError;

/// Document key holding the store-assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Declarative find description shared by every store backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    /// Projection; `_id` is only included when listed.
    pub select: Option<Vec<String>>,
    /// `{ "field.path": value }` or `{ "field.path": { "$eq": value } }`
    pub where_clause: Option<Value>,
    /// `"reviewTime desc"`, `["a desc", "b"]` or `{ "a": "desc" }`
    pub order: Option<Value>,
    pub limit: Option<i64>,
}

/// Dotted path into a document, e.g. `reviewer.email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn parse(path: &str) -> Result<Self, FilterError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        let valid = segments.iter().all(|s| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
        if !valid {
            return Err(FilterError::InvalidField(path.to_string()));
        }
        Ok(Self(segments))
    }

    pub fn is_id(&self) -> bool {
        self.0.len() == 1 && self.0[0] == ID_FIELD
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn lookup<'a>(&self, doc: &'a Map<String, Value>) -> Option<&'a Value> {
        let (first, rest) = self.0.split_first()?;
        rest.iter()
            .try_fold(doc.get(first)?, |value, segment| value.as_object()?.get(segment))
    }

    /// Postgres text-array literal, e.g. `'{reviewer,email}'`. Segments are pre-validated.
    pub fn to_pg_path(&self) -> String {
        format!("'{{{}}}'", self.0.join(","))
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub path: FieldPath,
    pub data: Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Missing values sort lowest in both directions.
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC NULLS FIRST",
            SortDirection::Desc => "DESC NULLS LAST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub path: FieldPath,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Id(Uuid),
    Json(Value),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
