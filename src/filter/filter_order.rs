use std::cmp::Ordering;

use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::{FieldPath, FilterOrderInfo, SortDirection, ID_FIELD};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match order {
            Value::Null => Ok(vec![]),
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // ["reviewTime desc", "name asc"]
                let mut out = Vec::new();
                for v in arr {
                    let s = v
                        .as_str()
                        .ok_or_else(|| FilterError::InvalidOrder(format!("expected string, got {}", v)))?;
                    out.extend(Self::parse_order_string(s)?);
                }
                Ok(out)
            }
            Value::Object(obj) => {
                // { "reviewTime": "desc", "name": "asc" }
                let mut out = Vec::new();
                for (k, v) in obj {
                    out.push(FilterOrderInfo {
                        path: FieldPath::parse(k)?,
                        sort: Self::parse_direction(v.as_str().unwrap_or("asc"))?,
                    });
                }
                Ok(out)
            }
            other => Err(FilterError::InvalidOrder(other.to_string())),
        }
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(field) = it.next() {
                out.push(FilterOrderInfo {
                    path: FieldPath::parse(field)?,
                    sort: Self::parse_direction(it.next().unwrap_or("asc"))?,
                });
            }
        }
        Ok(out)
    }

    fn parse_direction(dir: &str) -> Result<SortDirection, FilterError> {
        match dir.to_ascii_lowercase().as_str() {
            "asc" | "1" => Ok(SortDirection::Asc),
            "desc" | "-1" => Ok(SortDirection::Desc),
            other => Err(FilterError::InvalidOrder(format!("unknown direction '{}'", other))),
        }
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| {
                let expr = if i.path.is_id() {
                    "\"id\"".to_string()
                } else {
                    format!("\"doc\" #> {}", i.path.to_pg_path())
                };
                format!("{} {}", expr, i.sort.to_sql())
            })
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    pub fn compare(infos: &[FilterOrderInfo], a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        for info in infos {
            let (left, right) = if info.path.is_id() {
                (a.get(ID_FIELD), b.get(ID_FIELD))
            } else {
                (info.path.lookup(a), info.path.lookup(b))
            };
            let ordering = compare_values(left, right);
            let ordering = match info.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// JSONB ordering: missing < null < string < number < boolean < array < object.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::Bool(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }

    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
