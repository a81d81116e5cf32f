use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::FilterError;
use super::types::{FieldPath, FilterWhereInfo, SqlParam, ID_FIELD};

/// Equality conditions on document field paths, ANDed together.
pub struct FilterWhere;

impl FilterWhere {
    pub fn validate_and_parse(where_data: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let obj = match where_data {
            Value::Null => return Ok(vec![]),
            Value::Object(obj) => obj,
            _ => return Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        };

        let mut conditions = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key.starts_with('$') {
                return Err(FilterError::UnsupportedOperator(key.clone()));
            }
            let path = FieldPath::parse(key)?;
            conditions.push(FilterWhereInfo { path, data: Self::equality_operand(value)? });
        }
        Ok(conditions)
    }

    /// `{ "$eq": v }` unwraps to `v`; any other operator object is rejected.
    fn equality_operand(value: &Value) -> Result<Value, FilterError> {
        if let Value::Object(obj) = value {
            if let Some(op) = obj.keys().find(|k| k.starts_with('$')) {
                return match (op.as_str(), obj.len()) {
                    ("$eq", 1) => Ok(obj["$eq"].clone()),
                    ("$eq", _) => Err(FilterError::InvalidWhereClause(
                        "$eq cannot be mixed with other keys".to_string(),
                    )),
                    (other, _) => Err(FilterError::UnsupportedOperator(other.to_string())),
                };
            }
        }
        Ok(value.clone())
    }

    /// SQL predicate over the `id` / `doc` columns. Parameters are appended to `params`.
    pub fn generate(conditions: &[FilterWhereInfo], params: &mut Vec<SqlParam>) -> String {
        let parts: Vec<String> = conditions
            .iter()
            .map(|condition| Self::build_sql_condition(condition, params))
            .collect();

        if parts.is_empty() {
            "1=1".to_string()
        } else {
            parts.join(" AND ")
        }
    }

    fn build_sql_condition(condition: &FilterWhereInfo, params: &mut Vec<SqlParam>) -> String {
        if condition.path.is_id() {
            return match condition.data.as_str().and_then(|s| Uuid::parse_str(s).ok()) {
                Some(id) => {
                    params.push(SqlParam::Id(id));
                    format!("\"id\" = ${}", params.len())
                }
                None => "1=0".to_string(),
            };
        }

        params.push(SqlParam::Json(condition.data.clone()));
        format!("\"doc\" #> {} = ${}", condition.path.to_pg_path(), params.len())
    }

    pub fn matches(conditions: &[FilterWhereInfo], doc: &Map<String, Value>) -> bool {
        conditions.iter().all(|condition| {
            if condition.path.is_id() {
                return doc.get(ID_FIELD) == Some(&condition.data);
            }
            match condition.path.lookup(doc) {
                Some(value) => values_equal(value, &condition.data),
                None => false,
            }
        })
    }
}

/// JSON equality where `10` and `10.0` are the same number, as in JSONB.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(where_data: Value) -> Vec<FilterWhereInfo> {
        FilterWhere::validate_and_parse(&where_data).unwrap()
    }

    #[test]
    fn generates_jsonb_path_equality() {
        let conditions = parse(json!({ "reviewer.email": "a@b.com" }));
        let mut params = vec![];
        let sql = FilterWhere::generate(&conditions, &mut params);

        assert_eq!(sql, "\"doc\" #> '{reviewer,email}' = $1");
        assert_eq!(params, vec![SqlParam::Json(json!("a@b.com"))]);
    }

    #[test]
    fn identifier_condition_uses_id_column() {
        let id = Uuid::now_v7();
        let conditions = parse(json!({ "_id": id.to_string() }));
        let mut params = vec![SqlParam::Json(json!(1))];
        let sql = FilterWhere::generate(&conditions, &mut params);

        assert_eq!(sql, "\"id\" = $2");
        assert_eq!(params[1], SqlParam::Id(id));

        let conditions = parse(json!({ "_id": "not-a-uuid" }));
        assert_eq!(FilterWhere::generate(&conditions, &mut vec![]), "1=0");
    }

    #[test]
    fn empty_where_matches_everything() {
        assert_eq!(FilterWhere::generate(&parse(json!({})), &mut vec![]), "1=1");
        assert!(FilterWhere::matches(&parse(Value::Null), &Map::new()));
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let conditions = parse(json!({ "reviewer.email": { "$eq": "a@b.com" } }));
        let doc = |email: &str| json!({ "reviewer": { "email": email } }).as_object().cloned().unwrap();

        assert!(FilterWhere::matches(&conditions, &doc("a@b.com")));
        assert!(!FilterWhere::matches(&conditions, &doc("A@b.com")));
        assert!(!FilterWhere::matches(&conditions, &doc("xa@b.com")));
        assert!(!FilterWhere::matches(&conditions, &Map::new()));
    }

    #[test]
    fn numbers_compare_by_value() {
        let conditions = parse(json!({ "price": 10 }));
        let doc = json!({ "price": 10.0 }).as_object().cloned().unwrap();
        assert!(FilterWhere::matches(&conditions, &doc));
    }

    #[test]
    fn rejects_non_equality_operators() {
        assert_eq!(
            FilterWhere::validate_and_parse(&json!({ "email": { "$regex": "a" } })).unwrap_err(),
            FilterError::UnsupportedOperator("$regex".to_string())
        );
        assert!(FilterWhere::validate_and_parse(&json!({ "$or": [] })).is_err());
        assert!(FilterWhere::validate_and_parse(&json!("raw sql")).is_err());
    }
}
