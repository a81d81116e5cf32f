use serde_json::{Map, Value};

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FieldPath, FilterData, FilterOrderInfo, FilterWhereInfo, SqlResult};

/// Validated find over one collection. Renders to SQL for Postgres or
/// evaluates directly against in-memory documents.
#[derive(Debug, Clone)]
pub struct Filter {
    table_name: String,
    select_fields: Option<Vec<String>>,
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            select_fields: None,
            where_data: vec![],
            order_data: vec![],
            limit: None,
        }
    }

    pub fn from_data(table_name: impl Into<String>, data: &FilterData) -> Result<Self, FilterError> {
        let mut filter = Self::new(table_name);
        filter.assign(data)?;
        Ok(filter)
    }

    pub fn assign(&mut self, data: &FilterData) -> Result<&mut Self, FilterError> {
        if let Some(select) = &data.select { self.select(select.clone())?; }
        if let Some(where_clause) = &data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = &data.order { self.order(order)?; }
        if let Some(limit) = data.limit { self.limit(limit); }
        Ok(self)
    }

    pub fn select(&mut self, fields: Vec<String>) -> Result<&mut Self, FilterError> {
        for field in &fields {
            FieldPath::parse(field)?;
        }
        self.select_fields = Some(fields);
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: &Value) -> Result<&mut Self, FilterError> {
        self.where_data = FilterWhere::validate_and_parse(conditions)?;
        Ok(self)
    }

    pub fn order(&mut self, order_spec: &Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(order_spec)?;
        Ok(self)
    }

    /// Zero means unbounded.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    pub fn to_sql(&self) -> SqlResult {
        let mut params = vec![];
        let where_clause = FilterWhere::generate(&self.where_data, &mut params);
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.limit.map(|l| format!("LIMIT {}", l)).unwrap_or_default();

        let query = [
            "SELECT \"id\", \"doc\"".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        SqlResult { query, params }
    }

    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        FilterWhere::matches(&self.where_data, doc)
    }

    /// Filter, stable-sort, limit and project an in-memory collection.
    pub fn apply<'a, I>(&self, docs: I) -> Vec<Map<String, Value>>
    where
        I: IntoIterator<Item = &'a Map<String, Value>>,
    {
        let mut selected: Vec<&Map<String, Value>> = docs.into_iter().filter(|d| self.matches(d)).collect();
        if !self.order_data.is_empty() {
            selected.sort_by(|a, b| FilterOrder::compare(&self.order_data, a, b));
        }
        if let Some(limit) = self.limit {
            selected.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        selected.into_iter().map(|d| self.project(d.clone())).collect()
    }

    /// Keep only the selected top-level fields; absent fields stay absent.
    pub fn project(&self, mut doc: Map<String, Value>) -> Map<String, Value> {
        match &self.select_fields {
            None => doc,
            Some(fields) => fields
                .iter()
                .filter_map(|f| doc.remove(f).map(|v| (f.clone(), v)))
                .collect(),
        }
    }
}
