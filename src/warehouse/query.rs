//! Parameterized analytic queries
//!
//! A `Query` is SQL text plus named bindings. Builders produce these as
//! values; request-controlled data never appears in the text itself.

/// A fully parameterized warehouse query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<QueryParameter>,
}

impl Query {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Attach a named STRING binding
    pub fn bind_string(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push(QueryParameter {
            name,
            value: ParamValue::String(value.into()),
        });
        self
    }

    /// Attach a named INT64 binding
    pub fn bind_int(mut self, name: &'static str, value: i64) -> Self {
        self.params.push(QueryParameter {
            name,
            value: ParamValue::Int64(value),
        });
        self
    }

    /// Look up a binding by name
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }
}

/// A named binding attached to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    pub name: &'static str,
    pub value: ParamValue,
}

/// The parameter kinds the gateway binds. Exhaustive: endpoints take only
/// text and integer inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int64(i64),
}

impl ParamValue {
    /// Standard SQL type name used on the wire
    pub fn sql_type(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "STRING",
            ParamValue::Int64(_) => "INT64",
        }
    }

    /// Wire representation; the query API transports all values as strings
    pub fn wire_value(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Int64(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings_accumulate_in_order() {
        let query = Query::new("SELECT 1")
            .bind_string("query", "reset password")
            .bind_int("row_cap", 100);

        assert_eq!(query.params.len(), 2);
        assert_eq!(query.params[0].name, "query");
        assert_eq!(query.params[1].name, "row_cap");
    }

    #[test]
    fn test_param_lookup() {
        let query = Query::new("SELECT 1").bind_int("centroid_id", 7);

        assert_eq!(query.param("centroid_id"), Some(&ParamValue::Int64(7)));
        assert_eq!(query.param("missing"), None);
    }

    #[test]
    fn test_wire_shapes() {
        assert_eq!(ParamValue::String("a".into()).sql_type(), "STRING");
        assert_eq!(ParamValue::Int64(3).sql_type(), "INT64");
        assert_eq!(ParamValue::Int64(-12).wire_value(), "-12");
        assert_eq!(ParamValue::String("x y".into()).wire_value(), "x y");
    }
}
