//! Multi-source request parameter resolution
//!
//! Every required parameter must be explicit on the request; there are no
//! implicit defaults. A single resolution function checks the sources in a
//! fixed precedence order — query string, then JSON body, then path
//! binding — and the first defined value wins. JSON `null` counts as
//! undefined. Parameter kinds are enumerated exhaustively: endpoints take
//! strings and base-10 integers, nothing else.

use std::collections::HashMap;

use serde_json::Value;

use super::errors::{ApiError, ApiResult};

/// Where a resolved value came from. Precedence follows declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    QueryString,
    Body,
    Path,
}

/// A parameter value together with its origin.
#[derive(Debug, Clone)]
pub struct ResolvedParam {
    pub name: String,
    pub value: Value,
    pub source: ParamSource,
}

/// The three per-request parameter sources, captured once per request.
#[derive(Debug, Default)]
pub struct RequestParams {
    query: HashMap<String, String>,
    body: Option<Value>,
    path: HashMap<String, String>,
}

impl RequestParams {
    pub fn new(
        query: HashMap<String, String>,
        body: Option<Value>,
        path: HashMap<String, String>,
    ) -> Self {
        Self { query, body, path }
    }

    /// First defined value in precedence order.
    pub fn resolve(&self, name: &str) -> ApiResult<ResolvedParam> {
        if let Some(raw) = self.query.get(name) {
            return Ok(ResolvedParam {
                name: name.to_string(),
                value: Value::String(raw.clone()),
                source: ParamSource::QueryString,
            });
        }
        if let Some(value) = self.body.as_ref().and_then(|body| body.get(name)) {
            if !value.is_null() {
                return Ok(ResolvedParam {
                    name: name.to_string(),
                    value: value.clone(),
                    source: ParamSource::Body,
                });
            }
        }
        if let Some(raw) = self.path.get(name) {
            return Ok(ResolvedParam {
                name: name.to_string(),
                value: Value::String(raw.clone()),
                source: ParamSource::Path,
            });
        }
        Err(ApiError::MissingParam(name.to_string()))
    }

    /// A required string parameter.
    pub fn string(&self, name: &str) -> ApiResult<String> {
        let resolved = self.resolve(name)?;
        match resolved.value {
            Value::String(text) => Ok(text),
            // scalar body values stringify; structured values do not
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(ApiError::InvalidParam(name.to_string())),
        }
    }

    /// A required base-10 integer parameter.
    pub fn integer(&self, name: &str) -> ApiResult<i64> {
        let resolved = self.resolve(name)?;
        let parsed = match &resolved.value {
            Value::String(text) => text.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        parsed.ok_or_else(|| ApiError::InvalidParam(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_string_wins_over_body_and_path() {
        let params = RequestParams::new(
            query(&[("centroid_id", "1")]),
            Some(json!({"centroid_id": 2})),
            query(&[("centroid_id", "3")]),
        );

        let resolved = params.resolve("centroid_id").unwrap();
        assert_eq!(resolved.source, ParamSource::QueryString);
        assert_eq!(params.integer("centroid_id").unwrap(), 1);
    }

    #[test]
    fn test_body_wins_over_path() {
        let params = RequestParams::new(
            HashMap::new(),
            Some(json!({"centroid_id": 2})),
            query(&[("centroid_id", "3")]),
        );

        let resolved = params.resolve("centroid_id").unwrap();
        assert_eq!(resolved.source, ParamSource::Body);
        assert_eq!(params.integer("centroid_id").unwrap(), 2);
    }

    #[test]
    fn test_path_is_the_last_resort() {
        let params = RequestParams::new(HashMap::new(), None, query(&[("centroid_id", "3")]));

        let resolved = params.resolve("centroid_id").unwrap();
        assert_eq!(resolved.source, ParamSource::Path);
        assert_eq!(params.integer("centroid_id").unwrap(), 3);
    }

    #[test]
    fn test_null_body_value_counts_as_undefined() {
        let params = RequestParams::new(
            HashMap::new(),
            Some(json!({"query": null})),
            query(&[("query", "fallback")]),
        );

        let resolved = params.resolve("query").unwrap();
        assert_eq!(resolved.source, ParamSource::Path);
    }

    #[test]
    fn test_missing_everywhere_names_the_parameter() {
        let params = RequestParams::new(HashMap::new(), None, HashMap::new());

        let err = params.string("query").unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameter: query");
    }

    #[test]
    fn test_non_numeric_integer_is_invalid() {
        let params = RequestParams::new(query(&[("centroid_id", "abc")]), None, HashMap::new());

        let err = params.integer("centroid_id").unwrap_err();
        assert_eq!(err.to_string(), "invalid centroid_id");
    }

    #[test]
    fn test_fractional_body_number_is_invalid() {
        let params = RequestParams::new(
            HashMap::new(),
            Some(json!({"year_begin": 2022.5})),
            HashMap::new(),
        );

        assert!(params.integer("year_begin").is_err());
    }

    #[test]
    fn test_negative_integers_parse() {
        let params = RequestParams::new(query(&[("centroid_id", "-4")]), None, HashMap::new());
        assert_eq!(params.integer("centroid_id").unwrap(), -4);
    }

    #[test]
    fn test_string_accepts_scalars_only() {
        let params = RequestParams::new(
            HashMap::new(),
            Some(json!({"query": ["not", "a", "scalar"]})),
            HashMap::new(),
        );

        assert!(params.string("query").is_err());
    }

    #[test]
    fn test_numeric_body_value_stringifies() {
        let params = RequestParams::new(HashMap::new(), Some(json!({"query": 42})), HashMap::new());
        assert_eq!(params.string("query").unwrap(), "42");
    }
}
