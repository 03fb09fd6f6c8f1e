//! Warehouse execution client
//!
//! The gateway depends on the warehouse through the narrow `Warehouse`
//! trait; `BigQueryClient` is the production implementation over the
//! BigQuery `projects/{project}/queries` REST endpoint. The client holds
//! the long-lived HTTP connection pool and credential, is constructed once
//! at boot, and is shared read-only across all in-flight requests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{WarehouseError, WarehouseResult};
use super::query::Query;

/// Public BigQuery REST endpoint; overridable for tests and emulators.
pub const DEFAULT_API_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Server-side completion deadline sent with every query, in milliseconds.
/// Gateway queries are small; a job still running after this is an error,
/// never polled.
const QUERY_TIMEOUT_MS: u64 = 30_000;

/// A decoded result row: column name to typed JSON value.
pub type Row = Map<String, Value>;

/// Narrow execution interface over the analytic warehouse.
///
/// At-least-once, non-transactional, read-only. Implementations return the
/// complete row sequence per call; no retry, no streaming cursor.
#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn execute(&self, query: &Query) -> WarehouseResult<Vec<Row>>;
}

/// Connection settings for the production client.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// Google Cloud project that owns the dataset
    pub project_id: String,
    /// Dataset location passed with every job, e.g. "EU" or "us-central1"
    pub location: String,
    /// OAuth bearer token for the REST API
    pub access_token: String,
    /// API base URL; `DEFAULT_API_BASE_URL` outside tests
    pub api_base_url: String,
}

/// BigQuery REST client.
pub struct BigQueryClient {
    http: reqwest::Client,
    endpoint: String,
    location: String,
}

impl BigQueryClient {
    pub fn new(config: BigQueryConfig) -> WarehouseResult<Self> {
        if config.access_token.trim().is_empty() {
            return Err(WarehouseError::Config("missing access token".to_string()));
        }

        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", config.access_token.trim());
        let auth = HeaderValue::from_str(&auth)
            .map_err(|_| WarehouseError::Config("access token is not a valid header value".to_string()))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(WarehouseError::Transport)?;

        let endpoint = format!(
            "{}/projects/{}/queries",
            config.api_base_url.trim_end_matches('/'),
            config.project_id
        );

        Ok(Self {
            http,
            endpoint,
            location: config.location,
        })
    }
}

#[async_trait]
impl Warehouse for BigQueryClient {
    async fn execute(&self, query: &Query) -> WarehouseResult<Vec<Row>> {
        let body = QueryRequestBody {
            query: &query.sql,
            use_legacy_sql: false,
            parameter_mode: "NAMED",
            query_parameters: query
                .params
                .iter()
                .map(|p| WireParameter {
                    name: p.name,
                    parameter_type: WireParameterType {
                        kind: p.value.sql_type(),
                    },
                    parameter_value: WireParameterValue {
                        value: p.value.wire_value(),
                    },
                })
                .collect(),
            location: &self.location,
            timeout_ms: QUERY_TIMEOUT_MS,
        };

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(WarehouseError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let parsed: QueryResponseBody = response
            .json()
            .await
            .map_err(|e| WarehouseError::Decode(e.to_string()))?;
        if !parsed.job_complete {
            return Err(WarehouseError::Incomplete);
        }
        decode_rows(parsed)
    }
}

// ==================
// Wire shapes
// ==================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequestBody<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    parameter_mode: &'a str,
    query_parameters: Vec<WireParameter<'a>>,
    location: &'a str,
    timeout_ms: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireParameter<'a> {
    name: &'a str,
    parameter_type: WireParameterType,
    parameter_value: WireParameterValue,
}

#[derive(Debug, Serialize)]
struct WireParameterType {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct WireParameterValue {
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponseBody {
    #[serde(default)]
    job_complete: bool,
    #[serde(default)]
    schema: Option<WireSchema>,
    #[serde(default)]
    rows: Vec<WireRow>,
}

#[derive(Debug, Deserialize)]
struct WireSchema {
    #[serde(default)]
    fields: Vec<WireField>,
}

#[derive(Debug, Deserialize)]
struct WireField {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(default)]
    f: Vec<WireCell>,
}

#[derive(Debug, Deserialize)]
struct WireCell {
    #[serde(default)]
    v: Value,
}

/// Decode the positional `rows[].f[].v` wire shape into named, typed rows.
fn decode_rows(body: QueryResponseBody) -> WarehouseResult<Vec<Row>> {
    let fields = body.schema.map(|s| s.fields).unwrap_or_default();
    if fields.is_empty() && !body.rows.is_empty() {
        return Err(WarehouseError::Decode(
            "row data arrived without a schema".to_string(),
        ));
    }

    let mut out = Vec::with_capacity(body.rows.len());
    for row in body.rows {
        if row.f.len() != fields.len() {
            return Err(WarehouseError::Decode(format!(
                "row has {} cells but schema has {} fields",
                row.f.len(),
                fields.len()
            )));
        }
        let mut decoded = Row::new();
        for (field, cell) in fields.iter().zip(row.f) {
            decoded.insert(field.name.clone(), decode_cell(&field.kind, cell.v)?);
        }
        out.push(decoded);
    }
    Ok(out)
}

/// All scalar values arrive as JSON strings; NULL arrives as JSON null.
fn decode_cell(kind: &str, raw: Value) -> WarehouseResult<Value> {
    let Value::String(text) = raw else {
        return Ok(raw);
    };

    let value = match kind {
        "INTEGER" | "INT64" => text
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| WarehouseError::Decode(format!("non-integer INT64 cell: {text}")))?,
        "FLOAT" | "FLOAT64" => text
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| WarehouseError::Decode(format!("non-numeric FLOAT64 cell: {text}")))?,
        "BOOLEAN" | "BOOL" => match text.as_str() {
            "true" => Value::from(true),
            "false" => Value::from(false),
            _ => {
                return Err(WarehouseError::Decode(format!(
                    "non-boolean BOOL cell: {text}"
                )))
            }
        },
        // STRING, TIMESTAMP, NUMERIC and anything newer pass through as text
        _ => Value::String(text),
    };
    Ok(value)
}

// ==================
// In-memory warehouse
// ==================

/// Fixed-response warehouse for tests: answers every query with canned rows
/// (or a canned failure) and records every executed query.
pub struct StaticWarehouse {
    rows: Vec<Row>,
    failure: Option<(u16, String)>,
    executed: Mutex<Vec<Query>>,
}

impl StaticWarehouse {
    /// A warehouse that answers every query with the same rows
    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            failure: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// A warehouse whose every query fails with an API error carrying
    /// `detail`
    pub fn failing(status: u16, detail: impl Into<String>) -> Self {
        Self {
            rows: Vec::new(),
            failure: Some((status, detail.into())),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Queries executed so far, in order
    pub fn executed(&self) -> Vec<Query> {
        self.executed.lock().expect("executed lock").clone()
    }
}

#[async_trait]
impl Warehouse for StaticWarehouse {
    async fn execute(&self, query: &Query) -> WarehouseResult<Vec<Row>> {
        self.executed
            .lock()
            .expect("executed lock")
            .push(query.clone());

        if let Some((status, detail)) = &self.failure {
            return Err(WarehouseError::Api {
                status: *status,
                detail: detail.clone(),
            });
        }
        Ok(self.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::query::ParamValue;
    use serde_json::json;

    fn wire_response(value: Value) -> QueryResponseBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_request_body_wire_shape() {
        let query = Query::new("SELECT @query").bind_string("query", "reset");
        let body = QueryRequestBody {
            query: &query.sql,
            use_legacy_sql: false,
            parameter_mode: "NAMED",
            query_parameters: query
                .params
                .iter()
                .map(|p| WireParameter {
                    name: p.name,
                    parameter_type: WireParameterType {
                        kind: p.value.sql_type(),
                    },
                    parameter_value: WireParameterValue {
                        value: p.value.wire_value(),
                    },
                })
                .collect(),
            location: "EU",
            timeout_ms: QUERY_TIMEOUT_MS,
        };

        let encoded = serde_json::to_value(&body).unwrap();
        assert_eq!(encoded["useLegacySql"], false);
        assert_eq!(encoded["parameterMode"], "NAMED");
        assert_eq!(encoded["queryParameters"][0]["name"], "query");
        assert_eq!(
            encoded["queryParameters"][0]["parameterType"]["type"],
            "STRING"
        );
        assert_eq!(
            encoded["queryParameters"][0]["parameterValue"]["value"],
            "reset"
        );
        assert_eq!(encoded["location"], "EU");
    }

    #[test]
    fn test_decode_typed_cells() {
        let body = wire_response(json!({
            "jobComplete": true,
            "schema": {"fields": [
                {"name": "year", "type": "INTEGER"},
                {"name": "share", "type": "FLOAT"},
                {"name": "label", "type": "STRING"},
                {"name": "flag", "type": "BOOLEAN"},
            ]},
            "rows": [
                {"f": [{"v": "2022"}, {"v": "0.25"}, {"v": "Authentication"}, {"v": "true"}]},
            ],
        }));

        let rows = decode_rows(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["year"], json!(2022));
        assert_eq!(rows[0]["share"], json!(0.25));
        assert_eq!(rows[0]["label"], json!("Authentication"));
        assert_eq!(rows[0]["flag"], json!(true));
    }

    #[test]
    fn test_decode_null_cell_passes_through() {
        let body = wire_response(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "label", "type": "STRING"}]},
            "rows": [{"f": [{"v": null}]}],
        }));

        let rows = decode_rows(body).unwrap();
        assert_eq!(rows[0]["label"], Value::Null);
    }

    #[test]
    fn test_decode_rejects_cell_count_mismatch() {
        let body = wire_response(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "a", "type": "STRING"}]},
            "rows": [{"f": [{"v": "1"}, {"v": "2"}]}],
        }));

        assert!(matches!(
            decode_rows(body),
            Err(WarehouseError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_integer() {
        let body = wire_response(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "year", "type": "INT64"}]},
            "rows": [{"f": [{"v": "twenty"}]}],
        }));

        assert!(matches!(decode_rows(body), Err(WarehouseError::Decode(_))));
    }

    #[test]
    fn test_empty_result_decodes_to_no_rows() {
        let body = wire_response(json!({
            "jobComplete": true,
            "schema": {"fields": [{"name": "a", "type": "STRING"}]},
        }));

        assert!(decode_rows(body).unwrap().is_empty());
    }

    #[test]
    fn test_client_rejects_empty_token() {
        let result = BigQueryClient::new(BigQueryConfig {
            project_id: "p".into(),
            location: "EU".into(),
            access_token: "  ".into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
        });
        assert!(matches!(result, Err(WarehouseError::Config(_))));
    }

    #[tokio::test]
    async fn test_static_warehouse_records_queries() {
        let warehouse = StaticWarehouse::returning(Vec::new());
        let query = Query::new("SELECT 1").bind_int("centroid_id", 4);
        warehouse.execute(&query).await.unwrap();

        let executed = warehouse.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].param("centroid_id"), Some(&ParamValue::Int64(4)));
    }
}
