//! Endpoint handlers
//!
//! One handler per endpoint; each is stateless and shares only the
//! boot-time `AppState`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, RawPathParams, State};
use axum::Json;
use serde_json::Value;
use uuid::Uuid;

use crate::observability::Logger;
use crate::queries::{self, DatasetTables};
use crate::warehouse::{Query as WarehouseQuery, Row, Warehouse};

use super::errors::{ApiError, ApiResult};
use super::params::RequestParams;
use super::response::{pivot_monthly, RowsBody};

/// State shared by all handlers.
///
/// Constructed once at boot and injected; holds the long-lived warehouse
/// client, the dataset identifiers, and the cluster ids that parameterize
/// the monthly pivot. Nothing here mutates per request, so no locking.
pub struct AppState {
    pub warehouse: Arc<dyn Warehouse>,
    pub tables: DatasetTables,
    pub known_clusters: Vec<i64>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Execute a query; failures keep their detail in the server log and
    /// reach the caller as the generic warehouse error.
    async fn run(&self, endpoint: &'static str, query: &WarehouseQuery) -> ApiResult<Vec<Row>> {
        let request_id = Uuid::new_v4().to_string();
        match self.warehouse.execute(query).await {
            Ok(rows) => {
                Logger::info(
                    "query_complete",
                    &[
                        ("endpoint", endpoint),
                        ("request_id", &request_id),
                        ("rows", &rows.len().to_string()),
                    ],
                );
                Ok(rows)
            }
            Err(err) => {
                Logger::error(
                    "warehouse_query_failed",
                    &[
                        ("endpoint", endpoint),
                        ("request_id", &request_id),
                        ("detail", &err.to_string()),
                    ],
                );
                Err(ApiError::Warehouse(err))
            }
        }
    }
}

fn request_params(
    query: HashMap<String, String>,
    path: RawPathParams,
    body: Option<Json<Value>>,
) -> RequestParams {
    let path: HashMap<String, String> = path
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    RequestParams::new(query, body.map(|Json(value)| value), path)
}

/// `/search` — nearest-neighbor semantic search over question embeddings.
pub async fn search(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    path: RawPathParams,
    body: Option<Json<Value>>,
) -> ApiResult<RowsBody> {
    let params = request_params(query, path, body);
    let text = params.string("query")?;

    let rows = state
        .run("search", &queries::semantic_search(&state.tables, &text))
        .await?;
    Ok(RowsBody(rows))
}

/// `/cluster` — canonical labels with per-cluster question counts.
pub async fn cluster(State(state): State<SharedState>) -> ApiResult<RowsBody> {
    let rows = state
        .run("cluster", &queries::cluster_listing(&state.tables))
        .await?;
    Ok(RowsBody(rows))
}

/// `/questionsByCluster` — one cluster's questions with the canonical label.
pub async fn questions_by_cluster(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    path: RawPathParams,
    body: Option<Json<Value>>,
) -> ApiResult<RowsBody> {
    let params = request_params(query, path, body);
    let centroid_id = params.integer("centroid_id")?;

    let rows = state
        .run(
            "questionsByCluster",
            &queries::questions_by_cluster(&state.tables, centroid_id),
        )
        .await?;
    Ok(RowsBody(rows))
}

/// `/monthlyTimeSeries` — wide per-cluster share rows for a year range.
pub async fn monthly_time_series(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    path: RawPathParams,
    body: Option<Json<Value>>,
) -> ApiResult<RowsBody> {
    let params = request_params(query, path, body);
    // both bounds validated before any query is built
    let year_begin = params.integer("year_begin")?;
    let year_end = params.integer("year_end")?;

    let narrow = state
        .run(
            "monthlyTimeSeries",
            &queries::monthly_time_series(
                &state.tables,
                year_begin,
                year_end,
                state.known_clusters.len(),
            ),
        )
        .await?;

    let wide = pivot_monthly(narrow, &state.known_clusters).map_err(|err| {
        Logger::error(
            "monthly_pivot_failed",
            &[("detail", &err.to_string())],
        );
        ApiError::Warehouse(err)
    })?;
    Ok(RowsBody(wide))
}

/// `/yearRange` — the singleton `{max_year, min_year}` aggregate.
pub async fn year_range(State(state): State<SharedState>) -> ApiResult<RowsBody> {
    let rows = state
        .run("yearRange", &queries::year_range(&state.tables))
        .await?;
    Ok(RowsBody(rows))
}

/// Fallback for every unregistered path, whatever the method.
pub async fn unknown_route() -> ApiError {
    ApiError::UnknownRoute
}
