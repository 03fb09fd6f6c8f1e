//! CLI command implementations
//!
//! The boot sequence owns every long-lived resource: the tokio runtime,
//! the warehouse client, and the resolved cluster-id set all come into
//! existence here and are handed to the server, never reconstructed per
//! request.

use std::sync::Arc;

use crate::http_server::{AppState, HttpServer, HttpServerConfig};
use crate::observability::Logger;
use crate::queries::{self, DatasetTables};
use crate::warehouse::{BigQueryClient, Warehouse, WarehouseResult};

use super::args::WarehouseArgs;
use super::errors::{CliError, CliResult};

/// Boot the gateway and serve until shutdown.
pub fn serve(
    args: WarehouseArgs,
    host: String,
    port: u16,
    cluster_ids: Option<Vec<i64>>,
) -> CliResult<()> {
    let tables = args.tables();
    let client =
        BigQueryClient::new(args.config()).map_err(|e| CliError::config_error(e.to_string()))?;
    let warehouse: Arc<dyn Warehouse> = Arc::new(client);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let known_clusters = match cluster_ids {
            Some(ids) => ids,
            None => fetch_known_clusters(warehouse.as_ref(), &tables)
                .await
                .map_err(|e| {
                    CliError::boot_failed(format!("cluster id fetch failed: {}", e))
                })?,
        };
        Logger::info(
            "known_clusters_resolved",
            &[("count", &known_clusters.len().to_string())],
        );

        let state = Arc::new(AppState {
            warehouse: Arc::clone(&warehouse),
            tables,
            known_clusters,
        });

        let config = HttpServerConfig { host, port };
        HttpServer::new(config, state)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// One-shot connectivity probe: run the year-range query and print it.
pub fn check(args: WarehouseArgs) -> CliResult<()> {
    let tables = args.tables();
    let client =
        BigQueryClient::new(args.config()).map_err(|e| CliError::config_error(e.to_string()))?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let rows = client
            .execute(&queries::year_range(&tables))
            .await
            .map_err(|e| CliError::query_failed(e.to_string()))?;
        let body = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::query_failed(e.to_string()))?;
        println!("{}", body);
        Ok(())
    })
}

/// Resolve the canonical cluster ids that parameterize the monthly pivot.
async fn fetch_known_clusters(
    warehouse: &dyn Warehouse,
    tables: &DatasetTables,
) -> WarehouseResult<Vec<i64>> {
    let rows = warehouse.execute(&queries::cluster_ids(tables)).await?;
    rows.iter()
        .map(|row| {
            row.get("CENTROID_ID").and_then(|v| v.as_i64()).ok_or_else(|| {
                crate::warehouse::WarehouseError::Decode(
                    "cluster id row missing integer `CENTROID_ID`".to_string(),
                )
            })
        })
        .collect()
}
