//! # Warehouse Client Module
//!
//! The narrow execution seam between the gateway and the analytic
//! warehouse: parameterized query values, the `Warehouse` trait, and the
//! BigQuery REST implementation. Everything above this module constructs
//! queries; only this module executes them.

pub mod client;
pub mod errors;
pub mod query;

pub use client::{
    BigQueryClient, BigQueryConfig, Row, StaticWarehouse, Warehouse, DEFAULT_API_BASE_URL,
};
pub use errors::{WarehouseError, WarehouseResult};
pub use query::{ParamValue, Query, QueryParameter};
