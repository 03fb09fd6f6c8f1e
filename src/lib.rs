//! trendgate - a read-only analytical query gateway over clustered
//! community questions
//!
//! Five HTTP endpoints over a precomputed text-analytics dataset held in
//! BigQuery: semantic search, cluster listing, per-cluster drill-down,
//! monthly cluster shares, and the covered year range.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod queries;
pub mod warehouse;
