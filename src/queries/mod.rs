//! # Query Builders
//!
//! Pure functions mapping validated, typed parameters to parameterized
//! warehouse queries. Builders never execute anything; request-controlled
//! values travel only through named bindings, and the only text
//! interpolated into SQL is the server-configured dataset identifiers.

mod builders;
mod tables;

pub use builders::{
    cluster_ids, cluster_listing, monthly_time_series, questions_by_cluster, semantic_search,
    year_range, LISTING_ROW_CAP, MONTHLY_ROW_CAP, SEARCH_DISTANCE, SEARCH_TOP_K,
};
pub use tables::DatasetTables;
