//! # Gateway HTTP Module
//!
//! Routing, parameter validation, and response shaping for the five
//! analytic endpoints. Control flow per request:
//! router -> parameter validator -> query builder -> warehouse client ->
//! response formatter.

pub mod config;
pub mod errors;
pub mod params;
pub mod response;
pub mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use params::{ParamSource, RequestParams, ResolvedParam};
pub use routes::{AppState, SharedState};
pub use server::{build_router, HttpServer};
