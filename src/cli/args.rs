//! CLI argument definitions using clap
//!
//! Commands:
//! - trendgate serve --project <id> --dataset <name>
//! - trendgate check --project <id> --dataset <name>

use clap::{Args, Parser, Subcommand};

use crate::queries::DatasetTables;
use crate::warehouse::{BigQueryConfig, DEFAULT_API_BASE_URL};

/// trendgate - read-only analytical query gateway over clustered community questions
#[derive(Parser, Debug)]
#[command(name = "trendgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway HTTP server
    Serve {
        #[command(flatten)]
        warehouse: WarehouseArgs,

        /// Host to bind to
        #[arg(long, env = "TRENDGATE_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, env = "TRENDGATE_PORT", default_value_t = 8080)]
        port: u16,

        /// Known cluster ids (comma separated); skips the boot-time fetch
        #[arg(long, value_delimiter = ',')]
        cluster_ids: Option<Vec<i64>>,
    },

    /// Execute the year-range query once and print the JSON result
    Check {
        #[command(flatten)]
        warehouse: WarehouseArgs,
    },
}

/// Warehouse connection and dataset identifiers.
#[derive(Args, Debug, Clone)]
pub struct WarehouseArgs {
    /// Google Cloud project owning the dataset
    #[arg(long, env = "TRENDGATE_PROJECT")]
    pub project: String,

    /// Dataset holding the analytics tables
    #[arg(long, env = "TRENDGATE_DATASET")]
    pub dataset: String,

    /// Dataset location, e.g. EU or us-central1
    #[arg(long, env = "TRENDGATE_LOCATION", default_value = "EU")]
    pub location: String,

    /// OAuth bearer token for the BigQuery REST API
    #[arg(long, env = "BIGQUERY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Override the API base URL (tests, emulators)
    #[arg(long, env = "TRENDGATE_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Table of embedded questions
    #[arg(long, default_value = "question_embeddings")]
    pub questions_table: String,

    /// Table of cluster label candidates
    #[arg(long, default_value = "cluster_labels")]
    pub labels_table: String,

    /// Table of monthly cluster shares
    #[arg(long, default_value = "monthly_cluster_shares")]
    pub monthly_table: String,

    /// Embedding model used for query-time vectorization
    #[arg(long, default_value = "question_embedding_model")]
    pub embedding_model: String,
}

impl WarehouseArgs {
    /// Connection settings for the warehouse client
    pub fn config(&self) -> BigQueryConfig {
        BigQueryConfig {
            project_id: self.project.clone(),
            location: self.location.clone(),
            access_token: self.access_token.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }

    /// Fully-qualified dataset identifiers for the query builders
    pub fn tables(&self) -> DatasetTables {
        DatasetTables::qualified(
            &self.project,
            &self.dataset,
            &self.questions_table,
            &self.labels_table,
            &self.monthly_table,
            &self.embedding_model,
        )
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
