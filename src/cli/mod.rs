//! CLI module for trendgate
//!
//! Commands:
//! - serve: boot the gateway and enter the serving loop
//! - check: execute the year-range query once and print the result

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, WarehouseArgs};
pub use errors::{CliError, CliResult};

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Serve {
            warehouse,
            host,
            port,
            cluster_ids,
        } => commands::serve(warehouse, host, port, cluster_ids),
        Command::Check { warehouse } => commands::check(warehouse),
    }
}
