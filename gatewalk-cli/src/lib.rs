//! Command-line interface for planning Gatewalk itineraries.
//!
//! The `plan` subcommand reads a JSON [`PlanRequest`](gatewalk_core::PlanRequest),
//! runs the itinerary planner, and writes the JSON plan to stdout or a file.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

use plan::{PlanArgs, run_plan};

pub(crate) const ARG_PLAN_REQUEST: &str = "request";
pub(crate) const ARG_PLAN_OUTPUT: &str = "output";
pub(crate) const ARG_PLAN_STRATEGY: &str = "strategy";
pub(crate) const ARG_PLAN_DAYS: &str = "days";
pub(crate) const ARG_PLAN_TIME_LIMIT: &str = "time-limit-secs";
pub(crate) const ENV_PLAN_REQUEST: &str = "GATEWALK_CMDS_PLAN_REQUEST_PATH";

/// Run the Gatewalk CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration, the request file, or
/// planning fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "gatewalk",
    about = "Plan gate-aware sightseeing itineraries",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order the stops of a plan request and choose their gates.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
