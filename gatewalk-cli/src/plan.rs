//! Plan command implementation for the Gatewalk CLI.

use std::io::{BufReader, Write};
use std::str::FromStr;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gatewalk_core::{
    ItineraryPlan, ItineraryPlanner, MultiStrategyPlanner, PlanRequest, PoiGates, SequenceSolver,
    Strategy, StrategyChoice,
};
use gatewalk_fs::open_utf8_file;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_PLAN_DAYS, ARG_PLAN_OUTPUT, ARG_PLAN_REQUEST, ARG_PLAN_STRATEGY, ARG_PLAN_TIME_LIMIT,
    CliError, ENV_PLAN_REQUEST,
};

/// Search budget handed to the heuristic backend when none is configured.
const DEFAULT_TIME_LIMIT_SECS: u64 = 5;

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Plan an itinerary from a JSON-encoded PlanRequest. The \
                 stops are ordered with the requested strategy, split across \
                 days, and given entry and exit gates. Options can come from \
                 CLI flags, configuration files, or environment variables.",
    about = "Plan a gate-aware itinerary"
)]
#[ortho_config(prefix = "GATEWALK")]
pub(crate) struct PlanArgs {
    /// Path to a JSON file containing a PlanRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Write the plan here instead of stdout.
    #[arg(long = ARG_PLAN_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Override the request strategy (shortest, fastest, balanced or all).
    #[arg(long = ARG_PLAN_STRATEGY, value_name = "name")]
    #[serde(default)]
    pub(crate) strategy: Option<String>,
    /// Override the number of days in the request.
    #[arg(long = ARG_PLAN_DAYS, value_name = "count")]
    #[serde(default)]
    pub(crate) days: Option<usize>,
    /// Wall-clock budget for the heuristic backend, in seconds.
    #[arg(long = ARG_PLAN_TIME_LIMIT, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlanConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Output file; stdout when absent.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Strategy replacing the one in the request.
    pub(crate) strategy: Option<StrategyChoice>,
    /// Day count replacing the one in the request.
    pub(crate) days: Option<usize>,
    /// Heuristic search budget.
    pub(crate) time_limit: Duration,
}

impl PlanConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let path = &self.request_path;
        match gatewalk_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field: ARG_PLAN_REQUEST,
                path: path.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field: ARG_PLAN_REQUEST,
                    path: path.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field: ARG_PLAN_REQUEST,
                path: path.clone(),
                source,
            }),
        }
    }

    /// Apply the strategy and day overrides to a loaded request.
    pub(crate) fn apply_overrides(&self, mut request: PlanRequest) -> PlanRequest {
        if let Some(strategy) = self.strategy {
            request.strategy = strategy;
        }
        if let Some(days) = self.days {
            request.days = days;
        }
        request
    }
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_PLAN_REQUEST,
            env: ENV_PLAN_REQUEST,
        })?;
        let strategy = args
            .strategy
            .as_deref()
            .map(parse_strategy_choice)
            .transpose()?;
        let time_limit =
            Duration::from_secs(args.time_limit_secs.unwrap_or(DEFAULT_TIME_LIMIT_SECS));

        Ok(Self {
            request_path,
            output: args.output,
            strategy,
            days: args.days,
            time_limit,
        })
    }
}

/// Parse a strategy name, accepting `all` alongside the three strategies.
pub(crate) fn parse_strategy_choice(raw: &str) -> Result<StrategyChoice, CliError> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(StrategyChoice::All);
    }
    Strategy::from_str(raw)
        .map(StrategyChoice::from)
        .map_err(CliError::InvalidStrategy)
}

/// Builds the sequence solver for the current plan invocation.
pub(super) trait SequenceSolverFactory {
    fn build(&self, config: &PlanConfig) -> SequenceSolver;
}

pub(super) struct DefaultSequenceSolverFactory;

impl SequenceSolverFactory for DefaultSequenceSolverFactory {
    #[cfg(feature = "solver-vrp")]
    fn build(&self, config: &PlanConfig) -> SequenceSolver {
        use gatewalk_solver_vrp::{VrpBackend, VrpBackendConfig};

        let backend = VrpBackend::with_config(VrpBackendConfig {
            time_limit: config.time_limit,
            ..VrpBackendConfig::default()
        });
        SequenceSolver::with_heuristic(backend)
    }

    #[cfg(not(feature = "solver-vrp"))]
    fn build(&self, config: &PlanConfig) -> SequenceSolver {
        log::debug!(
            "heuristic backend not compiled in; ignoring {:?} time limit",
            config.time_limit
        );
        SequenceSolver::greedy_only()
    }
}

pub(super) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultSequenceSolverFactory, &mut stdout)
}

pub(super) fn run_plan_with(
    args: PlanArgs,
    factory: &dyn SequenceSolverFactory,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_plan_config(args)?;
    let plan = execute_plan(&config, factory)?;
    match &config.output {
        Some(path) => write_plan_file(path, &plan),
        None => write_plan(writer, &plan),
    }
}

fn resolve_plan_config(args: PlanArgs) -> Result<PlanConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn execute_plan(
    config: &PlanConfig,
    factory: &dyn SequenceSolverFactory,
) -> Result<ItineraryPlan, CliError> {
    let request = config.apply_overrides(load_plan_request(&config.request_path)?);
    let planner = ItineraryPlanner::new(MultiStrategyPlanner::new(factory.build(config)));
    let plan = planner.plan(&request, &PoiGates)?;
    log::info!(
        "planned {} stops over {} days with the {} strategy",
        request.pois.len(),
        plan.days.len(),
        plan.selected_strategy
    );
    Ok(plan)
}

/// Loads a JSON-encoded [`PlanRequest`] from disk.
pub(super) fn load_plan_request(path: &Utf8Path) -> Result<PlanRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPlanRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParsePlanRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn render_plan(plan: &ItineraryPlan) -> Result<String, CliError> {
    let mut payload = serde_json::to_string_pretty(plan).map_err(CliError::SerialisePlan)?;
    payload.push('\n');
    Ok(payload)
}

fn write_plan(writer: &mut dyn Write, plan: &ItineraryPlan) -> Result<(), CliError> {
    let payload = render_plan(plan)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WritePlanOutput)
}

fn write_plan_file(path: &Utf8Path, plan: &ItineraryPlan) -> Result<(), CliError> {
    let payload = render_plan(plan)?;
    gatewalk_fs::write_utf8_file(path, payload.as_bytes()).map_err(|source| {
        CliError::WritePlanFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    log::info!("wrote itinerary to {path}");
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
