//! Focused unit tests covering plan CLI configuration and request handling.

use std::time::Duration;

use camino::Utf8PathBuf;
use gatewalk_core::{ItineraryPlan, MAX_DAYS, PlanError, Strategy, StrategyChoice};
use rstest::rstest;

use super::helpers::{GreedyFactory, Workspace, sample_request, write_request, write_utf8};
use super::*;
use crate::plan::{
    PlanArgs, PlanConfig, config_from_layers_for_test, load_plan_request, parse_strategy_choice,
    run_plan_with,
};

fn args_for(request_path: Utf8PathBuf) -> PlanArgs {
    PlanArgs {
        request_path: Some(request_path),
        ..PlanArgs::default()
    }
}

#[rstest]
fn converting_plan_without_request_errors() {
    let err = PlanConfig::try_from(PlanArgs::default()).expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_PLAN_REQUEST);
            assert_eq!(env, ENV_PLAN_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn plan_config_defaults_time_limit() {
    let config = PlanConfig::try_from(args_for(Utf8PathBuf::from("request.json")))
        .expect("config should build");
    assert_eq!(config.time_limit, Duration::from_secs(5));
    assert_eq!(config.strategy, None);
    assert_eq!(config.output, None);
}

#[rstest]
#[case("shortest", StrategyChoice::Shortest)]
#[case(" Fastest ", StrategyChoice::Fastest)]
#[case("BALANCED", StrategyChoice::Balanced)]
#[case("all", StrategyChoice::All)]
fn strategy_names_parse(#[case] raw: &str, #[case] expected: StrategyChoice) {
    assert_eq!(parse_strategy_choice(raw).expect("known strategy"), expected);
}

#[rstest]
fn unknown_strategy_is_rejected() {
    let args = PlanArgs {
        strategy: Some("scenic".to_owned()),
        ..args_for(Utf8PathBuf::from("request.json"))
    };
    let err = PlanConfig::try_from(args).expect_err("unknown strategy should error");
    assert!(matches!(err, CliError::InvalidStrategy(_)), "found {err:?}");
}

#[rstest]
fn validate_sources_reports_missing_request() {
    let workspace = Workspace::new();
    let config = PlanConfig::try_from(args_for(workspace.path("absent.json")))
        .expect("config should build");
    let err = config.validate_sources().expect_err("missing file");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_PLAN_REQUEST),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_reports_not_file() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    std::fs::create_dir(&request_path).expect("request directory");

    let config = PlanConfig::try_from(args_for(request_path.clone())).expect("config");
    match config.validate_sources().expect_err("directory should fail") {
        CliError::SourcePathNotFile { field, path } => {
            assert_eq!(field, ARG_PLAN_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_plan_request_decodes_json() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    let request = sample_request().with_days(2).with_weather("light rain");
    write_request(&request_path, &request);

    let loaded = load_plan_request(&request_path).expect("request should decode");
    assert_eq!(loaded, request);
}

#[rstest]
fn load_plan_request_applies_defaults() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    write_utf8(
        &request_path,
        br#"{"start":{"x":116.3,"y":39.9},"pois":[]}"#,
    );

    let loaded = load_plan_request(&request_path).expect("request should decode");
    assert_eq!(loaded.days, 1);
    assert_eq!(loaded.strategy, StrategyChoice::Balanced);
    assert_eq!(loaded.weather, None);
}

#[rstest]
fn overrides_replace_request_fields() {
    let config = PlanConfig {
        request_path: Utf8PathBuf::from("request.json"),
        output: None,
        strategy: Some(StrategyChoice::All),
        days: Some(3),
        time_limit: Duration::from_secs(1),
    };
    let request = config.apply_overrides(sample_request());
    assert_eq!(request.strategy, StrategyChoice::All);
    assert_eq!(request.days, 3);
}

#[rstest]
fn zero_days_surfaces_plan_error() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    write_request(&request_path, &sample_request().with_days(0));

    let mut buffer = Vec::new();
    let err = run_plan_with(args_for(request_path), &GreedyFactory, &mut buffer)
        .expect_err("zero days should fail");
    match err {
        CliError::Plan(source) => assert_eq!(source, PlanError::ZeroDays),
        other => panic!("expected Plan, found {other:?}"),
    }
    assert!(buffer.is_empty());
}

#[rstest]
fn huge_day_override_surfaces_plan_error() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    write_request(&request_path, &sample_request());

    let args = PlanArgs {
        days: Some(usize::MAX),
        ..args_for(request_path)
    };
    let mut buffer = Vec::new();
    let err = run_plan_with(args, &GreedyFactory, &mut buffer).expect_err("too many days");
    match err {
        CliError::Plan(source) => assert_eq!(
            source,
            PlanError::TooManyDays {
                requested: usize::MAX,
                limit: MAX_DAYS,
            }
        ),
        other => panic!("expected Plan, found {other:?}"),
    }
    assert!(buffer.is_empty());
}

#[rstest]
fn output_flag_writes_plan_file() {
    let workspace = Workspace::new();
    let request_path = workspace.path("request.json");
    let output = workspace.path("plans/today.json");
    write_request(&request_path, &sample_request());

    let args = PlanArgs {
        output: Some(output.clone()),
        strategy: Some("shortest".to_owned()),
        ..args_for(request_path)
    };
    let mut buffer = Vec::new();
    run_plan_with(args, &GreedyFactory, &mut buffer).expect("plan should succeed");

    assert!(buffer.is_empty(), "stdout should stay empty");
    let written = std::fs::read_to_string(output.as_std_path()).expect("plan file");
    let plan: ItineraryPlan = serde_json::from_str(&written).expect("plan JSON");
    assert_eq!(plan.selected_strategy, Strategy::Shortest);
    assert_eq!(plan.order.as_slice(), &[0, 1, 2]);
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "request_path": "from-file.json",
            "days": 4,
            "time_limit_secs": 30,
        }),
        None,
    );
    composer.push_environment(json!({
        "request_path": "from-env.json",
        "strategy": "fastest",
    }));
    composer.push_cli(json!({ "days": 2 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.request_path, Utf8PathBuf::from("from-env.json"));
    assert_eq!(config.strategy, Some(StrategyChoice::Fastest));
    assert_eq!(config.days, Some(2));
    assert_eq!(config.time_limit, Duration::from_secs(30));
}
