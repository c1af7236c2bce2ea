use super::{directory, validator};

use argsig::analyser::lookup::Directory;
use argsig::analyser::{AnalyserOptions, Criteria, ValidationState, Value};
use rstest::rstest;

fn options(allow_multi_errors: bool) -> AnalyserOptions {
    AnalyserOptions {
        allow_multi_errors,
        search: true,
        ..AnalyserOptions::default()
    }
}

#[rstest]
#[case::single_error(false, 1)]
#[case::multi_error(true, 2)]
#[tokio::test]
async fn failing_positions_are_reported_per_mode(
    #[case] allow_multi_errors: bool,
    #[case] expected_messages: usize,
) {
    let (validator, sink) = validator(
        "<a:number> <b:boolean> <c:string>",
        &["x", "y", "z"],
        Directory::default(),
    );
    let mut validator = validator.with_options(options(allow_multi_errors));

    validator.validate().await;

    assert_eq!(sink.messages().len(), expected_messages);
    assert_eq!(validator.failures().len(), expected_messages);
    assert_eq!(
        validator.state(),
        &ValidationState::Failed {
            kind: Criteria::Type,
            position: 0,
            collected: vec![],
        }
    );
}

#[rstest]
#[tokio::test]
async fn multi_error_mode_reports_in_position_order() {
    let (validator, sink) = validator(
        "<a:number> <b:string> <c:boolean>",
        &["x", "ok", "y"],
        Directory::default(),
    );
    let mut validator = validator.with_options(options(true));

    validator.validate().await;

    let positions: Vec<usize> = validator.failures().iter().map(|f| f.position).collect();
    assert_eq!(positions, vec![0, 2]);
    assert!(sink.messages()[1].contains("argument c"));
    // values after the first failure are not collected
    assert!(validator.collected().is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_required_argument_stops_multi_error_run() {
    let (validator, sink) = validator("<a:number> <b> <c>", &["x"], Directory::default());
    let mut validator = validator.with_options(options(true));

    validator.validate().await;

    let kinds: Vec<Criteria> = validator.failures().iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![Criteria::Type, Criteria::Undefined]);
    assert_eq!(sink.messages().len(), 2);
}

#[rstest]
#[tokio::test]
async fn lookup_failures_each_reported_in_multi_error_mode(directory: Directory) {
    let (validator, sink) = validator("<where:Channel|role:Role>", &["nowhere"], directory);
    let mut validator = validator.with_options(options(true));

    validator.validate().await;

    assert_eq!(
        sink.messages(),
        vec![
            "Unable to find channel nowhere",
            "Unable to find role nowhere",
            "alice, your argument where did not match the proper type. Expected type Channel or Role but got nowhere",
        ]
    );
    assert!(matches!(
        validator.state(),
        ValidationState::Failed {
            kind: Criteria::Undiscoverable,
            ..
        }
    ));
}

#[rstest]
#[tokio::test]
async fn values_before_failure_are_kept() {
    let (validator, _) = validator("<a> <b:number> <c>", &["first", "x", "third"], Directory::default());
    let mut validator = validator.with_options(options(false));

    validator.validate().await;

    assert_eq!(validator.collected(), &[Value::from("first")]);
    assert_eq!(validator.error().unwrap().position, 1);
}
