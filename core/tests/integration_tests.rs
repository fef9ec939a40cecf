use protoargs_core::*;

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// A small "deploy" tool: global options plus a stop-at sub-command marker.
fn deploy_spec() -> PrototypeSpec {
    PrototypeSpec::from_yaml_str(
        r#"
env:
  labels: "--env|--env=|-e"
  valued: true
  validValues: "dev|staging|prod"
  default: dev
  help: "Target environment"
region:
  labels: [--region, --region=]
  valued: true
  multiple: "yes"
dry_run:
  labels: --dry-run
force:
  labels: "-f|--force"
  multiple: true
command:
  labels: "deploy|rollback"
  stopHere: true
help:
  labels: "-h|--help"
"#,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn empty_token_list_succeeds_without_unsatisfied_required_options() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    let rest = options.parse(tokens(&[]), false).unwrap();
    assert!(rest.is_empty());
    assert_eq!(options.value_of("env"), Some("dev"));
    assert_eq!(options.options().len(), 1);
}

#[test]
fn empty_token_list_fails_on_required_option_without_default() {
    let spec = PrototypeSpec::from_yaml_str(
        r#"
user:
  labels: --user
  valued: true
  required: TRUE
"#,
    )
    .unwrap();
    let mut options = CliOptions::new(&spec).unwrap();
    assert_eq!(
        options.parse(tokens(&[]), false),
        Err(OptionsError::OptionNeedsValue("user".into()))
    );
}

#[test]
fn spec_errors_are_reported_at_construction() {
    let unknown = PrototypeSpec::from_yaml_str("name:\n  hidden: true\n").unwrap();
    assert!(matches!(
        CliOptions::new(&unknown),
        Err(OptionsError::InvalidProperty { ref property, .. }) if property == "hidden"
    ));

    let bad_bool = PrototypeSpec::from_yaml_str("name:\n  valued: maybe\n").unwrap();
    assert!(matches!(
        CliOptions::new(&bad_bool),
        Err(OptionsError::InvalidPropertyValue { ref property, .. }) if property == "valued"
    ));

    let bad_labels = PrototypeSpec::from_json_str(r#"{"name": {"labels": {"a": 1}}}"#).unwrap();
    assert!(matches!(
        CliOptions::new(&bad_labels),
        Err(OptionsError::InvalidPropertyValue { ref property, .. }) if property == "labels"
    ));

    let empty = PrototypeSpec::from_json_str("{}").unwrap();
    assert_eq!(CliOptions::new(&empty).unwrap_err(), OptionsError::NoDataSupplied);

    let duplicate = PrototypeSpec::from_json_str(r#"{"a": {}, "a": {}}"#).unwrap();
    assert_eq!(
        CliOptions::new(&duplicate).unwrap_err(),
        OptionsError::AlreadyDefinedOption("a".into())
    );
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn inline_and_separate_values() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    options.parse(tokens(&["--env=prod"]), false).unwrap();
    assert_eq!(options.get("env"), Some(&OptionValue::Single("prod".into())));

    options.parse(tokens(&["-e", "staging"]), false).unwrap();
    assert_eq!(options.value_of("env"), Some("staging"));
}

#[test]
fn multiple_values_accumulate_in_order_without_duplicates() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    options
        .parse(
            tokens(&["--region", "eu", "us", "eu", "--region=ap", "us"]),
            false,
        )
        .unwrap();
    assert_eq!(
        options.get("region"),
        Some(&OptionValue::Multiple(vec![
            "eu".into(),
            "us".into(),
            "ap".into()
        ]))
    );
}

#[test]
fn repeated_flags_fail_unless_multiple() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    assert_eq!(
        options.parse(tokens(&["--dry-run", "--dry-run"]), false),
        Err(OptionsError::AlreadyParsedOption("--dry-run".into()))
    );

    options.parse(tokens(&["-f", "--force"]), false).unwrap();
    assert_eq!(options.get("force"), Some(&OptionValue::Flag("--force".into())));
}

#[test]
fn invalid_tokens_fail_strictly_and_survive_leniently() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    assert_eq!(
        options.parse(tokens(&["--dry-run", "--unknown"]), false),
        Err(OptionsError::InvalidToken("--unknown".into()))
    );

    let rest = options
        .parse(tokens(&["--unknown", "--dry-run", "x=1"]), true)
        .unwrap();
    assert_eq!(rest, tokens(&["--unknown", "x=1"]));
    assert!(options.has("dry_run"));
}

#[test]
fn valid_values_are_enforced() {
    let spec = PrototypeSpec::new().option(
        "color",
        Properties::new()
            .set("labels", "--color")
            .set("valued", true)
            .set("validValues", vec!["red", "blue"]),
    );
    let mut options = CliOptions::new(&spec).unwrap();

    let err = options.parse(tokens(&["--color", "green"]), false).unwrap_err();
    assert_eq!(
        err,
        OptionsError::InvalidValue {
            option: "--color".into(),
            valid_values: vec!["red".into(), "blue".into()],
            value: "green".into(),
        }
    );

    options.parse(tokens(&["--color", "red"]), false).unwrap();
    assert_eq!(options.value_of("color"), Some("red"));
}

#[test]
fn stop_here_leaves_later_tokens_untouched() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    let rest = options
        .parse(
            tokens(&["--dry-run", "deploy", "--env=prod", "--dry-run", "app"]),
            false,
        )
        .unwrap();
    assert_eq!(options.value_of("command"), Some("deploy"));
    assert_eq!(options.value_of("env"), Some("dev"));
    assert_eq!(rest, tokens(&["--env=prod", "--dry-run", "app"]));
}

#[test]
fn flag_with_inline_value_is_rejected() {
    let spec = PrototypeSpec::new().option("quiet", Properties::new().set("labels", "-q|-q="));
    let mut options = CliOptions::new(&spec).unwrap();
    assert_eq!(
        options.parse(tokens(&["-q=1"]), false),
        Err(OptionsError::OptionDoesNotAcceptValue("-q=".into()))
    );
}

#[test]
fn errors_surface_in_token_order() {
    let mut options = CliOptions::new(&deploy_spec()).unwrap();
    let err = options
        .parse(tokens(&["--env", "qa", "--dry-run", "--dry-run"]), false)
        .unwrap_err();
    assert!(matches!(err, OptionsError::InvalidValue { .. }));
}

#[test]
fn parse_is_deterministic_across_fresh_parsers() {
    let argv = tokens(&["-f", "--region", "eu", "us", "--env=prod", "-f", "deploy", "now"]);

    let mut first = CliOptions::new(&deploy_spec()).unwrap();
    let first_rest = first.parse(argv.clone(), false).unwrap();

    let mut second = CliOptions::new(&deploy_spec()).unwrap();
    let second_rest = second.parse(argv, false).unwrap();

    assert_eq!(first.options(), second.options());
    assert_eq!(first_rest, second_rest);
    assert_eq!(first_rest, tokens(&["now"]));
}

#[test]
fn one_vector_parsed_against_two_option_sets() {
    let global = PrototypeSpec::new()
        .option("verbose", Properties::new().set("labels", "-v"))
        .option(
            "config",
            Properties::new().set("labels", "--config").set("valued", true),
        );
    let sub = PrototypeSpec::new()
        .option(
            "name",
            Properties::new().set("labels", "--name").set("valued", true).set("required", true),
        )
        .option("force", Properties::new().set("labels", "--force"));

    let argv = tokens(&["--name", "web", "-v", "--force", "--config", "app.yml"]);

    let mut global_options = CliOptions::new(&global).unwrap();
    let rest = global_options.parse(argv, true).unwrap();
    assert!(global_options.has("verbose"));
    assert_eq!(global_options.value_of("config"), Some("app.yml"));

    // Unknown tokens, bare values included, stay in order for the next pass.
    assert_eq!(rest, tokens(&["--name", "web", "--force"]));

    let sub_options = CliOptions::make(&sub, rest).unwrap();
    assert_eq!(sub_options.value_of("name"), Some("web"));
    assert!(sub_options.has("force"));
}

#[test]
fn typed_registry_matches_loose_spec() {
    let registry = PrototypeRegistry::from_prototypes([
        (
            "env",
            OptionPrototype::with_value(["--env", "--env=", "-e"])
                .with_valid_values(["dev", "staging", "prod"])
                .with_default("dev")
                .with_help("Target environment"),
        ),
        (
            "region",
            OptionPrototype::with_value(["--region", "--region="]).allow_multiple(),
        ),
        ("dry_run", OptionPrototype::flag(["--dry-run"])),
        ("force", OptionPrototype::flag(["-f", "--force"]).allow_multiple()),
        ("command", OptionPrototype::flag(["deploy", "rollback"]).stop_here()),
        ("help", OptionPrototype::flag(["-h", "--help"])),
    ])
    .unwrap();

    assert_eq!(registry, PrototypeRegistry::from_spec(&deploy_spec()).unwrap());
}

#[test]
fn help_renders_from_spec() {
    let options = CliOptions::new(&deploy_spec()).unwrap();
    let help = options.help(&HelpFilter::default().only(["env", "command"]));
    assert_eq!(
        help,
        "    --env, --env=, -e\n        Target environment\n\n    deploy, rollback"
    );
}
