//! Command dispatch tests: parse arguments, run, check outcome and exit code

use clap::Parser;
use rstest::rstest;

use hierarchy_tools::cli::{execute_command, Cli, CliError};
use hierarchy_tools::exitcode;
use hierarchy_tools::util::testing;

const CATALOG: &str = "tests/resources/hierarchies/catalog.toml";

fn run(args: &[&str]) -> Result<(), CliError> {
    testing::init_test_setup();
    let cli = Cli::try_parse_from(std::iter::once("hierarchy").chain(args.iter().copied()))
        .expect("arguments parse");
    execute_command(&cli)
}

#[rstest]
#[case::tree(&["tree", CATALOG])]
#[case::tree_selected(&["--parent-links", "tree", CATALOG, "--select", "cases"])]
#[case::find(&["find", CATALOG, "laptops"])]
#[case::find_missing(&["find", CATALOG, "nonexistent"])]
#[case::ancestors(&["--parent-links", "ancestors", CATALOG, "smartphones"])]
#[case::ancestors_without_links(&["ancestors", CATALOG, "smartphones"])]
#[case::descendants(&["descendants", CATALOG, "electronics"])]
#[case::stats(&["stats", CATALOG])]
#[case::config_template(&["config", "template"])]
#[case::config_path(&["config", "path"])]
fn given_valid_command_when_executing_then_succeeds(#[case] args: &[&str]) {
    let result = run(args);
    assert!(result.is_ok(), "{:?} failed: {:?}", args, result.err());
}

#[rstest]
#[case::cycle(&["tree", "tests/resources/hierarchies/cycle.toml"], exitcode::DATAERR)]
#[case::invalid(&["stats", "tests/resources/hierarchies/invalid.toml"], exitcode::DATAERR)]
#[case::missing_file(&["stats", "tests/resources/hierarchies/nope.toml"], exitcode::NOINPUT)]
#[case::missing_config(&["-c", "/nonexistent/hierarchy.toml", "stats", CATALOG], exitcode::CONFIG)]
#[case::no_command(&[], exitcode::USAGE)]
fn given_failing_command_when_executing_then_maps_exit_code(
    #[case] args: &[&str],
    #[case] expected: i32,
) {
    let err = run(args).unwrap_err();
    assert_eq!(err.exit_code(), expected, "{}", err);
}
