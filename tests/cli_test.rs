//! End-to-end tests through `execute_command`

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use coursetree::cli::args::Cli;
use coursetree::cli::commands::execute_command;
use coursetree::cli::CliError;
use coursetree::exitcode;

struct Workspace {
    _dir: TempDir,
    config: PathBuf,
    data: PathBuf,
}

fn workspace(courses: &str) -> Workspace {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("coursetree.toml");
    fs::write(&config, "").unwrap();
    let data = dir.path().join("courses.txt");
    if !courses.is_empty() {
        fs::write(&data, courses).unwrap();
    }
    Workspace {
        _dir: dir,
        config,
        data,
    }
}

fn run(ws: &Workspace, args: &[&str]) -> Result<(), CliError> {
    let mut argv = vec![
        "coursetree".to_string(),
        "--config".to_string(),
        path_arg(&ws.config),
        "--file".to_string(),
        path_arg(&ws.data),
    ];
    argv.extend(args.iter().map(|s| s.to_string()));
    let cli = Cli::try_parse_from(argv).expect("valid arguments");
    execute_command(&cli)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn saved_codes(ws: &Workspace) -> Vec<String> {
    fs::read_to_string(&ws.data)
        .unwrap()
        .lines()
        .map(|line| line.split('|').next().unwrap().to_string())
        .collect()
}

#[test]
fn given_empty_file_when_adding_courses_then_they_are_saved_in_post_order() {
    // Arrange
    let ws = workspace("");

    // Act
    run(&ws, &["add", "M100", "M100", "Mechanics", "Fall", "2024", "30", "3", "120"]).unwrap();
    run(&ws, &["add", "C100", "C100", "Chemistry", "Fall", "2024", "20", "0", "99.5"]).unwrap();
    run(&ws, &["add", "T100", "T100", "Topology", "Fall", "2024", "10", "10", "80"]).unwrap();

    // Assert
    assert_eq!(saved_codes(&ws), vec!["C100", "T100", "M100"]);
}

#[test]
fn given_existing_code_when_adding_then_duplicate_error() {
    let ws = workspace("M100|M100|Mechanics|Fall|2024|30|3|120\n");

    let err = run(&ws, &["add", "M100", "M100", "Other", "Fall", "2024", "1", "0", "1"]).unwrap_err();

    assert!(matches!(err, CliError::Duplicate(ref code) if code == "M100"));
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_unknown_code_when_getting_or_deleting_then_not_found() {
    let ws = workspace("M100|M100|Mechanics|Fall|2024|30|3|120\n");

    let get = run(&ws, &["get", "X999"]).unwrap_err();
    let delete = run(&ws, &["delete", "X999"]).unwrap_err();

    assert_eq!(get.exit_code(), exitcode::NOT_FOUND);
    assert!(matches!(delete, CliError::NotFound(_)));
    run(&ws, &["get", "M100"]).unwrap();
}

#[test]
fn given_course_when_deleting_by_copying_then_file_no_longer_has_it() {
    let ws = workspace(
        "M100|M100|Mechanics|Fall|2024|30|3|120\n\
         C100|C100|Chemistry|Fall|2024|20|0|99.5\n\
         T100|T100|Topology|Fall|2024|10|10|80\n",
    );

    run(&ws, &["delete", "M100", "--strategy", "copying"]).unwrap();

    // C100 moved into the root position, T100 stays its right child
    assert_eq!(saved_codes(&ws), vec!["T100", "C100"]);
}

#[test]
fn given_chain_when_balancing_then_file_is_rewritten_balanced() {
    let ws = workspace(
        "A100|A100|Algebra|Fall|2024|1|0|1\n\
         B100|B100|Biology|Fall|2024|1|0|1\n\
         C100|C100|Chemistry|Fall|2024|1|0|1\n",
    );

    run(&ws, &["balance"]).unwrap();

    // B100 is the new root, saved last
    assert_eq!(saved_codes(&ws), vec!["A100", "C100", "B100"]);
}

#[test]
fn given_missing_data_file_when_listing_then_succeeds_with_nothing() {
    let ws = workspace("");

    run(&ws, &["list", "--order", "pre"]).unwrap();
    run(&ws, &["stats"]).unwrap();
    run(&ws, &["tree"]).unwrap();
    run(&ws, &["search", "Alg"]).unwrap();

    assert!(!ws.data.exists());
}
