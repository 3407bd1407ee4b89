use super::*;

#[test]
fn parses_process_command() {
    let cli = Cli::try_parse_from(["venuescope", "process", "--input", "batch.json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Process {
            ref input,
            output: None,
            shards: None,
        } if input == &PathBuf::from("batch.json")
    ));
}

#[test]
fn parses_process_with_output_and_shards() {
    let cli = Cli::try_parse_from([
        "venuescope",
        "process",
        "--input",
        "in.json",
        "--output",
        "out.json",
        "--shards",
        "4",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Process {
            input,
            output,
            shards,
        } => {
            assert_eq!(input, PathBuf::from("in.json"));
            assert_eq!(output, Some(PathBuf::from("out.json")));
            assert_eq!(shards, Some(4));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn process_requires_input() {
    assert!(Cli::try_parse_from(["venuescope", "process"]).is_err());
}

#[test]
fn process_rejects_non_numeric_shards() {
    assert!(Cli::try_parse_from([
        "venuescope",
        "process",
        "--input",
        "in.json",
        "--shards",
        "many"
    ])
    .is_err());
}

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["venuescope", "analyze", "Great wings at Durty Nelly's"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Analyze { ref text } if text == "Great wings at Durty Nelly's"
    ));
}

#[test]
fn analyze_requires_text() {
    assert!(Cli::try_parse_from(["venuescope", "analyze"]).is_err());
}

#[test]
fn parses_venues_command() {
    let cli = Cli::try_parse_from(["venuescope", "venues"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Venues));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["venuescope"]).is_err());
}
