use super::*;

#[test]
fn parses_run_without_identity() {
    let cli = Cli::try_parse_from(["bookscrape-cli", "run"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Run {
            scraper_name: None,
            run_id: None
        }
    ));
}

#[test]
fn parses_run_with_identity() {
    let cli = Cli::try_parse_from([
        "bookscrape-cli",
        "run",
        "--scraper-name",
        "csv_100",
        "--run-id",
        "100",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Run {
            scraper_name,
            run_id,
        } => {
            assert_eq!(scraper_name.as_deref(), Some("csv_100"));
            assert_eq!(run_id.as_deref(), Some("100"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_invoke_with_event_path() {
    let cli = Cli::try_parse_from(["bookscrape-cli", "invoke", "event.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Invoke { ref event } if event == &PathBuf::from("event.json")
    ));
}

#[test]
fn invoke_requires_event_path() {
    assert!(Cli::try_parse_from(["bookscrape-cli", "invoke"]).is_err());
}

#[test]
fn parses_categories_and_rate() {
    let cli = Cli::try_parse_from(["bookscrape-cli", "categories"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Categories));

    let cli = Cli::try_parse_from(["bookscrape-cli", "rate"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Rate));
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["bookscrape-cli"]).is_err());
}

#[test]
fn failed_response_maps_to_failure_exit() {
    let response = InvocationResponse {
        status_code: 500,
        body: "{}".to_owned(),
    };
    assert_eq!(print_response(&response).unwrap(), ExitCode::FAILURE);
}
