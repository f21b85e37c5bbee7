use super::*;

#[test]
fn parses_search_with_defaults() {
    let cli = Cli::try_parse_from(["poimap", "search", "seoul station"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            ref keyword,
            pages: 1,
            select: None
        } if keyword == "seoul station"
    ));
}

#[test]
fn parses_search_pages_and_select() {
    let cli = Cli::try_parse_from(["poimap", "search", "cafe", "--pages", "3", "--select", "4"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Search {
            pages: 3,
            select: Some(4),
            ..
        }
    ));
}

#[test]
fn zero_pages_is_rejected() {
    assert!(Cli::try_parse_from(["poimap", "search", "cafe", "--pages", "0"]).is_err());
}

#[test]
fn search_requires_keyword() {
    assert!(Cli::try_parse_from(["poimap", "search"]).is_err());
}

#[test]
fn parses_locate_with_negative_longitude() {
    let cli = Cli::try_parse_from(["poimap", "locate", "--lat", "40.7128", "--lon", "-74.006"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Locate { lat, lon } => {
            assert!((lat - 40.7128).abs() < f64::EPSILON);
            assert!((lon + 74.006).abs() < f64::EPSILON);
        }
        other => panic!("expected locate, got {other:?}"),
    }
}

#[test]
fn command_is_required() {
    assert!(Cli::try_parse_from(["poimap"]).is_err());
}
