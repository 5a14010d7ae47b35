use super::*;
use rust_decimal::Decimal;

#[test]
fn parses_db_ping_command() {
    let cli =
        Cli::try_parse_from(["signgalaxy-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["signgalaxy-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["signgalaxy-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_pricing_quote_with_decimal() {
    let cli = Cli::try_parse_from(["signgalaxy-cli", "pricing", "quote", "1235.5"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Quote { price, json: false }
        }) if price == Decimal::new(12_355, 1)
    ));
}

#[test]
fn parses_pricing_quote_negative_price() {
    let cli = Cli::try_parse_from(["signgalaxy-cli", "pricing", "quote", "-40", "--json"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Quote { price, json: true }
        }) if price == Decimal::from(-40)
    ));
}

#[test]
fn pricing_quote_rejects_non_numeric_price() {
    let result = Cli::try_parse_from(["signgalaxy-cli", "pricing", "quote", "lots"]);
    assert!(result.is_err());
}

#[test]
fn pricing_reprice_defaults_to_writing() {
    let cli = Cli::try_parse_from(["signgalaxy-cli", "pricing", "reprice"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Reprice { dry_run: false }
        })
    ));
}

#[test]
fn pricing_reprice_dry_run() {
    let cli = Cli::try_parse_from(["signgalaxy-cli", "pricing", "reprice", "--dry-run"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Pricing {
            command: PricingCommands::Reprice { dry_run: true }
        })
    ));
}

#[test]
fn log_level_follows_loaded_config() {
    let config = AppConfig {
        database_url: "postgres://localhost/signgalaxy".to_string(),
        env: signgalaxy_core::Environment::Test,
        bind_addr: "127.0.0.1:5000".parse().expect("addr"),
        log_level: "debug".to_string(),
        db_max_connections: 1,
        db_min_connections: 0,
        db_acquire_timeout_secs: 1,
        pricing: signgalaxy_core::PricingPolicy::default(),
        api_keys: Vec::new(),
    };
    assert_eq!(fallback_log_level(&Ok(config)), "debug");

    let missing = Err(ConfigError::MissingEnvVar("DATABASE_URL".to_string()));
    assert_eq!(fallback_log_level(&missing), "info");
}
