use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join(CONFIG_FILE_NAME);
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        host: "127.0.0.1".to_string(),
        port: 3000,
        max_retries: 5,
        log_dir: None,
    }
}

#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        host: Some("0.0.0.0".to_string()),
        port: Some(8080),
        max_retries: Some(9),
        log_dir: Some(PathBuf::from("/var/log/teamflow")),
        server_url: Some("http://ignored".to_string()),
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.host, "0.0.0.0");
    assert_eq!(updated.port, 8080);
    assert_eq!(updated.max_retries, 9);
    assert_eq!(updated.log_dir, Some(PathBuf::from("/var/log/teamflow")));
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        port: Some(4000),
        ..ConfigUpdate::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "original.db");
    assert_eq!(updated.port, 4000);
    assert_eq!(updated.max_retries, 5);
}

#[test]
fn test_apply_update_with_no_values() {
    let updated = sample_config().apply_update(ConfigUpdate::default());
    assert_eq!(updated, sample_config());
}

#[test]
fn test_bind_address() {
    assert_eq!(sample_config().bind_address(), "127.0.0.1:3000");
}

#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "teamflow.db");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 3000);
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.log_dir, None);
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("teamflow.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
}

#[test]
fn test_config_from_args() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        port: Some(9000),
        debug: true,
        ..CliArgs::default()
    };

    let update = config_from_args(args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.port, Some(9000));
    assert_eq!(update.host, None);
    assert_eq!(update.server_url, None);
}

#[test]
fn test_cli_args_parse_flags() {
    let args = CliArgs::try_parse_from([
        "teamflow",
        "--database-url",
        "flag.db",
        "--port",
        "7000",
        "--max-retries",
        "2",
    ])
    .unwrap();

    assert_eq!(args.database_url, Some("flag.db".to_string()));
    assert_eq!(args.port, Some(7000));
    assert_eq!(args.max_retries, Some(2));
}

#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(
        &temp_dir,
        r#"
            database_url = "file.db"
            port = 4100
            max_retries = 3
            log_dir = "/tmp/teamflow-logs"
            server_url = "http://localhost:4100"
        "#,
    );

    let update = config_from_file(Some(config_path.as_path())).unwrap();

    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.port, Some(4100));
    assert_eq!(update.max_retries, Some(3));
    assert_eq!(update.log_dir, Some(PathBuf::from("/tmp/teamflow-logs")));
    assert_eq!(update.server_url, Some("http://localhost:4100".to_string()));
    assert_eq!(update.host, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = create_test_config_file(
        &temp_dir,
        r#"
            database_url = "file.db"
            port = "not a number"
        "#,
    );

    let result = config_from_file(Some(config_path.as_path()));

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Failed to parse config file"));
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path.as_path())).unwrap();
    assert_eq!(update, ConfigUpdate::default());
}

#[test]
fn test_resolve_config_precedence() {
    let temp_dir = tempdir().unwrap();
    create_test_config_file(
        &temp_dir,
        r#"
            database_url = "file.db"
            port = 4100
            max_retries = 8
        "#,
    );
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..CliArgs::default()
    };

    let config = resolve_config(Some(temp_dir.path().to_path_buf()), args);

    assert_eq!(config.database_url, "args.db");
    assert_eq!(config.port, 4100);
    assert_eq!(config.max_retries, 8);
    assert_eq!(config.host, "127.0.0.1");
}

#[test]
fn test_resolve_config_ignores_broken_file() {
    let temp_dir = tempdir().unwrap();
    create_test_config_file(&temp_dir, "this is = = not toml");

    let config = resolve_config(Some(temp_dir.path().to_path_buf()), CliArgs::default());

    assert_eq!(config, base_config(Some(temp_dir.path().to_path_buf())));
}
