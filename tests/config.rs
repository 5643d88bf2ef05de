use clap::Parser;
use clinic_assist::cli::{Args, ChatAction, Command};
use clinic_assist::config::{validate_base_url, Config, JsonConfig, DEFAULT_API_BASE_URL};
use clinic_assist::session::RestorePolicy;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn parse_args(argv: &[&str]) -> Args {
    Args::try_parse_from(argv).unwrap()
}

fn resolve(args: &Args, json_config: JsonConfig) -> Result<Config, String> {
    Config::resolve_with(args, json_config, |_| None)
}

#[test]
fn test_load_yaml_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clinic-assist.yaml");
    fs::write(
        &path,
        "api:\n  base_url: https://clinic.example.com/api/\n  timeout_secs: 15\nsession:\n  storage_dir: /tmp/clinic-session\n  restore: require-login\n",
    )
    .unwrap();

    let json_config = JsonConfig::load_from(&path).unwrap();
    let config = resolve(&parse_args(&["clinic", "whoami"]), json_config).unwrap();

    assert_eq!(config.api_base_url, "https://clinic.example.com/api");
    assert_eq!(config.api_timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/clinic-session")));
    assert_eq!(config.restore_policy, RestorePolicy::RequireLogin);
}

#[test]
fn test_load_json_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clinic-assist.json");
    fs::write(&path, r#"{"session": {"restore": "trust", "verbose": true}}"#).unwrap();

    let json_config = JsonConfig::load_from(&path).unwrap();
    assert_eq!(json_config.session.restore, Some(RestorePolicy::Trust));
    assert_eq!(json_config.session.verbose, Some(true));
    assert!(json_config.api.base_url.is_none());
}

#[test]
fn test_defaults_without_config() {
    let config = resolve(&parse_args(&["clinic", "whoami"]), JsonConfig::default()).unwrap();

    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.api_timeout, None);
    assert_eq!(config.restore_policy, RestorePolicy::Trust);
}

#[test]
fn test_cli_url_overrides_config_file() {
    let mut json_config = JsonConfig::default();
    json_config.api.base_url = Some("https://from-file.example.com/api".to_string());

    let args = parse_args(&["clinic", "--api-url", "http://localhost:9090/api", "chat", "history"]);
    let config = resolve(&args, json_config).unwrap();

    assert_eq!(config.api_base_url, "http://localhost:9090/api");
    assert!(matches!(
        args.command,
        Command::Chat {
            action: Some(ChatAction::History)
        }
    ));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let args = parse_args(&["clinic", "--api-url", "clinic.example.com", "whoami"]);
    assert!(resolve(&args, JsonConfig::default()).is_err());
    assert!(validate_base_url("ftp://clinic.example.com").is_err());
}

#[test]
fn test_example_config_round_trips_through_yaml() {
    let yaml = JsonConfig::example().to_yaml().unwrap();
    let parsed: JsonConfig = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(parsed.api.base_url.as_deref(), Some(DEFAULT_API_BASE_URL));
    assert_eq!(parsed.session.restore, Some(RestorePolicy::Trust));
}

#[test]
fn test_restore_policy_parsing() {
    assert_eq!("trust".parse::<RestorePolicy>(), Ok(RestorePolicy::Trust));
    assert_eq!(
        "REQUIRE-LOGIN".parse::<RestorePolicy>(),
        Ok(RestorePolicy::RequireLogin)
    );
    assert!("sometimes".parse::<RestorePolicy>().is_err());
}

#[test]
fn test_env_overrides_file_but_not_cli() {
    let mut json_config = JsonConfig::default();
    json_config.api.base_url = Some("https://from-file.example.com/api".to_string());
    json_config.api.timeout_secs = Some(5);
    let env: HashMap<&str, &str> = [
        ("CLINIC_API_URL", "https://from-env.example.com/api/"),
        ("CLINIC_API_TIMEOUT", "30"),
        ("CLINIC_SESSION_RESTORE", "require-login"),
        ("CLINIC_VERBOSE", "1"),
    ]
    .into_iter()
    .collect();
    let lookup = |key: &str| env.get(key).map(|v| v.to_string());

    let config =
        Config::resolve_with(&parse_args(&["clinic", "whoami"]), json_config.clone(), lookup)
            .unwrap();
    assert_eq!(config.api_base_url, "https://from-env.example.com/api");
    assert_eq!(config.api_timeout, Some(Duration::from_secs(30)));
    assert_eq!(config.restore_policy, RestorePolicy::RequireLogin);
    assert!(config.verbose);

    let args = parse_args(&["clinic", "--api-url", "http://localhost:9090/api", "whoami"]);
    let config = Config::resolve_with(&args, json_config, lookup).unwrap();
    assert_eq!(config.api_base_url, "http://localhost:9090/api");
}

#[test]
fn test_invalid_env_timeout_is_rejected() {
    let result = Config::resolve_with(
        &parse_args(&["clinic", "whoami"]),
        JsonConfig::default(),
        |key| (key == "CLINIC_API_TIMEOUT").then(|| "soon".to_string()),
    );
    assert!(result.is_err());
}
