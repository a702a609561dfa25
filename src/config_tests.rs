use super::*;
use std::collections::HashMap;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, contents.as_bytes()).expect("write config");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn minimal_file_takes_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), r#"{"schema_version": 1}"#);
    let config = load_config(Some(&path)).expect("load config");
    assert_eq!(config, default_config());
}

#[test]
fn full_file_round_trips_every_setting() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(
        dir.path(),
        r#"{
            "schema_version": 1,
            "gateway": "airtable",
            "endpoint_url": "https://example.com/api/survey",
            "airtable": {"base_id": "appFile", "table_name": "Leads", "api_key_env": "LEADS_KEY"},
            "default_country_code": "+233",
            "timeout_secs": 5
        }"#,
    );
    let config = load_config(Some(&path)).expect("load config");
    assert_eq!(config.gateway, GatewayKind::Airtable);
    assert_eq!(config.airtable.api_key_env, "LEADS_KEY");
    assert_eq!(config.default_country_code, "+233");
    assert_eq!(config.timeout_secs, 5);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
    assert!(err.to_string().contains("read config"));
}

#[test]
fn rejects_bad_schema_version_and_country_code() {
    let mut config = default_config();
    config.schema_version = 2;
    assert!(validate_config(&config).is_err());

    let mut config = default_config();
    config.default_country_code = "+1".to_string();
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("+1"));

    let mut config = default_config();
    config.timeout_secs = 0;
    assert!(validate_config(&config).is_err());
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(dir.path(), r#"{"schema_version": 1, "gatewy": "endpoint"}"#);
    let err = load_config(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("parse config"));
}

#[test]
fn endpoint_url_prefers_flag_then_env_then_file() {
    let mut config = default_config();
    config.gateway = GatewayKind::Endpoint;
    config.endpoint_url = Some("https://file.example/api".to_string());

    let from_file = resolve_gateway(&config, &GatewayOverrides::default(), env_from(&[]))
        .expect("resolve");
    assert_eq!(
        from_file.settings,
        GatewaySettings::Endpoint {
            url: "https://file.example/api".to_string()
        }
    );

    let env = env_from(&[(ENDPOINT_ENV, "https://env.example/api")]);
    let from_env = resolve_gateway(&config, &GatewayOverrides::default(), &env).expect("resolve");
    assert_eq!(
        from_env.settings,
        GatewaySettings::Endpoint {
            url: "https://env.example/api".to_string()
        }
    );

    let overrides = GatewayOverrides {
        kind: None,
        endpoint_url: Some("https://flag.example/api".to_string()),
    };
    let from_flag = resolve_gateway(&config, &overrides, &env).expect("resolve");
    assert_eq!(
        from_flag.settings,
        GatewaySettings::Endpoint {
            url: "https://flag.example/api".to_string()
        }
    );
}

#[test]
fn endpoint_without_url_fails() {
    let overrides = GatewayOverrides {
        kind: Some(GatewayKind::Endpoint),
        endpoint_url: None,
    };
    let err = resolve_gateway(&default_config(), &overrides, env_from(&[])).unwrap_err();
    assert!(err.to_string().contains(ENDPOINT_ENV));
}

#[test]
fn airtable_settings_come_from_env_over_file() {
    let mut config = default_config();
    config.gateway = GatewayKind::Airtable;
    config.airtable.base_id = Some("appFile".to_string());

    let env = env_from(&[(AIRTABLE_BASE_ID_ENV, "appEnv"), (DEFAULT_API_KEY_ENV, "secret")]);
    let resolved = resolve_gateway(&config, &GatewayOverrides::default(), env).expect("resolve");
    assert_eq!(
        resolved.settings,
        GatewaySettings::Airtable(AirtableSettings {
            base_id: Some("appEnv".to_string()),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            api_key: Some("secret".to_string()),
        })
    );
    assert_eq!(resolved.timeout, Duration::from_secs(30));
}

#[test]
fn missing_airtable_credentials_resolve_to_none() {
    let overrides = GatewayOverrides {
        kind: Some(GatewayKind::Airtable),
        endpoint_url: None,
    };
    let env = env_from(&[(DEFAULT_API_KEY_ENV, "  ")]);
    let resolved = resolve_gateway(&default_config(), &overrides, env).expect("resolve");
    let GatewaySettings::Airtable(settings) = resolved.settings else {
        panic!("expected airtable settings");
    };
    assert_eq!(settings.base_id, None);
    assert_eq!(settings.api_key, None);
}

#[test]
fn gateway_kind_parses_config_spelling() {
    assert_eq!(GatewayKind::parse("dry_run"), Some(GatewayKind::DryRun));
    assert_eq!(GatewayKind::parse("airtable"), Some(GatewayKind::Airtable));
    assert_eq!(GatewayKind::parse("smtp"), None);
    assert_eq!(GatewayKind::Endpoint.to_string(), "endpoint");
}
