use pretty_assertions::assert_eq;
use sharpen_config::{json_schema_string, ConfigError, NamesConfig, SharpenConfig};

#[test]
fn empty_file_yields_defaults() {
    let config = SharpenConfig::load_from_str("").expect("parses");
    assert_eq!(config, SharpenConfig::default());
    assert_eq!(config.names.extracted_method, "NewMethod");
    assert_eq!(config.names.magic_number_constant, "MAGIC_NUMBER");
    assert_eq!(config.logging.level, "info");
}

#[test]
fn partial_names_keep_remaining_defaults() {
    let config = SharpenConfig::load_from_str(
        r#"
[names]
extracted_method = "Helper"
property_prefix = ""
"#,
    )
    .expect("parses");
    assert_eq!(config.names.extracted_method, "Helper");
    assert_eq!(config.names.property_prefix, "");
    assert_eq!(config.names.introduced_local, NamesConfig::default().introduced_local);
}

#[test]
fn disabled_refactorings_are_not_enabled() {
    let config = SharpenConfig::load_from_str(
        r#"
[refactorings]
disabled = ["make-singleton", " pull-up-field "]
"#,
    )
    .expect("parses");
    assert!(!config.refactorings.is_enabled("make-singleton"));
    assert!(!config.refactorings.is_enabled("pull-up-field"));
    assert!(config.refactorings.is_enabled("extract-method"));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = SharpenConfig::load_from_str(
        r#"
[names]
extracted_methd = "Typo"
"#,
    )
    .expect_err("unknown key");
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn loads_from_a_file_on_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("sharpen.toml");
    std::fs::write(&path, "[logging]\nlevel = \"DEBUG\"\njson = true\n").expect("write config");

    let config = SharpenConfig::load_from_path(&path).expect("loads");
    assert_eq!(config.logging.level, "DEBUG");
    assert!(config.logging.json);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = SharpenConfig::load_from_path(dir.path().join("missing.toml")).expect_err("missing");
    match err {
        ConfigError::Io { path, .. } => assert!(path.ends_with("missing.toml")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_lists_every_section() {
    let schema = json_schema_string().expect("serializes");
    for key in ["names", "refactorings", "logging", "extracted_method"] {
        assert!(schema.contains(key), "schema is missing {key}");
    }
}

#[test]
fn init_tracing_is_idempotent() {
    let config = SharpenConfig::default();
    sharpen_config::init_tracing(&config.logging);
    sharpen_config::init_tracing(&config.logging);
}
