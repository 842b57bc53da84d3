use std::path::PathBuf;
use strata_core::{CompressionType, ConfigError, StrataConfig};
use strata_verify::{run_matrix, HarnessOptions, InputCorpus, ScenarioMatrix};

#[test]
fn test_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.toml");
    std::fs::write(
        &path,
        r#"
[storage]
artifact_prefix = "Roundtrip"
compression = "lz4"
block_rows = 4

[batch]
capacity = 3
"#,
    )
    .unwrap();

    let config = StrataConfig::from_file(&path).unwrap();
    assert_eq!(config.storage.artifact_prefix, "Roundtrip");
    assert_eq!(config.storage.compression, CompressionType::LZ4);
    assert_eq!(config.storage.block_rows, 4);
    assert_eq!(config.batch.capacity, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strata.yaml");
    std::fs::write(&path, "storage:\n  extension: orc\n  compression: snappy\n").unwrap();

    let config = StrataConfig::from_file(&path).unwrap();
    assert_eq!(config.storage.extension, "orc");
    assert_eq!(config.storage.compression, CompressionType::Snappy);
    assert_eq!(config.batch.capacity, 1024);
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = StrataConfig::from_file(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(ConfigError::IoError(_))));
}

#[test]
fn test_zero_capacity_fails_validation() {
    let config = StrataConfig::from_str(r#"{"batch": {"capacity": 0}}"#).unwrap();
    match config.validate() {
        Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("capacity")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_env_overlay() {
    std::env::set_var("STRATA_WORK_DIR", "/tmp/strata-env");
    std::env::set_var("STRATA_BATCH_CAPACITY", "7");
    std::env::set_var("STRATA_COMPRESSION", "zstd");
    std::env::set_var("STRATA_LOG_LEVEL", "debug");

    let config = StrataConfig::from_env();

    std::env::remove_var("STRATA_WORK_DIR");
    std::env::remove_var("STRATA_BATCH_CAPACITY");
    std::env::remove_var("STRATA_COMPRESSION");
    std::env::remove_var("STRATA_LOG_LEVEL");

    assert_eq!(config.storage.work_dir, PathBuf::from("/tmp/strata-env"));
    assert_eq!(config.batch.capacity, 7);
    assert_eq!(config.storage.compression, CompressionType::Zstd);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_harness_options_follow_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = StrataConfig::default();
    config.storage.work_dir = dir.path().to_path_buf();
    config.storage.artifact_prefix = "Cfg".to_string();
    config.storage.compression = CompressionType::Zstd;
    config.storage.block_rows = 2;
    config.batch.capacity = 3;

    let options = HarnessOptions::from_config(&config);
    assert_eq!(options.capacity, 3);
    assert_eq!(options.block_rows, 2);
    assert_eq!(options.compression, CompressionType::Zstd);
    assert_eq!(options.artifact_prefix, "Cfg");

    let report = run_matrix(&ScenarioMatrix::standard(), &InputCorpus::standard(), &options);
    assert!(report.is_success(), "{}", report);
}
