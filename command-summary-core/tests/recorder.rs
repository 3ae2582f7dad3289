use std::fs;

use command_summary_core::config::SummaryConfig;
use command_summary_core::recorder;
use command_summary_core::scan::{IndexedScanFile, ScanKind};
use command_summary_core::sections::build_info::BuildInfoRecord;
use command_summary_core::sections::Section;
use command_summary_core::SummaryError;
use tempfile::tempdir;

#[test]
fn test_record_build_info_stores_a_validated_copy() {
    let out = tempdir().unwrap();
    let inputs = tempdir().unwrap();
    let config = SummaryConfig::new(out.path());
    let file = inputs.path().join("build.json");
    fs::write(&file, r#"{"name":"shop","number":"3","started":"2024-05-01T10:00:00Z"}"#).unwrap();

    let first = recorder::record_build_info(&config, &file).unwrap();
    let second = recorder::record_build_info(&config, &file).unwrap();

    assert_ne!(first, second);
    assert_eq!(first.parent().unwrap(), config.section_dir(Section::BuildInfo));
    let stored: BuildInfoRecord = serde_json::from_slice(&fs::read(&first).unwrap()).unwrap();
    assert_eq!(stored.name, "shop");
    assert_eq!(stored.started.as_deref(), Some("2024-05-01T10:00:00Z"));
    assert!(stored.modules.is_empty());
}

#[test]
fn test_invalid_build_info_is_rejected_before_writing() {
    let out = tempdir().unwrap();
    let inputs = tempdir().unwrap();
    let config = SummaryConfig::new(out.path());
    let file = inputs.path().join("build.json");
    fs::write(&file, r#"{"number":"3"}"#).unwrap();

    let err = recorder::record_build_info(&config, &file).unwrap_err();

    assert!(matches!(err, SummaryError::CorruptData { .. }), "got {err:?}");
    assert!(!config.section_dir(Section::BuildInfo).exists());
}

#[test]
fn test_record_scan_indexes_under_the_kind_directory() {
    let out = tempdir().unwrap();
    let inputs = tempdir().unwrap();
    let config = SummaryConfig::new(out.path());
    let file = inputs.path().join("scan.json");
    fs::write(&file, r#"{"violations":"0","vulnerabilities":"2 critical"}"#).unwrap();

    let path = recorder::record_scan(&config, ScanKind::Docker, "nginx:1.25", &file).unwrap();

    assert_eq!(
        path.parent().unwrap(),
        config.scan_index_dir().join("docker-scan")
    );
    let indexed: IndexedScanFile = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(indexed.name, "nginx:1.25");
    assert_eq!(indexed.result.vulnerabilities, "2 critical");
}

#[test]
fn test_record_scan_requires_a_name() {
    let out = tempdir().unwrap();
    let inputs = tempdir().unwrap();
    let config = SummaryConfig::new(out.path());
    let file = inputs.path().join("scan.json");
    fs::write(&file, r#"{"violations":"0","vulnerabilities":"0"}"#).unwrap();

    let err = recorder::record_scan(&config, ScanKind::Build, "  ", &file).unwrap_err();
    assert!(matches!(err, SummaryError::Configuration(_)));
}

#[test]
fn test_record_upload_missing_fragment_is_io_error() {
    let out = tempdir().unwrap();
    let config = SummaryConfig::new(out.path());

    let err = recorder::record_upload(&config, &[out.path().join("nope.json")]).unwrap_err();

    assert!(matches!(err, SummaryError::Io { .. }), "got {err:?}");
    assert!(!config.result_store_path().exists());
}
