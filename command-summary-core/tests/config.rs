use command_summary_core::config::{should_run, SummaryConfig, OUTPUT_DIR_ENV};
use command_summary_core::SummaryError;
use serial_test::serial;

#[test]
#[serial]
fn test_unset_output_dir_disables_summary() {
    std::env::remove_var(OUTPUT_DIR_ENV);
    assert!(!should_run());
    assert!(SummaryConfig::from_env().is_none());
    let err = SummaryConfig::require_from_env().unwrap_err();
    assert!(matches!(err, SummaryError::Configuration(_)));
    assert!(err.to_string().contains(OUTPUT_DIR_ENV));
}

#[test]
#[serial]
fn test_blank_output_dir_disables_summary() {
    std::env::set_var(OUTPUT_DIR_ENV, "   ");
    assert!(!should_run());
    std::env::remove_var(OUTPUT_DIR_ENV);
}

#[test]
#[serial]
fn test_set_output_dir_enables_summary() {
    std::env::set_var(OUTPUT_DIR_ENV, "/tmp/pipeline-out");
    assert!(should_run());
    let config = SummaryConfig::require_from_env().unwrap();
    assert_eq!(config.output_dir, std::path::PathBuf::from("/tmp/pipeline-out"));
    std::env::remove_var(OUTPUT_DIR_ENV);
}
