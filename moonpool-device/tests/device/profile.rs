//! Profile lookup and profile file tests.

use std::io::Write;

use moonpool_device::{
    load_device_config, load_device_config_file, profile_by_name, DeviceConfig, DeviceConfigError,
    DeviceProfile, Duration, FsyncStrategy, NumBytes, WriteStrategy, HARD_DRIVE_DEVICE_CONFIG,
    MEBIBYTE,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("moonpool_device=debug")
        .with_test_writer()
        .try_init();
}

/// Test that hard drive profile names resolve to the reference config
#[test]
fn test_profile_by_name_returns_hard_drive() {
    assert_eq!(profile_by_name("hdd").unwrap(), HARD_DRIVE_DEVICE_CONFIG);
    assert_eq!(profile_by_name("HardDrive").unwrap(), HARD_DRIVE_DEVICE_CONFIG);
    assert_eq!(DeviceProfile::ALL.len(), 1);
}

/// Test that every file override replaces the matching profile field
#[test]
fn test_overrides_apply_on_top_of_profile() {
    init_tracing();
    let config = load_device_config(
        r#"
        profile = "hdd"
        seek_window = "8KiB"
        seek_time = "4ms"
        read_bytes_per_second = "200MiB"
        write_bytes_per_second = 157286400
        request_reorder_max_delay = "50us"
        fsync_strategy = "dumb"
        write_strategy = "simulate"
        metadata_op_time = "1ms"
        "#,
    )
    .unwrap();

    assert_eq!(config.seek_window, NumBytes::kibibytes(8));
    assert_eq!(config.seek_time, Duration::milliseconds(4));
    assert_eq!(config.read_bytes_per_second, MEBIBYTE * 200);
    assert_eq!(config.write_bytes_per_second, MEBIBYTE * 150);
    assert_eq!(
        config.allocate_bytes_per_second,
        HARD_DRIVE_DEVICE_CONFIG.allocate_bytes_per_second
    );
    assert_eq!(config.request_reorder_max_delay, Duration::microseconds(50));
    assert_eq!(config.fsync_strategy, FsyncStrategy::DumbFsync);
    assert_eq!(config.write_strategy, WriteStrategy::SimulateWrite);
    assert_eq!(config.metadata_op_time, Duration::milliseconds(1));

    assert_eq!(config.read_time(MEBIBYTE * 100), Duration::milliseconds(500));
    assert_eq!(config.fsync_time(), Some(Duration::milliseconds(40)));
}

/// Test that an unknown base profile name is rejected
#[test]
fn test_unknown_profile_rejected() {
    let err = load_device_config(r#"profile = "tape""#).unwrap_err();
    assert!(matches!(err, DeviceConfigError::UnknownProfile(ref name) if name == "tape"));
}

/// Test that an unknown strategy in a file reports the bad name
#[test]
fn test_bad_strategy_name_rejected() {
    let err = load_device_config(r#"fsync_strategy = "bogus""#).unwrap_err();
    assert!(err.to_string().contains("unknown fsync strategy bogus"), "{err}");
}

/// Test that an unparseable duration in a file is rejected
#[test]
fn test_bad_duration_rejected() {
    let err = load_device_config(r#"seek_time = "fortnight""#).unwrap_err();
    assert!(matches!(err, DeviceConfigError::Toml(_)), "{err}");
}

/// Test that a zero throughput fails validation
#[test]
fn test_zero_rate_fails_validation() {
    init_tracing();
    let err = load_device_config(r#"read_bytes_per_second = 0"#).unwrap_err();
    assert!(matches!(
        err,
        DeviceConfigError::NonPositiveRate {
            field: "read_bytes_per_second",
            ..
        }
    ));
}

/// Test that a negative duration fails validation
#[test]
fn test_negative_duration_fails_validation() {
    let err = load_device_config(r#"metadata_op_time = "-1ms""#).unwrap_err();
    assert!(matches!(
        err,
        DeviceConfigError::NegativeValue {
            field: "metadata_op_time"
        }
    ));
}

/// Test loading a profile from a file on disk
#[test]
fn test_load_from_file() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "write_strategy = \"SimulateWrite\"").unwrap();
    writeln!(file, "allocate_bytes_per_second = \"1GiB\"").unwrap();

    let config = load_device_config_file(file.path()).unwrap();
    assert_eq!(config.write_strategy, WriteStrategy::SimulateWrite);
    assert_eq!(config.allocate_time(MEBIBYTE * 512), Duration::milliseconds(500));
}

/// Test that a missing profile file is reported as an I/O error
#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_device_config_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, DeviceConfigError::Io(_)));
}

/// Test that a config serializes to human-readable TOML and parses back
#[test]
fn test_device_config_serializes_to_readable_toml() {
    let text = toml::to_string(&HARD_DRIVE_DEVICE_CONFIG).unwrap();
    assert!(text.contains("seek_window = \"4KiB\""), "{text}");
    assert!(text.contains("seek_time = \"10ms\""), "{text}");
    assert!(text.contains("request_reorder_max_delay = \"100us\""), "{text}");
    assert!(text.contains("fsync_strategy = \"WriteBackCachedFsync\""), "{text}");

    let parsed: DeviceConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed, HARD_DRIVE_DEVICE_CONFIG);
}

/// Test that a huge seek time loaded from a file saturates the dumb fsync cost
#[test]
fn test_dumb_fsync_with_huge_seek_time_saturates() {
    let config = load_device_config(
        r#"
        seek_time = "1000000000000000000s"
        fsync_strategy = "dumb"
        "#,
    )
    .unwrap();
    assert_eq!(config.fsync_time(), Some(Duration::MAX));
}
