//! Conversion tests for DeviceConfig.
//!
//! These tests pin the throughput formulas, the clamp on non-positive
//! durations, and the truncation behavior of both directions.

use moonpool_device::{
    DeviceConfig, Duration, NumBytes, HARD_DRIVE_DEVICE_CONFIG, KIBIBYTE, MEBIBYTE,
};

/// Config with the same rate for every operation.
fn config_with_rate(rate: NumBytes) -> DeviceConfig {
    HARD_DRIVE_DEVICE_CONFIG
        .with_read_bytes_per_second(rate)
        .with_write_bytes_per_second(rate)
        .with_allocate_bytes_per_second(rate)
}

fn assert_duration_near(actual: Duration, expected_seconds: f64) {
    let actual_seconds = actual.as_seconds_f64();
    assert!(
        (actual_seconds - expected_seconds).abs() <= 1e-9 + expected_seconds.abs() * 1e-12,
        "expected ~{expected_seconds}s, got {actual_seconds}s"
    );
}

const RATES: [i64; 5] = [1, 7, 4096, 104_857_600, 429_496_729_600];
const SIZES: [i64; 6] = [1, 3, 512, 4096, 1_000_003, 1 << 30];

/// Test that read, write and allocate times equal bytes divided by rate
#[test]
fn test_time_matches_bytes_over_rate() {
    for rate in RATES {
        let config = config_with_rate(NumBytes::new(rate));
        for size in SIZES {
            let expected = size as f64 / rate as f64;
            let bytes = NumBytes::new(size);
            assert_duration_near(config.read_time(bytes), expected);
            assert_duration_near(config.write_time(bytes), expected);
            assert_duration_near(config.allocate_time(bytes), expected);
        }
    }
}

/// Test that converting bytes to time and back loses at most a nanosecond of data
#[test]
fn test_bytes_to_time_and_back() {
    for rate in RATES {
        let config = config_with_rate(NumBytes::new(rate));
        // Truncating to whole nanoseconds loses at most rate/1e9 bytes.
        let tolerance = rate as f64 / 1e9 + 1.0;
        for size in SIZES {
            let bytes = NumBytes::new(size);
            let read_back = config.readable_bytes(config.read_time(bytes));
            let written_back = config.writable_bytes(config.write_time(bytes));
            assert!(
                (read_back.get() - size).abs() as f64 <= tolerance,
                "rate {rate}, size {size}: read back {read_back}"
            );
            assert!(
                (written_back.get() - size).abs() as f64 <= tolerance,
                "rate {rate}, size {size}: written back {written_back}"
            );
            assert!(read_back.get() <= size);
        }
    }
}

/// Test that zero and negative durations convert to zero bytes
#[test]
fn test_non_positive_durations_yield_zero_bytes() {
    let durations = [
        Duration::ZERO,
        Duration::nanoseconds(-1),
        Duration::milliseconds(-10),
        Duration::seconds(-3600),
        Duration::MIN,
    ];
    for rate in RATES {
        let config = config_with_rate(NumBytes::new(rate));
        for duration in durations {
            assert_eq!(config.readable_bytes(duration), NumBytes::ZERO);
            assert_eq!(config.writable_bytes(duration), NumBytes::ZERO);
        }
    }
}

/// Test that negative byte counts give proportionally negative durations
#[test]
fn test_negative_bytes_are_not_clamped() {
    let config = HARD_DRIVE_DEVICE_CONFIG;
    assert_eq!(config.write_time(MEBIBYTE * -1), Duration::milliseconds(-10));
    assert_eq!(config.read_time(MEBIBYTE * -100), Duration::seconds(-1));
    assert_eq!(config.read_time(NumBytes::ZERO), Duration::ZERO);
}

/// Test the hard drive profile against known transfer times
#[test]
fn test_hard_drive_scenarios() {
    let config = HARD_DRIVE_DEVICE_CONFIG;
    assert_eq!(config.read_time(MEBIBYTE * 100), Duration::seconds(1));
    assert_eq!(config.write_time(MEBIBYTE), Duration::milliseconds(10));
    assert_eq!(config.allocate_time(MEBIBYTE * (4096 * 100)), Duration::seconds(1));
    assert_eq!(config.readable_bytes(Duration::seconds(1)), MEBIBYTE * 100);
    assert_eq!(config.writable_bytes(Duration::milliseconds(10)), MEBIBYTE);
    // One 4 KiB block at 100 MiB/s is 39062.5ns, truncated.
    assert_eq!(config.read_time(KIBIBYTE * 4), Duration::nanoseconds(39_062));
}

/// Test that both conversion directions truncate instead of rounding
#[test]
fn test_truncation_not_rounding() {
    // 2 bytes at 3 B/s is 0.666..s, which rounds up but truncates down.
    let config = config_with_rate(NumBytes::new(3));
    assert_eq!(config.read_time(NumBytes::new(2)), Duration::nanoseconds(666_666_666));
    // 999ms at 1 B/s is 0.999 bytes.
    let config = config_with_rate(NumBytes::new(1));
    assert_eq!(config.readable_bytes(Duration::milliseconds(999)), NumBytes::ZERO);
    assert_eq!(config.readable_bytes(Duration::milliseconds(1999)), NumBytes::new(1));
}

/// Test that one config can be used from several threads at once
#[test]
fn test_shared_config_across_threads() {
    let config = HARD_DRIVE_DEVICE_CONFIG;
    let handles: Vec<_> = (1..=4)
        .map(|i| std::thread::spawn(move || config.read_time(MEBIBYTE * (100 * i))))
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let elapsed = handle.join().expect("thread panicked");
        assert_eq!(elapsed, Duration::seconds(i as i64 + 1));
    }
}
