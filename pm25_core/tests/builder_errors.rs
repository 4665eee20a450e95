mod support;

use pm25_core::error::BuildError;
use pm25_core::{Calibration, FilterCfg, Monitor, StorageCfg, TimingCfg};
use rstest::rstest;
use support::Scripted;

#[rstest]
fn builder_missing_sensor_yields_typed_build_error() {
    let err = Monitor::builder()
        .with_filter(FilterCfg { window: 5 })
        .try_build()
        .expect_err("should fail with MissingSensor");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingSensor) => {}
        other => panic!("expected MissingSensor, got: {other:?}"),
    }
}

#[rstest]
#[case::zero_window(
    Monitor::builder().with_filter(FilterCfg { window: 0 }),
    "filter.window"
)]
#[case::zero_scale(
    Monitor::builder().with_calibration(Calibration { baseline_v: 0.4, scale: 0.0 }),
    "calibration.scale"
)]
#[case::nan_baseline(
    Monitor::builder().with_calibration(Calibration { baseline_v: f32::NAN, scale: 180.0 }),
    "calibration.baseline_v"
)]
#[case::zero_tick(
    Monitor::builder().with_timing(TimingCfg { tick_ms: 0, persist_every_ms: 10_000 }),
    "timing.tick_ms"
)]
#[case::blank_location(
    Monitor::builder().with_storage(StorageCfg { location: "  ".into() }),
    "storage.location"
)]
fn invalid_config_is_rejected(
    #[case] builder: pm25_core::MonitorBuilder<pm25_core::Missing>,
    #[case] needle: &str,
) {
    let err = builder
        .with_sensor(Scripted::constant(5.0))
        .build()
        .expect_err("invalid config");
    match err.downcast_ref::<BuildError>() {
        Some(BuildError::InvalidConfig(msg)) => assert!(msg.contains(needle), "{msg}"),
        other => panic!("expected InvalidConfig, got: {other:?}"),
    }
}

#[test]
fn defaults_build_with_only_a_sensor() {
    let m = Monitor::builder()
        .with_sensor(Scripted::constant(5.0))
        .build()
        .expect("defaults are valid");
    assert_eq!(m.ticks(), 0);
    assert_eq!(m.timing().tick_ms, 1_000);
}
