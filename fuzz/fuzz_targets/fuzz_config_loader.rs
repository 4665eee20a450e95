#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary TOML must either fail to parse or validate without panicking,
// and a config that validates must describe a pulse that fits in one tick.
fuzz_target!(|data: &str| {
    let Ok(cfg) = pm25_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_ok() {
        let pulse_us = cfg.sensor.pulse_us().expect("validated pulse fits in u64");
        assert!(pulse_us <= 1_000_000);
        assert!(cfg.timing.tick_ms.saturating_mul(1_000) >= pulse_us);
        assert!(cfg.filter.window >= 1);
    }
});
