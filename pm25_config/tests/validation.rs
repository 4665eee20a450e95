use pm25_config::{DisplayKind, load_toml};
use rstest::rstest;

const FULL: &str = r#"
[sensor]
i2c_bus = 1
adc_address = 0x48
adc_channel = 0
led_pin = 24
led_active_low = true
settle_us = 280
hold_us = 40
recovery_us = 9680

[calibration]
baseline_v = -0.17
scale = 180.0

[filter]
window = 10

[alert]
cooldown_ticks = 300

[timing]
tick_ms = 1000
persist_every_s = 10

[storage]
location = "home"
measurement = "air_quality"

[influxdb]
url = "http://localhost:8086"
database = "pm25"
username = "sensor"
password = "sensor123"

[telegram]
bot_token = "123:abc"
chat_id = "42"

[display]
kind = "sh1106"
i2c_address = 0x3C

[logging]
rotation = "daily"
"#;

#[test]
fn accepts_full_config() {
    let cfg = load_toml(FULL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.calibration.baseline_v, -0.17);
    assert_eq!(cfg.sensor.hold_us, 40);
    assert_eq!(cfg.display.kind, DisplayKind::Sh1106);
    let influx = cfg.influxdb.as_ref().expect("influx section");
    assert_eq!(influx.timeout_ms, 2_000);
    let tg = cfg.telegram.as_ref().expect("telegram section");
    assert_eq!(tg.timeout_ms, 10_000);
    assert_eq!(tg.api_base, "https://api.telegram.org");
}

#[rstest]
#[case("[filter]\nwindow = 0\n", "filter.window must be >= 1")]
#[case("[calibration]\nscale = 0.0\n", "calibration.scale must be > 0")]
#[case("[calibration]\nscale = -180.0\n", "calibration.scale must be > 0")]
#[case("[timing]\ntick_ms = 0\n", "timing.tick_ms must be >= 1")]
#[case("[timing]\ntick_ms = 5\n", "timing.tick_ms must cover one sensor pulse")]
#[case("[sensor]\nadc_channel = 4\n", "sensor.adc_channel must be in 0..=3")]
#[case("[sensor]\nsettle_us = 0\n", "sensor.settle_us must be >= 1")]
#[case("[sensor]\nrecovery_us = 2000000\n", "sensor pulse (settle_us + hold_us + recovery_us) must be <= 1s")]
#[case(
    "[sensor]\nsettle_us = 9223372036854775807\nhold_us = 9223372036854775807\nrecovery_us = 9223372036854775807\n",
    "sensor pulse (settle_us + hold_us + recovery_us) must be <= 1s"
)]
#[case("[storage]\nlocation = \" \"\n", "storage.location must not be empty")]
#[case(
    "[influxdb]\nurl = \"localhost:8086\"\ndatabase = \"pm25\"\n",
    "influxdb.url must start with http"
)]
#[case(
    "[telegram]\nbot_token = \"t\"\nchat_id = \"\"\n",
    "telegram.chat_id must not be empty"
)]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation must be one of")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[test]
fn unknown_display_kind_fails_to_parse() {
    assert!(load_toml("[display]\nkind = \"lcd\"\n").is_err());
}

#[test]
fn influx_section_requires_database() {
    assert!(load_toml("[influxdb]\nurl = \"http://localhost:8086\"\n").is_err());
}

#[test]
fn shipped_sample_config_is_valid() {
    let cfg = load_toml(include_str!("../../etc/pm25.toml")).expect("sample parses");
    cfg.validate().expect("sample validates");
    assert_eq!(cfg.display.i2c_address, 0x3C);
    assert!(cfg.influxdb.is_none());
    assert!(cfg.telegram.is_none());
}
