use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const CFG: &str = r#"
[filter]
window = 1

[alert]
cooldown_ticks = 2

[timing]
tick_ms = 20
"#;

fn run_json(envs: &[(&str, &str)], ticks: &str) -> Vec<Value> {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("pm25.toml");
    fs::write(&cfg, CFG).unwrap();

    let mut cmd = Command::cargo_bin("pm25").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .args(["--json", "run", "--max-ticks", ticks])
        .env_remove("PM25_SIM_VOLTAGE")
        .env_remove("PM25_SIM_FAIL_EVERY")
        .env_remove("RUST_LOG");
    for (k, v) in envs {
        cmd.env(k, v);
    }
    let out = cmd.output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8(out.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn one_line_per_tick_then_summary() {
    let lines = run_json(&[], "3");
    assert_eq!(lines.len(), 4);
    for (i, line) in lines[..3].iter().enumerate() {
        assert_eq!(line["tick"], i as u64 + 1);
        assert_eq!(line["level"], "EXCELLENT");
        assert_eq!(line["aqi"], 1);
        assert_eq!(line["alert"], "quiet");
        assert_eq!(line["persist"], "disabled");
    }
    assert_eq!(lines[3]["summary"]["ticks"], 3);
    assert_eq!(lines[3]["summary"]["interrupted"], false);
}

#[test]
fn sensor_failure_skips_only_that_tick() {
    let lines = run_json(&[("PM25_SIM_FAIL_EVERY", "2")], "3");
    assert_eq!(lines[0]["level"], "EXCELLENT");
    assert_eq!(lines[1]["skipped"], true);
    assert!(lines[1]["error"].as_str().unwrap().contains("sensor unavailable"));
    assert_eq!(lines[2]["tick"], 3);
    assert_eq!(lines[2]["level"], "EXCELLENT");
    assert_eq!(lines[3]["summary"]["skipped"], 1);
}

#[test]
fn elevated_air_alerts_once_then_cools_down() {
    // (1.6 - 0.4) * 180 = 216 -> VERY BAD
    let lines = run_json(&[("PM25_SIM_VOLTAGE", "1.6")], "4");
    let alerts: Vec<_> = lines[..4].iter().map(|l| l["alert"].as_str().unwrap().to_owned()).collect();
    assert_eq!(alerts, ["sent", "cooling", "waiting", "waiting"]);
    assert_eq!(lines[0]["level"], "VERY BAD");
    assert_eq!(lines[1]["alert_state"], "armed_cooling");
    assert_eq!(lines[2]["alert_state"], "armed_waiting");
    assert_eq!(lines[4]["summary"]["alerts_sent"], 1);
}
