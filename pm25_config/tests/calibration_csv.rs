use std::fs::File;
use std::io::Write;

use pm25_config::{Calibration, CalibrationRow, load_calibration_csv};
use rstest::rstest;
use tempfile::tempdir;

#[rstest]
fn calibration_from_rows_two_points() {
    let rows = vec![
        CalibrationRow {
            voltage: 0.5,
            density: 0.0,
        },
        CalibrationRow {
            voltage: 1.5,
            density: 200.0,
        },
    ];
    let c = Calibration::from_rows(rows).unwrap();
    assert!((c.scale - 200.0).abs() < 1e-3);
    assert!((c.baseline_v - 0.5).abs() < 1e-5);
}

#[rstest]
fn calibration_negative_baseline_is_allowed() {
    // Second board revision: zero dust reads below ground.
    let rows = vec![
        CalibrationRow {
            voltage: 0.0,
            density: 30.6,
        },
        CalibrationRow {
            voltage: 1.0,
            density: 210.6,
        },
    ];
    let c = Calibration::from_rows(rows).unwrap();
    assert!((c.scale - 180.0).abs() < 1e-3);
    assert!((c.baseline_v + 0.17).abs() < 1e-4, "baseline {}", c.baseline_v);
}

#[rstest]
fn calibration_rejects_negative_density() {
    let rows = vec![
        CalibrationRow {
            voltage: 0.5,
            density: -1.0,
        },
        CalibrationRow {
            voltage: 1.0,
            density: 10.0,
        },
    ];
    let err = Calibration::from_rows(rows).expect_err("negative density");
    assert!(format!("{err}").contains("negative density"));
}

#[rstest]
fn loads_csv_with_expected_headers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cal.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "voltage, density").unwrap();
    writeln!(f, "0.40, 0.0").unwrap();
    writeln!(f, "0.90, 90.0").unwrap();
    writeln!(f, "1.40, 180.0").unwrap();
    drop(f);

    let c = load_calibration_csv(&path).expect("load");
    assert!((c.scale - 180.0).abs() < 1e-2);
    assert!((c.baseline_v - 0.4).abs() < 1e-4);
}

#[rstest]
#[case("raw,grams")]
#[case("density,voltage")]
#[case("voltage")]
fn rejects_wrong_headers(#[case] header: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cal.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "{header}").unwrap();
    writeln!(f, "0.4,0.0").unwrap();
    drop(f);

    let err = load_calibration_csv(&path).expect_err("bad header");
    assert!(
        format!("{err}").contains("calibration CSV must have headers"),
        "got: {err}"
    );
}

#[rstest]
fn reports_bad_row_with_line_number() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cal.csv");
    let mut f = File::create(&path).unwrap();
    writeln!(f, "voltage,density").unwrap();
    writeln!(f, "0.4,0.0").unwrap();
    writeln!(f, "abc,1.0").unwrap();
    drop(f);

    let err = load_calibration_csv(&path).expect_err("bad row");
    assert!(format!("{err}").contains("invalid CSV row 3"), "got: {err}");
}

#[rstest]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = load_calibration_csv(&dir.path().join("nope.csv")).expect_err("missing");
    assert!(format!("{err}").contains("open calibration CSV"));
}
