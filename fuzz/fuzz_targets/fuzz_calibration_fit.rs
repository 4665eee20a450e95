#![no_main]
use libfuzzer_sys::fuzz_target;
use pm25_config::{Calibration, CalibrationRow};

// Any accepted fit has a finite baseline and a positive finite scale.
fuzz_target!(|points: Vec<(f32, f32)>| {
    let rows = points
        .into_iter()
        .map(|(voltage, density)| CalibrationRow { voltage, density })
        .collect();
    if let Ok(cal) = Calibration::from_rows(rows) {
        assert!(cal.baseline_v.is_finite());
        assert!(cal.scale.is_finite() && cal.scale > 0.0);
    }
});
