//! Voltage -> dust density conversion.

/// Linear calibration: density = (voltage - baseline_v) * scale, floored at 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Sensor output at zero dust (V)
    pub baseline_v: f32,
    /// µg/m³ per volt above baseline
    pub scale: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            baseline_v: 0.4,
            scale: 180.0,
        }
    }
}

impl Calibration {
    pub fn to_density(&self, voltage: f32) -> f32 {
        estimate(voltage, self.baseline_v, self.scale)
    }
}

/// Dust density in µg/m³. Readings at or below the baseline (the sensor's
/// noise floor) and non-finite results map to 0; never negative.
#[inline]
pub fn estimate(voltage: f32, baseline: f32, scale: f32) -> f32 {
    let d = (voltage - baseline) * scale;
    if d.is_finite() && d > 0.0 { d } else { 0.0 }
}
