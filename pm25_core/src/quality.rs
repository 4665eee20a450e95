//! Air-quality classification on the PM2.5 AQI breakpoints.

use core::fmt;

/// Air-quality level, ordered by increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityLevel {
    Excellent,
    Good,
    Moderate,
    Unhealthy,
    VeryBad,
    Hazardous,
}

/// Inclusive upper bounds (µg/m³) for every level but the last.
const BREAKPOINTS: [(f32, QualityLevel); 5] = [
    (12.0, QualityLevel::Excellent),
    (35.4, QualityLevel::Good),
    (55.4, QualityLevel::Moderate),
    (150.4, QualityLevel::Unhealthy),
    (250.4, QualityLevel::VeryBad),
];

impl QualityLevel {
    pub const ALL: [QualityLevel; 6] = [
        QualityLevel::Excellent,
        QualityLevel::Good,
        QualityLevel::Moderate,
        QualityLevel::Unhealthy,
        QualityLevel::VeryBad,
        QualityLevel::Hazardous,
    ];

    /// Ordinal used in persisted records (1..=6).
    pub fn index(self) -> u8 {
        match self {
            QualityLevel::Excellent => 1,
            QualityLevel::Good => 2,
            QualityLevel::Moderate => 3,
            QualityLevel::Unhealthy => 4,
            QualityLevel::VeryBad => 5,
            QualityLevel::Hazardous => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityLevel::Excellent => "EXCELLENT",
            QualityLevel::Good => "GOOD",
            QualityLevel::Moderate => "MODERATE",
            QualityLevel::Unhealthy => "UNHEALTHY",
            QualityLevel::VeryBad => "VERY BAD",
            QualityLevel::Hazardous => "HAZARDOUS!",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            QualityLevel::Excellent => "★★★★★",
            QualityLevel::Good => "★★★★☆",
            QualityLevel::Moderate => "★★★☆☆",
            QualityLevel::Unhealthy => "★★☆☆☆",
            QualityLevel::VeryBad => "★☆☆☆☆",
            QualityLevel::Hazardous => "☠☠☠",
        }
    }

    /// Recommendation appended to alert messages; empty below UNHEALTHY.
    pub fn advice(self) -> &'static str {
        match self {
            QualityLevel::Unhealthy => "Avoid prolonged outdoor activity.",
            QualityLevel::VeryBad => "Stay indoors and keep windows closed.",
            QualityLevel::Hazardous => "Stay indoors only!",
            _ => "",
        }
    }

    /// Levels that warrant an alert.
    pub fn is_alerting(self) -> bool {
        self >= QualityLevel::Unhealthy
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a smoothed density. Boundaries belong to the lower bucket.
///
/// Total over all inputs: NaN fails every comparison and lands in
/// `Hazardous`, negative values land in `Excellent`.
pub fn classify(density: f32) -> (QualityLevel, &'static str) {
    let level = BREAKPOINTS
        .iter()
        .find(|(upper, _)| density <= *upper)
        .map_or(QualityLevel::Hazardous, |(_, level)| *level);
    (level, level.glyph())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_map_to_lower_bucket() {
        assert_eq!(classify(12.0).0, QualityLevel::Excellent);
        assert_eq!(classify(35.4).0, QualityLevel::Good);
        assert_eq!(classify(55.4).0, QualityLevel::Moderate);
        assert_eq!(classify(150.4).0, QualityLevel::Unhealthy);
        assert_eq!(classify(250.4).0, QualityLevel::VeryBad);
    }

    #[test]
    fn just_above_boundaries_moves_up() {
        assert_eq!(classify(12.01).0, QualityLevel::Good);
        assert_eq!(classify(35.41).0, QualityLevel::Moderate);
        assert_eq!(classify(55.41).0, QualityLevel::Unhealthy);
        assert_eq!(classify(150.41).0, QualityLevel::VeryBad);
        assert_eq!(classify(250.41).0, QualityLevel::Hazardous);
    }

    #[test]
    fn index_matches_ordinal() {
        for (i, level) in QualityLevel::ALL.iter().enumerate() {
            assert_eq!(usize::from(level.index()), i + 1);
        }
    }

    #[test]
    fn only_unhealthy_and_above_alert() {
        let alerting: Vec<_> = QualityLevel::ALL
            .iter()
            .filter(|l| l.is_alerting())
            .copied()
            .collect();
        assert_eq!(
            alerting,
            vec![
                QualityLevel::Unhealthy,
                QualityLevel::VeryBad,
                QualityLevel::Hazardous
            ]
        );
        assert!(QualityLevel::Moderate.advice().is_empty());
        assert!(!QualityLevel::Hazardous.advice().is_empty());
    }

    #[test]
    fn nan_is_worst_case() {
        assert_eq!(classify(f32::NAN).0, QualityLevel::Hazardous);
    }
}
