//! Compliance area scoring
//!
//! Converts raw `score / max_score` pairs into whole percentages and a
//! three-level band for display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::ComplianceArea;

/// Lowest percentage rated [`ScoreBand::Good`]
pub const GOOD_THRESHOLD: u32 = 90;

/// Lowest percentage rated [`ScoreBand::Warning`]
pub const WARNING_THRESHOLD: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Good,
    Warning,
    Critical,
}

impl ScoreBand {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= GOOD_THRESHOLD {
            ScoreBand::Good
        } else if percentage >= WARNING_THRESHOLD {
            ScoreBand::Warning
        } else {
            ScoreBand::Critical
        }
    }
}

/// Scored view of one compliance area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaScore {
    pub area_id: String,
    pub area_name: String,
    pub percentage: u32,
    pub band: ScoreBand,
    pub last_assessment: Option<NaiveDate>,
}

/// `round(score / max_score * 100)`, or 0 when `max_score` is not positive
///
/// Negative and non-finite results clamp to 0.
pub fn score_percentage(score: f64, max_score: f64) -> u32 {
    if max_score <= 0.0 {
        return 0;
    }
    let pct = (score / max_score * 100.0).round();
    if pct.is_finite() && pct > 0.0 {
        pct as u32
    } else {
        0
    }
}

impl From<&ComplianceArea> for AreaScore {
    fn from(area: &ComplianceArea) -> Self {
        let percentage = score_percentage(area.score, area.max_score);
        Self {
            area_id: area.id.clone(),
            area_name: area.area_name.clone(),
            percentage,
            band: ScoreBand::for_percentage(percentage),
            last_assessment: area.last_assessment,
        }
    }
}

/// Score every area, preserving input order
pub fn score_areas(areas: &[ComplianceArea]) -> Vec<AreaScore> {
    areas.iter().map(AreaScore::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_to_nearest() {
        assert_eq!(score_percentage(45.0, 50.0), 90);
        assert_eq!(score_percentage(2.0, 3.0), 67);
        assert_eq!(score_percentage(1.0, 3.0), 33);
        assert_eq!(score_percentage(50.0, 50.0), 100);
    }

    #[test]
    fn test_percentage_zero_max_score() {
        assert_eq!(score_percentage(10.0, 0.0), 0);
        assert_eq!(score_percentage(10.0, -5.0), 0);
    }

    #[test]
    fn test_percentage_negative_score_clamps() {
        assert_eq!(score_percentage(-10.0, 50.0), 0);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(ScoreBand::for_percentage(100), ScoreBand::Good);
        assert_eq!(ScoreBand::for_percentage(90), ScoreBand::Good);
        assert_eq!(ScoreBand::for_percentage(89), ScoreBand::Warning);
        assert_eq!(ScoreBand::for_percentage(80), ScoreBand::Warning);
        assert_eq!(ScoreBand::for_percentage(79), ScoreBand::Critical);
        assert_eq!(ScoreBand::for_percentage(0), ScoreBand::Critical);
    }

    #[test]
    fn test_score_areas_preserves_order() {
        let areas = vec![
            ComplianceArea {
                id: "a".to_string(),
                area_name: "Document Control".to_string(),
                score: 45.0,
                max_score: 50.0,
                ..Default::default()
            },
            ComplianceArea {
                id: "b".to_string(),
                area_name: "Supplier Management".to_string(),
                score: 30.0,
                max_score: 50.0,
                ..Default::default()
            },
        ];

        let scores = score_areas(&areas);
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].area_name, "Document Control");
        assert_eq!(scores[0].band, ScoreBand::Good);
        assert_eq!(scores[1].percentage, 60);
        assert_eq!(scores[1].band, ScoreBand::Critical);
    }
}
