//! KPI aggregation for the compliance dashboard
//!
//! Turns the four record sets of one project (compliance metrics, CAPAs,
//! training records, audits) into a [`KpiSummary`]. The computation is pure:
//! no I/O, no shared state, identical output for identical input. The
//! current date is an explicit argument so overdue determination stays
//! reproducible.
//!
//! # Findings breakdown
//!
//! `findings.major/minor/opportunities` are a fixed 30% / 35% / remainder
//! split of the summed `findings_count`, not a tally of finding severities.
//! [`SeverityCounts`] provides the real per-audit tally separately.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::models::{Audit, AuditFinding, Capa, ComplianceMetric, TrainingRecord};
use crate::db::models::METRIC_OVERALL_COMPLIANCE;

/// Compliance target used when no overall compliance metric is recorded
pub const DEFAULT_COMPLIANCE_TARGET: f64 = 95.0;

/// Training completion target
pub const DEFAULT_TRAINING_TARGET: f64 = 95.0;

/// Placeholder month-over-month compliance change.
///
/// Not derived from any historical series.
pub const DEFAULT_COMPLIANCE_CHANGE: f64 = 1.2;

/// Percent of total findings reported as major
const MAJOR_FINDINGS_PERCENT: i64 = 30;

/// Percent of total findings reported as minor
const MINOR_FINDINGS_PERCENT: i64 = 35;

/// Tunable constants of the aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KpiSettings {
    /// Reported as `compliance.change`; sign decides the trend
    pub compliance_change: f64,
    /// Target when no `overall_compliance` metric (or its target) exists
    pub default_compliance_target: f64,
    /// Reported as `training.target`
    pub training_target: f64,
}

impl Default for KpiSettings {
    fn default() -> Self {
        Self {
            compliance_change: DEFAULT_COMPLIANCE_CHANGE,
            default_compliance_target: DEFAULT_COMPLIANCE_TARGET,
            training_target: DEFAULT_TRAINING_TARGET,
        }
    }
}

/// Borrowed view of one project's record sets
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordSets<'a> {
    pub metrics: &'a [ComplianceMetric],
    pub capas: &'a [Capa],
    pub training_records: &'a [TrainingRecord],
    pub audits: &'a [Audit],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceKpi {
    pub rate: f64,
    pub target: f64,
    pub change: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapaKpi {
    pub open: u64,
    pub overdue: u64,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingKpi {
    /// Completion percentage in `0..=100`
    pub rate: f64,
    pub target: f64,
    pub completed: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingsBreakdown {
    pub major: u64,
    pub minor: u64,
    pub opportunities: u64,
    pub total: u64,
}

impl FindingsBreakdown {
    /// Split `total` into floor(30%) major, floor(35%) minor and the
    /// remainder as opportunities.
    ///
    /// Integer arithmetic keeps the floors exact, so the three buckets always
    /// sum to `total`. Never overflows, whatever the total.
    pub fn from_total(total: u64) -> Self {
        let major = percent_floor(total, MAJOR_FINDINGS_PERCENT as u64);
        let minor = percent_floor(total, MINOR_FINDINGS_PERCENT as u64);
        Self {
            major,
            minor,
            opportunities: total - major - minor,
            total,
        }
    }
}

/// `floor(total * percent / 100)` split into hundreds and remainder
fn percent_floor(total: u64, percent: u64) -> u64 {
    total / 100 * percent + total % 100 * percent / 100
}

/// Dashboard KPI summary for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub compliance: ComplianceKpi,
    pub capas: CapaKpi,
    pub training: TrainingKpi,
    pub findings: FindingsBreakdown,
}

/// Aggregate one project's record sets into a [`KpiSummary`]
///
/// Never fails: empty sets yield zero counts and a 0% training rate, and
/// negative `findings_count` values are counted as zero.
pub fn summarize(records: RecordSets<'_>, today: NaiveDate, settings: &KpiSettings) -> KpiSummary {
    KpiSummary {
        compliance: compliance_kpi(records.metrics, settings),
        capas: capa_kpi(records.capas, today),
        training: training_kpi(records.training_records, settings),
        findings: findings_kpi(records.audits),
    }
}

fn compliance_kpi(metrics: &[ComplianceMetric], settings: &KpiSettings) -> ComplianceKpi {
    // First match in source order wins
    let overall = metrics
        .iter()
        .find(|m| m.metric_type == METRIC_OVERALL_COMPLIANCE);

    let (rate, target) = match overall {
        Some(metric) => (
            metric.value,
            metric
                .target_value
                .unwrap_or(settings.default_compliance_target),
        ),
        None => (0.0, settings.default_compliance_target),
    };

    let change = settings.compliance_change;
    ComplianceKpi {
        rate,
        target,
        change,
        trend: if change > 0.0 { Trend::Up } else { Trend::Down },
    }
}

fn capa_kpi(capas: &[Capa], today: NaiveDate) -> CapaKpi {
    CapaKpi {
        open: capas.iter().filter(|c| c.is_open()).count() as u64,
        overdue: capas.iter().filter(|c| c.is_overdue(today)).count() as u64,
        total: capas.len() as u64,
    }
}

fn training_kpi(records: &[TrainingRecord], settings: &KpiSettings) -> TrainingKpi {
    let completed = records.iter().filter(|t| t.is_completed()).count() as u64;
    let total = records.len() as u64;

    TrainingKpi {
        rate: completed as f64 / total.max(1) as f64 * 100.0,
        target: settings.training_target,
        completed,
        total,
    }
}

fn findings_kpi(audits: &[Audit]) -> FindingsBreakdown {
    let total = audits
        .iter()
        .map(|a| a.findings_count.max(0) as u64)
        .fold(0u64, u64::saturating_add);
    FindingsBreakdown::from_total(total)
}

/// Severity tally over real finding records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub major: u64,
    pub minor: u64,
    pub opportunity: u64,
    /// Severities outside the three known classes
    pub other: u64,
    pub total: u64,
}

impl SeverityCounts {
    /// Count findings by `severity` (case-insensitive)
    pub fn tally(findings: &[AuditFinding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity.trim().to_ascii_lowercase().as_str() {
                "major" => counts.major += 1,
                "minor" => counts.minor += 1,
                "opportunity" | "observation" => counts.opportunity += 1,
                _ => counts.other += 1,
            }
            counts.total += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::CAPA_STATUS_OPEN;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-06-15")
    }

    fn capa(status: &str, due: Option<&str>) -> Capa {
        Capa {
            status: status.to_string(),
            due_date: due.map(date),
            ..Default::default()
        }
    }

    fn training(status: &str) -> TrainingRecord {
        TrainingRecord {
            status: status.to_string(),
            ..Default::default()
        }
    }

    fn audit(findings_count: i64) -> Audit {
        Audit {
            findings_count,
            ..Default::default()
        }
    }

    fn metric(metric_type: &str, value: f64, target_value: Option<f64>) -> ComplianceMetric {
        ComplianceMetric {
            metric_type: metric_type.to_string(),
            value,
            target_value,
            ..Default::default()
        }
    }

    fn summarize_default(records: RecordSets<'_>) -> KpiSummary {
        summarize(records, today(), &KpiSettings::default())
    }

    #[test]
    fn test_empty_record_sets() {
        let summary = summarize_default(RecordSets::default());

        assert_eq!(summary.compliance.rate, 0.0);
        assert_eq!(summary.compliance.target, 95.0);
        assert_eq!(summary.compliance.change, 1.2);
        assert_eq!(summary.compliance.trend, Trend::Up);
        assert_eq!(summary.capas, CapaKpi { open: 0, overdue: 0, total: 0 });
        assert_eq!(summary.training.rate, 0.0);
        assert_eq!(summary.training.total, 0);
        assert_eq!(summary.training.target, 95.0);
        assert_eq!(summary.findings, FindingsBreakdown::from_total(0));
    }

    #[test]
    fn test_overall_compliance_metric_is_used() {
        let metrics = vec![
            metric("training_completion", 50.0, Some(90.0)),
            metric(METRIC_OVERALL_COMPLIANCE, 92.5, Some(97.0)),
        ];
        let summary = summarize_default(RecordSets {
            metrics: &metrics,
            ..Default::default()
        });

        assert_eq!(summary.compliance.rate, 92.5);
        assert_eq!(summary.compliance.target, 97.0);
    }

    #[test]
    fn test_first_overall_compliance_metric_wins() {
        let metrics = vec![
            metric(METRIC_OVERALL_COMPLIANCE, 80.0, Some(90.0)),
            metric(METRIC_OVERALL_COMPLIANCE, 99.0, Some(99.0)),
        ];
        let summary = summarize_default(RecordSets {
            metrics: &metrics,
            ..Default::default()
        });

        assert_eq!(summary.compliance.rate, 80.0);
        assert_eq!(summary.compliance.target, 90.0);
    }

    #[test]
    fn test_metric_type_match_is_exact() {
        let metrics = vec![metric("Overall_Compliance", 70.0, Some(80.0))];
        let summary = summarize_default(RecordSets {
            metrics: &metrics,
            ..Default::default()
        });

        assert_eq!(summary.compliance.rate, 0.0);
        assert_eq!(summary.compliance.target, 95.0);
    }

    #[test]
    fn test_missing_target_value_falls_back_to_default() {
        let metrics = vec![metric(METRIC_OVERALL_COMPLIANCE, 88.0, None)];
        let summary = summarize_default(RecordSets {
            metrics: &metrics,
            ..Default::default()
        });

        assert_eq!(summary.compliance.rate, 88.0);
        assert_eq!(summary.compliance.target, 95.0);
    }

    #[test]
    fn test_trend_follows_configured_change() {
        let settings = KpiSettings {
            compliance_change: -0.5,
            ..Default::default()
        };
        let summary = summarize(RecordSets::default(), today(), &settings);
        assert_eq!(summary.compliance.change, -0.5);
        assert_eq!(summary.compliance.trend, Trend::Down);

        let settings = KpiSettings {
            compliance_change: 0.0,
            ..Default::default()
        };
        let summary = summarize(RecordSets::default(), today(), &settings);
        assert_eq!(summary.compliance.trend, Trend::Down);
    }

    #[test]
    fn test_capa_scenario_open_overdue_total() {
        let capas = vec![
            capa(CAPA_STATUS_OPEN, Some("2020-01-01")),
            capa(CAPA_STATUS_OPEN, None),
            capa("closed", Some("2020-01-01")),
        ];
        let summary = summarize_default(RecordSets {
            capas: &capas,
            ..Default::default()
        });

        assert_eq!(summary.capas, CapaKpi { open: 2, overdue: 1, total: 3 });
    }

    #[test]
    fn test_capa_counts_are_order_independent() {
        let mut capas = vec![
            capa("in_progress", Some("2019-03-01")),
            capa(CAPA_STATUS_OPEN, Some("2024-06-14")),
            capa(CAPA_STATUS_OPEN, Some("2024-06-15")),
            capa(CAPA_STATUS_OPEN, Some("2024-06-16")),
            capa(CAPA_STATUS_OPEN, None),
            capa("closed", None),
        ];
        let forward = summarize_default(RecordSets {
            capas: &capas,
            ..Default::default()
        });
        capas.reverse();
        let backward = summarize_default(RecordSets {
            capas: &capas,
            ..Default::default()
        });

        assert_eq!(forward.capas, backward.capas);
        assert_eq!(forward.capas, CapaKpi { open: 4, overdue: 1, total: 6 });
    }

    #[test]
    fn test_overdue_never_exceeds_open() {
        let statuses = ["open", "closed", "in_progress", "open"];
        let dues = [None, Some("2000-01-01"), Some("2030-01-01")];

        let mut capas = Vec::new();
        for status in statuses {
            for due in dues {
                capas.push(capa(status, due));
                let summary = summarize_default(RecordSets {
                    capas: &capas,
                    ..Default::default()
                });
                assert!(summary.capas.overdue <= summary.capas.open);
                assert_eq!(summary.capas.total, capas.len() as u64);
            }
        }
    }

    #[test]
    fn test_training_rate() {
        let records = vec![
            training("completed"),
            training("completed"),
            training("pending"),
            training("overdue"),
        ];
        let summary = summarize_default(RecordSets {
            training_records: &records,
            ..Default::default()
        });

        assert_eq!(summary.training.completed, 2);
        assert_eq!(summary.training.total, 4);
        assert_eq!(summary.training.rate, 50.0);
    }

    #[test]
    fn test_training_rate_all_completed() {
        let records = vec![training("completed"); 3];
        let summary = summarize_default(RecordSets {
            training_records: &records,
            ..Default::default()
        });

        assert_eq!(summary.training.rate, 100.0);
    }

    #[test]
    fn test_findings_scenario_twenty() {
        let audits = vec![audit(10), audit(10)];
        let summary = summarize_default(RecordSets {
            audits: &audits,
            ..Default::default()
        });

        assert_eq!(
            summary.findings,
            FindingsBreakdown { major: 6, minor: 7, opportunities: 7, total: 20 }
        );
    }

    #[test]
    fn test_findings_breakdown_ten() {
        assert_eq!(
            FindingsBreakdown::from_total(10),
            FindingsBreakdown { major: 3, minor: 3, opportunities: 4, total: 10 }
        );
    }

    #[test]
    fn test_findings_breakdown_always_sums_to_total() {
        for total in 0..2_000u64 {
            let b = FindingsBreakdown::from_total(total);
            assert_eq!(b.major + b.minor + b.opportunities, total, "total={}", total);
            assert_eq!(b.major, total * 3 / 10);
            assert_eq!(b.minor, total * 7 / 20);
        }
    }

    #[test]
    fn test_findings_breakdown_huge_totals() {
        for total in [u64::MAX, u64::MAX - 1, u64::MAX / 2, 600_000_000_000_000_000] {
            let b = FindingsBreakdown::from_total(total);
            assert_eq!(b.major, (total as u128 * 30 / 100) as u64, "total={}", total);
            assert_eq!(b.minor, (total as u128 * 35 / 100) as u64, "total={}", total);
            assert_eq!(b.major + b.minor + b.opportunities, total);
        }
    }

    #[test]
    fn test_findings_total_saturates() {
        let audits = vec![audit(600_000_000_000_000_000)];
        let summary = summarize_default(RecordSets {
            audits: &audits,
            ..Default::default()
        });
        assert_eq!(summary.findings.total, 600_000_000_000_000_000);
        assert_eq!(summary.findings.major, 180_000_000_000_000_000);

        let audits = vec![audit(i64::MAX), audit(i64::MAX), audit(i64::MAX)];
        let summary = summarize_default(RecordSets {
            audits: &audits,
            ..Default::default()
        });
        assert_eq!(summary.findings.total, u64::MAX);
        let f = summary.findings;
        assert_eq!(f.major + f.minor + f.opportunities, u64::MAX);
    }

    #[test]
    fn test_negative_findings_count_is_ignored() {
        let audits = vec![audit(-5), audit(4)];
        let summary = summarize_default(RecordSets {
            audits: &audits,
            ..Default::default()
        });

        assert_eq!(summary.findings.total, 4);
    }

    #[test]
    fn test_summary_serializes_with_dashboard_field_names() {
        let summary = summarize_default(RecordSets::default());
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["compliance"]["trend"], "up");
        assert!(json["capas"]["overdue"].is_u64());
        assert!(json["training"]["rate"].is_number());
        assert!(json["findings"]["opportunities"].is_u64());
    }

    #[test]
    fn test_severity_tally() {
        let findings: Vec<AuditFinding> = ["major", "Minor", "opportunity", "minor", "critical"]
            .iter()
            .map(|s| AuditFinding {
                severity: s.to_string(),
                ..Default::default()
            })
            .collect();

        let counts = SeverityCounts::tally(&findings);
        assert_eq!(
            counts,
            SeverityCounts { major: 1, minor: 2, opportunity: 1, other: 1, total: 5 }
        );
    }
}
