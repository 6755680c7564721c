use super::config::ScoringTable;
use crate::records::{Report, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusKind {
    Steps,
    ReproCmds,
}

impl BonusKind {
    pub fn label(&self) -> &'static str {
        match self {
            BonusKind::Steps => "Reproduction steps",
            BonusKind::ReproCmds => "Reproduction commands",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusContribution {
    pub kind: BonusKind,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32,
    /// `None` when the report's severity is outside the known set.
    pub severity: Option<Severity>,
    pub base: u32,
    pub bonuses: Vec<BonusContribution>,
}

impl ScoreResult {
    pub fn quality_points(&self) -> u32 {
        self.bonuses
            .iter()
            .fold(0u32, |total, b| total.saturating_add(b.points))
    }
}

/// Score one report: severity weight plus one quality bonus each for
/// non-empty `steps` and non-empty `repro_cmds`.
pub fn calculate_score(report: &Report, table: &ScoringTable) -> ScoreResult {
    let severity = report.severity_level();
    let base = severity.map(|s| table.weight(s)).unwrap_or(0);

    let mut bonuses = Vec::new();
    if report.has_steps() {
        bonuses.push(BonusContribution {
            kind: BonusKind::Steps,
            points: table.quality_bonus,
        });
    }
    if report.has_repro_cmds() {
        bonuses.push(BonusContribution {
            kind: BonusKind::ReproCmds,
            points: table.quality_bonus,
        });
    }

    // Weights come from user config, so clamp rather than overflow.
    let mut result = ScoreResult {
        score: 0,
        severity,
        base,
        bonuses,
    };
    result.score = base.saturating_add(result.quality_points());
    result
}

pub fn score(report: &Report, table: &ScoringTable) -> u32 {
    calculate_score(report, table).score
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report(severity: &str) -> Report {
        serde_json::from_value(json!({
            "id": "r1",
            "author_github": "alice",
            "type": "bug",
            "severity": severity,
            "impact": "crash",
            "submitted_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn with_quality(mut report: Report) -> Report {
        report
            .extra
            .insert("steps".into(), json!(["open settings", "paste payload"]));
        report
            .extra
            .insert("repro_cmds".into(), json!(["curl -d @payload.json /api"]));
        report
    }

    #[test]
    fn test_base_weights_only() {
        let table = ScoringTable::default();
        for (severity, expected) in [("Critical", 10), ("High", 6), ("Medium", 3), ("Low", 1)] {
            let result = calculate_score(&sample_report(severity), &table);
            assert_eq!(result.score, expected, "severity {}", severity);
            assert!(result.bonuses.is_empty());
        }
    }

    #[test]
    fn test_both_quality_bonuses() {
        let table = ScoringTable::default();
        for (severity, weight) in [("Critical", 10), ("High", 6), ("Medium", 3), ("Low", 1)] {
            let report = with_quality(sample_report(severity));
            assert_eq!(score(&report, &table), weight + 2);
        }
    }

    #[test]
    fn test_single_quality_bonus() {
        let mut report = sample_report("High");
        report.extra.insert("steps".into(), json!(["a"]));
        let result = calculate_score(&report, &ScoringTable::default());
        assert_eq!(result.score, 7);
        assert_eq!(result.bonuses.len(), 1);
        assert_eq!(result.bonuses[0].kind, BonusKind::Steps);
        assert_eq!(result.quality_points(), 1);
    }

    #[test]
    fn test_empty_sequences_earn_nothing() {
        let mut report = sample_report("Low");
        report.extra.insert("steps".into(), json!([]));
        report.extra.insert("repro_cmds".into(), json!([]));
        assert_eq!(score(&report, &ScoringTable::default()), 1);
    }

    #[test]
    fn test_unknown_severity_scores_bonuses_only() {
        let table = ScoringTable::default();
        let result = calculate_score(&sample_report("Informational"), &table);
        assert_eq!(result.score, 0);
        assert!(result.severity.is_none());

        let report = with_quality(sample_report("Informational"));
        assert_eq!(score(&report, &table), 2);
    }

    #[test]
    fn test_first_report_bonus_not_applied() {
        let table = ScoringTable {
            first_report_bonus: 50,
            ..ScoringTable::default()
        };
        assert_eq!(score(&sample_report("Medium"), &table), 3);
    }

    #[test]
    fn test_custom_table() {
        let table = ScoringTable {
            high: 8,
            quality_bonus: 3,
            ..ScoringTable::default()
        };
        let mut report = sample_report("High");
        report.extra.insert("repro_cmds".into(), json!(["make repro"]));
        assert_eq!(score(&report, &table), 11);
    }

    #[test]
    fn test_huge_weights_saturate() {
        let table = ScoringTable {
            critical: u32::MAX,
            quality_bonus: u32::MAX,
            ..ScoringTable::default()
        };
        let result = calculate_score(&with_quality(sample_report("Critical")), &table);
        assert_eq!(result.base, u32::MAX);
        assert_eq!(result.quality_points(), u32::MAX);
        assert_eq!(result.score, u32::MAX);
    }
}
