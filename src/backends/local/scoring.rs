// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use serde_json::{Map, Value};

pub const POVERTY_INDEX: &str = "poverty_index";
pub const PROJECT_IMPACT: &str = "project_impact";
pub const ENVIRONMENTAL_SCORE: &str = "environmental_score";
pub const CORRUPTION_RISK: &str = "corruption_risk";

const POVERTY_WEIGHT: f64 = 0.4;
const IMPACT_WEIGHT: f64 = 0.3;
const ENVIRONMENT_WEIGHT: f64 = 0.2;
const GOVERNANCE_WEIGHT: f64 = 0.1;

const DEFAULT_METRIC: f64 = 0.5;
const DEFAULT_CORRUPTION_RISK: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            PriorityLevel::Critical
        } else if score >= 0.5 {
            PriorityLevel::High
        } else if score >= 0.3 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityLevel::Critical => "critical",
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
        }
    }
}

/// The four indicators the scorer understands. Absent indicators take
/// neutral defaults; any other metric is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicators {
    pub poverty_index: f64,
    pub project_impact: f64,
    pub environmental_score: f64,
    pub corruption_risk: f64,
}

impl Indicators {
    pub fn from_metrics(metrics: &Map<String, Value>) -> Self {
        let read = |key: &str, default: f64| metrics.get(key).and_then(Value::as_f64).unwrap_or(default);

        Self {
            poverty_index: read(POVERTY_INDEX, DEFAULT_METRIC),
            project_impact: read(PROJECT_IMPACT, DEFAULT_METRIC),
            environmental_score: read(ENVIRONMENTAL_SCORE, DEFAULT_METRIC),
            corruption_risk: read(CORRUPTION_RISK, DEFAULT_CORRUPTION_RISK),
        }
    }

    /// Weighted priority in `[0, 1]`. Governance counts inverted: lower
    /// corruption risk raises priority.
    pub fn priority_score(&self) -> f64 {
        let score = self.poverty_index * POVERTY_WEIGHT
            + self.project_impact * IMPACT_WEIGHT
            + self.environmental_score * ENVIRONMENT_WEIGHT
            + (1.0 - self.corruption_risk) * GOVERNANCE_WEIGHT;
        score.clamp(0.0, 1.0)
    }
}

/// Output of the allocation scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub priority_score: f64,
    pub priority_level: PriorityLevel,
    pub allocation_percentage: f64,
    pub confidence_score: f64,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn assess(indicators: &Indicators) -> Assessment {
    let score = indicators.priority_score();
    let level = PriorityLevel::from_score(score);
    let allocation = (score * 100.0).clamp(10.0, 100.0);

    Assessment {
        priority_score: round_to(score, 4),
        priority_level: level,
        allocation_percentage: round_to(allocation, 2),
        confidence_score: round_to(0.85 + score * 0.1, 2),
        key_findings: key_findings(indicators),
        recommendations: recommendations(allocation, indicators),
    }
}

pub fn percent(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn key_findings(m: &Indicators) -> Vec<String> {
    let mut findings = Vec::new();

    if m.poverty_index >= 0.7 {
        findings.push(format!(
            "High poverty rate detected ({}) - economic support needed",
            percent(m.poverty_index)
        ));
    }
    if m.project_impact >= 0.7 {
        findings.push(format!(
            "High project impact potential ({}) - investments will yield strong returns",
            percent(m.project_impact)
        ));
    }
    if m.environmental_score >= 0.7 {
        findings.push(format!(
            "Severe environmental degradation ({}) - conservation measures urgent",
            percent(m.environmental_score)
        ));
    }
    if m.corruption_risk >= 0.6 {
        findings.push(format!(
            "Elevated corruption risk ({}) - enhanced oversight required",
            percent(m.corruption_risk)
        ));
    } else if m.corruption_risk <= 0.3 {
        findings.push(format!(
            "Low corruption risk ({}) - favorable governance environment",
            percent(m.corruption_risk)
        ));
    }

    if findings.is_empty() {
        findings.push("Metrics indicate balanced conditions across all indicators".to_string());
    }
    findings
}

fn recommendations(allocation: f64, m: &Indicators) -> Vec<String> {
    let mut out: Vec<&str> = if allocation >= 70.0 {
        vec![
            "Allocate majority of available funds to this region",
            "Fast-track project approvals and implementation",
        ]
    } else if allocation >= 50.0 {
        vec![
            "Provide substantial funding allocation",
            "Implement standard monitoring protocols",
        ]
    } else {
        vec![
            "Provide moderate funding allocation",
            "Monitor for changing conditions",
        ]
    };

    if m.poverty_index >= 0.7 {
        out.push("Prioritize poverty alleviation programs");
        out.push("Implement cash transfer or social safety net schemes");
    }
    if m.project_impact >= 0.7 {
        out.push("Maximize investment in high-impact projects");
    }
    if m.environmental_score >= 0.7 {
        out.push("Include environmental restoration components");
        out.push("Engage local communities in conservation");
    }
    if m.corruption_risk >= 0.6 {
        out.push("Establish strong audit and oversight mechanisms");
        out.push("Use transparent digital payment systems");
    }

    out.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn indicators(value: Value) -> Indicators {
        match value {
            Value::Object(map) => Indicators::from_metrics(&map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_high_need_region_is_critical() {
        let m = indicators(json!({
            "poverty_index": 0.85,
            "project_impact": 0.90,
            "environmental_score": 0.75,
            "corruption_risk": 0.30
        }));

        let assessment = assess(&m);
        assert_eq!(assessment.priority_score, 0.83);
        assert_eq!(assessment.priority_level, PriorityLevel::Critical);
        assert_eq!(assessment.allocation_percentage, 83.0);
        assert_eq!(assessment.confidence_score, 0.93);
        assert_eq!(assessment.key_findings.len(), 4);
        assert!(assessment.key_findings[3].starts_with("Low corruption risk (30.0%)"));
        assert_eq!(
            assessment.recommendations[0],
            "Allocate majority of available funds to this region"
        );
    }

    #[test]
    fn test_missing_metrics_use_defaults() {
        let m = indicators(json!({}));
        assert_eq!(m.poverty_index, 0.5);
        assert_eq!(m.corruption_risk, 0.3);

        // 0.2 + 0.15 + 0.1 + 0.07
        let assessment = assess(&m);
        assert_eq!(assessment.priority_score, 0.52);
        assert_eq!(assessment.priority_level, PriorityLevel::High);
        assert_eq!(
            assessment.key_findings,
            vec!["Low corruption risk (30.0%) - favorable governance environment".to_string()]
        );
    }

    #[test]
    fn test_priority_levels_and_allocation_floor() {
        struct TestCase {
            score: f64,
            level: PriorityLevel,
        }

        let cases = vec![
            TestCase { score: 0.95, level: PriorityLevel::Critical },
            TestCase { score: 0.70, level: PriorityLevel::Critical },
            TestCase { score: 0.50, level: PriorityLevel::High },
            TestCase { score: 0.30, level: PriorityLevel::Medium },
            TestCase { score: 0.05, level: PriorityLevel::Low },
        ];
        for case in cases {
            assert_eq!(PriorityLevel::from_score(case.score), case.level, "score {}", case.score);
        }

        let low = assess(&indicators(json!({
            "poverty_index": 0.0,
            "project_impact": 0.0,
            "environmental_score": 0.0,
            "corruption_risk": 1.0
        })));
        assert_eq!(low.priority_score, 0.0);
        assert_eq!(low.allocation_percentage, 10.0);
        assert!(low.recommendations.contains(&"Use transparent digital payment systems".to_string()));
    }
}
