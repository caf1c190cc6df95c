// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use super::scoring::{percent, Assessment, Indicators, PriorityLevel};

/// Narrative account of an allocation decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub explanation: String,
    pub key_points: Vec<String>,
    pub suggested_actions: Vec<String>,
    pub confidence_score: f64,
}

pub fn explain(
    region_id: &str,
    indicators: &Indicators,
    assessment: &Assessment,
    context: Option<&str>,
) -> Explanation {
    let region = if region_id.is_empty() { "this region" } else { region_id };
    let (label, urgency) = match assessment.priority_level {
        PriorityLevel::Critical => ("CRITICAL", "immediate"),
        PriorityLevel::High => ("HIGH", "substantial"),
        PriorityLevel::Medium => ("MEDIUM", "moderate"),
        PriorityLevel::Low => ("LOW", "baseline"),
    };

    let mut explanation = format!(
        "{} has been assigned a {} priority level with a priority score of {}, \
         which results in a recommended budget allocation of {:.1}%. \
         This {} allocation is recommended to address the identified needs.",
        region,
        label,
        percent(assessment.priority_score),
        assessment.allocation_percentage,
        urgency,
    );
    if let Some(context) = context.filter(|c| !c.trim().is_empty()) {
        explanation.push_str(&format!(" Context considered: {}", context.trim()));
    }

    Explanation {
        explanation,
        key_points: key_points(indicators),
        suggested_actions: suggested_actions(assessment.priority_score, indicators),
        confidence_score: assessment.confidence_score,
    }
}

fn key_points(m: &Indicators) -> Vec<String> {
    let describe = |value: f64, high: f64, above: &str, below: &str| {
        if value > high {
            above.to_string()
        } else {
            below.to_string()
        }
    };

    vec![
        format!(
            "Poverty index {}: {}",
            percent(m.poverty_index),
            describe(m.poverty_index, 0.6, "high poverty levels require economic support", "moderate poverty conditions")
        ),
        format!(
            "Project impact {}: {}",
            percent(m.project_impact),
            describe(m.project_impact, 0.6, "strong potential for positive outcomes", "moderate impact expected")
        ),
        format!(
            "Environmental factors {}: {}",
            percent(m.environmental_score),
            describe(m.environmental_score, 0.6, "significant environmental challenges", "manageable environmental conditions")
        ),
        format!(
            "Governance risk {}: {}",
            percent(m.corruption_risk),
            describe(m.corruption_risk, 0.5, "enhanced oversight required", "good governance environment")
        ),
    ]
}

fn suggested_actions(score: f64, m: &Indicators) -> Vec<String> {
    let mut actions = if score > 0.7 {
        vec![
            "Prioritize immediate fund disbursement",
            "Establish monitoring framework for impact assessment",
        ]
    } else if score > 0.4 {
        vec![
            "Schedule quarterly review of allocation effectiveness",
            "Consider partnerships to maximize impact",
        ]
    } else {
        vec![
            "Explore alternative funding sources",
            "Focus on capacity building before major investments",
        ]
    };

    if m.corruption_risk > 0.5 {
        actions.push("Implement enhanced oversight and audit procedures");
    }

    actions.truncate(3);
    actions.into_iter().map(String::from).collect()
}
