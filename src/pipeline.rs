use serde::Serialize;

use crate::claims::{AnalysisError, ClaimsTable};
use crate::config::EngineConfig;
use crate::recommend::{RecommendationSet, generate_recommendations};
use crate::risk::{RiskScore, calculate_risk_score};
use crate::summary::{Summary, calculate_summary};

/// The caller-owned result bundle of one analysis run. Immutable once
/// returned and safe to cache for the session; a changed claims table
/// means a fresh `run_analysis`, never in-place mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub risk_score: RiskScore,
    pub recommendations: RecommendationSet,
}

/// Full pipeline in fixed order: summary → risk score → recommendations.
pub fn run_analysis(
    claims: &ClaimsTable,
    config: &EngineConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let summary = calculate_summary(claims)?;
    let risk_score = calculate_risk_score(claims, &summary, &config.risk)?;
    let recommendations = generate_recommendations(claims, &summary, config)?;
    Ok(AnalysisReport { summary, risk_score, recommendations })
}
