use serde::Serialize;

use crate::claims::{AnalysisError, ClaimsTable};
use crate::config::RiskBenchmarks;
use crate::summary::{REQUIRED_COLUMNS, Summary, calculate_summary};
use crate::types::RiskLevel;

/// Ceiling of each individual factor; four factors cap the total at 100.
pub const MAX_FACTOR: u8 = 25;

/// Composite portfolio risk score: four independent factors, each in
/// [0, 25], summed into a 0–100 total and banded into a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskScore {
    pub total_score: u8,
    pub level: RiskLevel,
    pub severity: u8,
    pub frequency: u8,
    pub open_rate: u8,
    pub lag: u8,
}

impl RiskScore {
    /// Named factor breakdown in display order.
    pub fn factors(&self) -> [(&'static str, u8); 4] {
        [
            ("severity", self.severity),
            ("frequency", self.frequency),
            ("open_rate", self.open_rate),
            ("lag", self.lag),
        ]
    }
}

/// Scale an observed value against its benchmark onto [0, MAX_FACTOR].
/// Monotonic in `observed`, saturating at the ceiling.
fn factor(observed: f64, benchmark: f64) -> u8 {
    if benchmark <= 0.0 || observed <= 0.0 {
        return 0;
    }
    let scaled = (observed / benchmark) * MAX_FACTOR as f64;
    scaled.round().min(MAX_FACTOR as f64) as u8
}

/// Score the portfolio from its summary. Pure and deterministic; the
/// benchmarks are business-parameter calibration, not derived from data.
pub fn calculate_risk_score(
    claims: &ClaimsTable,
    summary: &Summary,
    benchmarks: &RiskBenchmarks,
) -> Result<RiskScore, AnalysisError> {
    claims.require_columns(&REQUIRED_COLUMNS)?;

    let severity = factor(summary.avg_claim, benchmarks.severity_benchmark_cents);
    let frequency = factor(
        summary.total_claims as f64,
        benchmarks.frequency_benchmark_claims,
    );
    // open_rate() is already 0 for an empty table, so the factor follows.
    let open_rate = factor(summary.open_rate(), benchmarks.open_rate_benchmark);
    let lag = factor(summary.avg_lag_time, benchmarks.lag_benchmark_days);

    let total_score = severity + frequency + open_rate + lag;

    Ok(RiskScore {
        total_score,
        level: RiskLevel::from_score(total_score),
        severity,
        frequency,
        open_rate,
        lag,
    })
}

/// Convenience for callers that have not yet aggregated: summary then score.
pub fn score_table(
    claims: &ClaimsTable,
    benchmarks: &RiskBenchmarks,
) -> Result<RiskScore, AnalysisError> {
    let summary = calculate_summary(claims)?;
    calculate_risk_score(claims, &summary, benchmarks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::Claim;
    use crate::types::ClaimStatus;
    use proptest::prelude::*;

    fn benchmarks() -> RiskBenchmarks {
        crate::config::EngineConfig::canonical().risk
    }

    fn claim(incurred: u64, status: ClaimStatus, lag: Option<i64>) -> Claim {
        Claim {
            claim_id: "CLM-1".to_string(),
            incurred,
            paid: incurred,
            reserve: 0,
            status,
            loss_cause: None,
            policy_year: None,
            line_of_business: None,
            state: None,
            loss_date: None,
            report_date: None,
            report_lag_days: lag,
        }
    }

    fn score_for(claims: Vec<Claim>) -> RiskScore {
        let table = ClaimsTable::from_claims(claims);
        score_table(&table, &benchmarks()).unwrap()
    }

    #[test]
    fn empty_table_scores_zero_in_lowest_band() {
        let score = score_for(Vec::new());
        assert_eq!(score.total_score, 0);
        assert_eq!(score.level, RiskLevel::Low);
        assert_eq!(score.open_rate, 0, "open-rate factor must be 0 with no claims");
    }

    #[test]
    fn total_is_sum_of_factors() {
        let score = score_for(vec![
            claim(10_000_000, ClaimStatus::Open, Some(60)),
            claim(2_000_000, ClaimStatus::Closed, Some(10)),
        ]);
        assert_eq!(
            score.total_score,
            score.severity + score.frequency + score.open_rate + score.lag
        );
    }

    #[test]
    fn severity_saturates_at_ceiling() {
        // Average claim far beyond the benchmark pins the factor at 25.
        let score = score_for(vec![claim(u32::MAX as u64 * 100, ClaimStatus::Closed, None)]);
        assert_eq!(score.severity, MAX_FACTOR);
    }

    #[test]
    fn severity_monotonic_in_avg_claim() {
        let low = score_for(vec![claim(500_000, ClaimStatus::Closed, None)]);
        let high = score_for(vec![claim(5_000_000, ClaimStatus::Closed, None)]);
        assert!(high.severity >= low.severity);
    }

    #[test]
    fn all_open_portfolio_maxes_open_rate() {
        // Open rate 1.0 against a 0.6 benchmark saturates.
        let score = score_for(vec![
            claim(100_000, ClaimStatus::Open, None),
            claim(100_000, ClaimStatus::Open, None),
        ]);
        assert_eq!(score.open_rate, MAX_FACTOR);
    }

    proptest! {
        #[test]
        fn factors_and_total_stay_in_bounds(
            rows in prop::collection::vec((1u64..100_000_000, any::<bool>(), 0i64..400), 0..300)
        ) {
            let claims: Vec<Claim> = rows
                .iter()
                .map(|&(incurred, open, lag)| {
                    let status = if open { ClaimStatus::Open } else { ClaimStatus::Closed };
                    claim(incurred, status, Some(lag))
                })
                .collect();
            let score = score_for(claims);
            prop_assert!(score.severity <= MAX_FACTOR);
            prop_assert!(score.frequency <= MAX_FACTOR);
            prop_assert!(score.open_rate <= MAX_FACTOR);
            prop_assert!(score.lag <= MAX_FACTOR);
            prop_assert!(score.total_score <= 100);
            prop_assert_eq!(
                score.total_score,
                score.severity + score.frequency + score.open_rate + score.lag
            );
            prop_assert_eq!(score.level, RiskLevel::from_score(score.total_score));
        }
    }
}
