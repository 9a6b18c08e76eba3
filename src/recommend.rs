use std::cmp::Ordering;

use serde::Serialize;

use crate::claims::{AnalysisError, ClaimsTable};
use crate::config::{EngineConfig, RecommendationParams};
use crate::dimensions::{Dimension, group_by_dimension};
use crate::summary::Summary;
use crate::types::Priority;

/// Implementation cost of a mitigation strategy, cents.
/// Site-level programs are fixed; per-claim programs (e.g. claim triage)
/// scale with the number of claims they would touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostModel {
    Fixed(u64),
    PerClaim { base: u64, per_claim: u64 },
}

impl CostModel {
    pub fn cost_for(&self, claim_count: u64) -> u64 {
        match self {
            CostModel::Fixed(cost) => *cost,
            CostModel::PerClaim { base, per_claim } => base + per_claim * claim_count,
        }
    }
}

/// Static mitigation-strategy template, keyed by loss-cause category.
/// Read-only for the lifetime of the process; never derived from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyTemplate {
    pub cause: &'static str,
    pub strategy_name: &'static str,
    pub cost: CostModel,
    /// Expected loss reduction, fraction of the cause's total incurred.
    pub reduction_rate: f64,
    /// Discount on the projected reduction for implementation uncertainty.
    pub confidence_factor: f64,
    pub actions: &'static [&'static str],
}

/// One prioritized loss-control recommendation with its financial case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub strategy_name: String,
    pub priority: Priority,
    pub cause: String,
    /// Claim count for the targeted cause.
    pub frequency: u64,
    /// Sum incurred for the targeted cause, cents.
    pub total_loss: u64,
    pub implementation_cost: u64,
    /// total_loss × reduction_rate × confidence_factor, cents, annualized.
    pub potential_savings: u64,
    /// (savings − cost) / cost × 100, percent.
    pub roi: f64,
    /// cost / (savings / 12), rounded to whole months.
    pub payback_months: u32,
    pub actions: Vec<String>,
    pub reduction_rate: f64,
    pub confidence_factor: f64,
    /// savings − cost, cents; may be negative.
    pub net_benefit: i64,
}

/// The full recommendation set for one analysis run, priority-major then
/// ROI-minor descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub items: Vec<Recommendation>,
    /// Sum of potential_savings, cents. 0 when empty.
    pub total_savings: u64,
    /// Mean ROI across items, percent. 0 when empty.
    pub avg_roi: f64,
}

impl RecommendationSet {
    pub fn empty() -> Self {
        Self { items: Vec::new(), total_savings: 0, avg_roi: 0.0 }
    }
}

fn priority_for(total_loss: u64, roi: f64, params: &RecommendationParams) -> Priority {
    if total_loss >= params.critical_loss_cents && roi >= params.critical_roi {
        Priority::Critical
    } else if total_loss >= params.high_loss_cents || roi >= params.high_roi {
        Priority::High
    } else {
        Priority::Moderate
    }
}

/// Rank loss causes by total incurred, match each to a strategy template,
/// and build the cost/benefit case for the top causes.
///
/// Exclusions are local, never errors: causes under the frequency or
/// total-loss noise floor, strategies with zero implementation cost (ROI
/// undefined), and projections with zero savings (payback undefined). A
/// table without a loss-cause column yields an empty set — the breakdown
/// is unavailable, not broken.
pub fn generate_recommendations(
    claims: &ClaimsTable,
    summary: &Summary,
    config: &EngineConfig,
) -> Result<RecommendationSet, AnalysisError> {
    if summary.total_claims == 0 {
        return Ok(RecommendationSet::empty());
    }

    let causes = match group_by_dimension(claims, Dimension::LossCause) {
        Ok(groups) => groups,
        Err(AnalysisError::InvalidDimension { .. }) => return Ok(RecommendationSet::empty()),
        Err(e) => return Err(e),
    };

    let params = &config.recommend;
    let mut items: Vec<Recommendation> = Vec::new();

    for group in causes.iter().take(params.top_n) {
        if group.count < params.min_frequency || group.total < params.min_total_loss_cents {
            continue;
        }

        let template = config
            .catalog
            .iter()
            .find(|t| t.cause.eq_ignore_ascii_case(&group.key))
            .unwrap_or(&config.fallback);

        let implementation_cost = template.cost.cost_for(group.count);
        if implementation_cost == 0 {
            continue;
        }

        let potential_savings =
            (group.total as f64 * template.reduction_rate * template.confidence_factor).round()
                as u64;
        if potential_savings == 0 {
            continue;
        }

        let roi = (potential_savings as f64 - implementation_cost as f64)
            / implementation_cost as f64
            * 100.0;
        let payback_months =
            (implementation_cost as f64 / (potential_savings as f64 / 12.0)).round() as u32;

        items.push(Recommendation {
            strategy_name: template.strategy_name.to_string(),
            priority: priority_for(group.total, roi, params),
            cause: group.key.clone(),
            frequency: group.count,
            total_loss: group.total,
            implementation_cost,
            potential_savings,
            roi,
            payback_months,
            actions: template.actions.iter().map(|a| a.to_string()).collect(),
            reduction_rate: template.reduction_rate,
            confidence_factor: template.confidence_factor,
            net_benefit: potential_savings as i64 - implementation_cost as i64,
        });
    }

    items.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.roi.partial_cmp(&a.roi).unwrap_or(Ordering::Equal))
            .then_with(|| a.cause.cmp(&b.cause))
    });

    let total_savings: u64 = items.iter().map(|r| r.potential_savings).sum();
    let avg_roi = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|r| r.roi).sum::<f64>() / items.len() as f64
    };

    Ok(RecommendationSet { items, total_savings, avg_roi })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{Claim, Column};
    use crate::summary::calculate_summary;
    use crate::types::ClaimStatus;

    fn claim(cause: &str, incurred: u64) -> Claim {
        Claim {
            claim_id: "CLM-1".to_string(),
            incurred,
            paid: incurred,
            reserve: 0,
            status: ClaimStatus::Closed,
            loss_cause: Some(cause.to_string()),
            policy_year: Some(2024),
            line_of_business: None,
            state: None,
            loss_date: None,
            report_date: None,
            report_lag_days: None,
        }
    }

    fn repeat_claims(cause: &str, incurred: u64, n: usize) -> Vec<Claim> {
        (0..n).map(|_| claim(cause, incurred)).collect()
    }

    fn run(claims: Vec<Claim>, config: &EngineConfig) -> RecommendationSet {
        let table = ClaimsTable::from_claims(claims);
        let summary = calculate_summary(&table).unwrap();
        generate_recommendations(&table, &summary, config).unwrap()
    }

    #[test]
    fn empty_table_yields_empty_set() {
        let set = run(Vec::new(), &EngineConfig::canonical());
        assert!(set.items.is_empty());
        assert_eq!(set.total_savings, 0);
        assert!((set.avg_roi - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn noise_level_causes_excluded() {
        let config = EngineConfig::canonical();
        // Two claims under the frequency floor, tiny loss under the loss floor.
        let set = run(repeat_claims("Fall", 1_000, 2), &config);
        assert!(set.items.is_empty());
    }

    #[test]
    fn dominant_cause_gets_matched_strategy() {
        let config = EngineConfig::canonical();
        let set = run(repeat_claims("Slip/Fall", 5_000_000, 20), &config);
        assert_eq!(set.items.len(), 1);
        let rec = &set.items[0];
        assert_eq!(rec.cause, "Slip/Fall");
        assert_eq!(rec.frequency, 20);
        assert_eq!(rec.total_loss, 100_000_000);
        assert_ne!(rec.strategy_name, config.fallback.strategy_name);
        assert!(rec.implementation_cost > 0);
        assert!(!rec.actions.is_empty());
    }

    #[test]
    fn unmapped_cause_falls_back_to_generic_review() {
        let config = EngineConfig::canonical();
        let set = run(repeat_claims("Meteor Strike", 5_000_000, 20), &config);
        assert_eq!(set.items.len(), 1);
        assert_eq!(set.items[0].strategy_name, config.fallback.strategy_name);
    }

    #[test]
    fn financial_math_checks_out() {
        let config = EngineConfig::canonical();
        let set = run(repeat_claims("Slip/Fall", 5_000_000, 20), &config);
        let rec = &set.items[0];

        let expected_savings = (rec.total_loss as f64
            * rec.reduction_rate
            * rec.confidence_factor)
            .round() as u64;
        assert_eq!(rec.potential_savings, expected_savings);

        let expected_roi = (rec.potential_savings as f64 - rec.implementation_cost as f64)
            / rec.implementation_cost as f64
            * 100.0;
        assert!((rec.roi - expected_roi).abs() < 1e-10);

        let expected_payback = (rec.implementation_cost as f64
            / (rec.potential_savings as f64 / 12.0))
            .round() as u32;
        assert_eq!(rec.payback_months, expected_payback);

        assert_eq!(
            rec.net_benefit,
            rec.potential_savings as i64 - rec.implementation_cost as i64
        );
    }

    #[test]
    fn zero_cost_template_is_rejected() {
        let mut config = EngineConfig::canonical();
        config.catalog = vec![StrategyTemplate {
            cause: "Fall",
            strategy_name: "Free Lunch Program",
            cost: CostModel::Fixed(0),
            reduction_rate: 0.5,
            confidence_factor: 1.0,
            actions: &["Do nothing"],
        }];
        let set = run(repeat_claims("Fall", 5_000_000, 20), &config);
        assert!(set.items.is_empty(), "zero-cost strategy must not produce a recommendation");
        assert!(set.items.iter().all(|r| r.implementation_cost > 0));
    }

    #[test]
    fn items_sorted_priority_major_roi_minor() {
        let config = EngineConfig::canonical();
        let mut claims = repeat_claims("Slip/Fall", 10_000_000, 30); // large loss
        claims.extend(repeat_claims("Theft/Burglary", 1_500_000, 10));
        claims.extend(repeat_claims("Water Damage", 2_000_000, 12));
        let set = run(claims, &config);

        assert!(set.items.len() >= 2);
        for pair in set.items.windows(2) {
            let ordered = pair[0].priority > pair[1].priority
                || (pair[0].priority == pair[1].priority && pair[0].roi >= pair[1].roi);
            assert!(ordered, "items must be priority-major then ROI-minor descending");
        }
    }

    #[test]
    fn aggregates_match_items() {
        let config = EngineConfig::canonical();
        let mut claims = repeat_claims("Slip/Fall", 5_000_000, 20);
        claims.extend(repeat_claims("Fire", 8_000_000, 10));
        let set = run(claims, &config);

        let sum: u64 = set.items.iter().map(|r| r.potential_savings).sum();
        assert_eq!(set.total_savings, sum);
        let mean = set.items.iter().map(|r| r.roi).sum::<f64>() / set.items.len() as f64;
        assert!((set.avg_roi - mean).abs() < 1e-10);
    }

    #[test]
    fn top_n_caps_the_candidate_list() {
        let mut config = EngineConfig::canonical();
        config.recommend.top_n = 2;
        let mut claims = repeat_claims("Slip/Fall", 5_000_000, 20);
        claims.extend(repeat_claims("Fire", 4_000_000, 20));
        claims.extend(repeat_claims("Water Damage", 3_000_000, 20));
        let set = run(claims, &config);
        assert!(set.items.len() <= 2);
    }

    #[test]
    fn missing_loss_cause_column_degrades_to_empty() {
        let config = EngineConfig::canonical();
        let columns = [Column::ClaimId, Column::Incurred, Column::Paid, Column::Reserve, Column::Status]
            .into_iter()
            .collect();
        let table = ClaimsTable::new(repeat_claims("Fall", 5_000_000, 20), columns);
        let summary = calculate_summary(&table).unwrap();
        let set = generate_recommendations(&table, &summary, &config).unwrap();
        assert!(set.items.is_empty());
    }
}
