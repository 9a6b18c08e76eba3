use serde::Serialize;

use crate::claims::{AnalysisError, ClaimsTable, Column};
use crate::types::ClaimStatus;

/// Portfolio-level totals and rates for one claims table.
/// Derived and immutable: recomputed wholesale whenever the table changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_claims: u64,
    /// Sums in cents.
    pub total_incurred: u64,
    pub total_paid: u64,
    pub total_reserve: u64,
    /// total_incurred / total_claims, cents. 0 when the table is empty.
    pub avg_claim: f64,
    pub open_claims: u64,
    pub closed_claims: u64,
    /// Mean of the non-null report lags, days. 0 when none are known.
    pub avg_lag_time: f64,
}

impl Summary {
    pub fn open_rate(&self) -> f64 {
        if self.total_claims == 0 {
            0.0
        } else {
            self.open_claims as f64 / self.total_claims as f64
        }
    }
}

/// Columns the aggregator (and the risk scorer after it) cannot run without.
pub const REQUIRED_COLUMNS: [Column; 4] =
    [Column::Incurred, Column::Paid, Column::Reserve, Column::Status];

/// Single-pass portfolio aggregation. An empty table yields an all-zero
/// summary — zero, not NaN, so downstream rates stay well-defined.
pub fn calculate_summary(claims: &ClaimsTable) -> Result<Summary, AnalysisError> {
    claims.require_columns(&REQUIRED_COLUMNS)?;

    let mut total_incurred: u64 = 0;
    let mut total_paid: u64 = 0;
    let mut total_reserve: u64 = 0;
    let mut open_claims: u64 = 0;
    let mut lag_sum: i64 = 0;
    let mut lag_count: u64 = 0;

    for claim in claims.rows() {
        total_incurred += claim.incurred;
        total_paid += claim.paid;
        total_reserve += claim.reserve;
        if claim.status == ClaimStatus::Open {
            open_claims += 1;
        }
        if let Some(lag) = claim.report_lag_days {
            lag_sum += lag;
            lag_count += 1;
        }
    }

    let total_claims = claims.len() as u64;
    let avg_claim = if total_claims == 0 {
        0.0
    } else {
        total_incurred as f64 / total_claims as f64
    };
    let avg_lag_time = if lag_count == 0 {
        0.0
    } else {
        lag_sum as f64 / lag_count as f64
    };

    Ok(Summary {
        total_claims,
        total_incurred,
        total_paid,
        total_reserve,
        avg_claim,
        open_claims,
        closed_claims: total_claims - open_claims,
        avg_lag_time,
    })
}
