use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::types::ClaimStatus;

/// A single row of the normalized claims table.
/// All monetary fields are integer cents; `incurred == paid + reserve`
/// is enforced at normalization time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub claim_id: String,
    pub incurred: u64,
    pub paid: u64,
    pub reserve: u64,
    pub status: ClaimStatus,
    pub loss_cause: Option<String>,
    pub policy_year: Option<i32>,
    pub line_of_business: Option<String>,
    pub state: Option<String>,
    pub loss_date: Option<NaiveDate>,
    pub report_date: Option<NaiveDate>,
    /// Days between loss and report. Null when either date is missing;
    /// negative raw lags are treated as bad data, not risk signal.
    pub report_lag_days: Option<i64>,
}

impl Claim {
    /// Report lag derived from the loss/report date pair.
    pub fn lag_from_dates(loss: Option<NaiveDate>, report: Option<NaiveDate>) -> Option<i64> {
        match (loss, report) {
            (Some(l), Some(r)) => {
                let days = (r - l).num_days();
                if days >= 0 { Some(days) } else { None }
            }
            _ => None,
        }
    }

    /// Day of week the loss occurred on, when the loss date is known.
    pub fn weekday(&self) -> Option<Weekday> {
        self.loss_date.map(|d| d.weekday())
    }
}

/// Canonical columns of the claims schema. The ingestion collaborator
/// records which of these were actually present in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Column {
    ClaimId,
    Incurred,
    Paid,
    Reserve,
    Status,
    LossCause,
    PolicyYear,
    LineOfBusiness,
    State,
    LossDate,
    ReportDate,
}

impl Column {
    pub fn name(&self) -> &'static str {
        match self {
            Column::ClaimId => "claim_id",
            Column::Incurred => "incurred",
            Column::Paid => "paid",
            Column::Reserve => "reserve",
            Column::Status => "status",
            Column::LossCause => "loss_cause",
            Column::PolicyYear => "policy_year",
            Column::LineOfBusiness => "line_of_business",
            Column::State => "state",
            Column::LossDate => "loss_date",
            Column::ReportDate => "report_date",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The normalized claims table: claim rows plus the set of source columns
/// they were built from. A column can be absent (e.g. no `state` in the
/// upload) — breakdowns over it are then unavailable rather than wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsTable {
    claims: Vec<Claim>,
    columns: BTreeSet<Column>,
}

impl ClaimsTable {
    pub fn new(claims: Vec<Claim>, columns: BTreeSet<Column>) -> Self {
        Self { claims, columns }
    }

    /// Table with every canonical column marked present. Used by tests and
    /// the synthetic generator, which always populate the full schema.
    pub fn from_claims(claims: Vec<Claim>) -> Self {
        let columns = [
            Column::ClaimId,
            Column::Incurred,
            Column::Paid,
            Column::Reserve,
            Column::Status,
            Column::LossCause,
            Column::PolicyYear,
            Column::LineOfBusiness,
            Column::State,
            Column::LossDate,
            Column::ReportDate,
        ]
        .into_iter()
        .collect();
        Self { claims, columns }
    }

    pub fn rows(&self) -> &[Claim] {
        &self.claims
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.columns.iter().copied()
    }

    /// Schema check for components that cannot run without certain columns.
    /// Reports the first missing column.
    pub fn require_columns(&self, required: &[Column]) -> Result<(), AnalysisError> {
        for &column in required {
            if !self.columns.contains(&column) {
                return Err(AnalysisError::MissingRequiredColumn { column });
            }
        }
        Ok(())
    }
}

/// Typed engine failure. Every failure is deterministic given the input:
/// there is nothing to retry and nothing is logged-and-ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A column the Summary Aggregator / Risk Scorer cannot run without is
    /// absent from the table. Fatal to the analysis run.
    MissingRequiredColumn { column: Column },
    /// The requested grouping column does not exist in the table. Callers
    /// hide that breakdown rather than failing the session.
    InvalidDimension { dimension: String },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MissingRequiredColumn { column } => {
                write!(f, "missing required column: {column}")
            }
            AnalysisError::InvalidDimension { dimension } => {
                write!(f, "invalid dimension: {dimension}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
