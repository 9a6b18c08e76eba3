use std::collections::BTreeMap;

use chrono::Weekday;
use serde::Serialize;

use crate::claims::{AnalysisError, Claim, ClaimsTable, Column};

/// A grouping axis over the claims table. Weekday is derived from the loss
/// date, so it needs the `loss_date` column rather than one of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    LossCause,
    State,
    LineOfBusiness,
    PolicyYear,
    Status,
    Weekday,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::LossCause,
        Dimension::State,
        Dimension::LineOfBusiness,
        Dimension::PolicyYear,
        Dimension::Status,
        Dimension::Weekday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::LossCause => "loss_cause",
            Dimension::State => "state",
            Dimension::LineOfBusiness => "line_of_business",
            Dimension::PolicyYear => "policy_year",
            Dimension::Status => "status",
            Dimension::Weekday => "weekday",
        }
    }

    /// The source column this dimension groups over.
    pub fn column(&self) -> Column {
        match self {
            Dimension::LossCause => Column::LossCause,
            Dimension::State => Column::State,
            Dimension::LineOfBusiness => Column::LineOfBusiness,
            Dimension::PolicyYear => Column::PolicyYear,
            Dimension::Status => Column::Status,
            Dimension::Weekday => Column::LossDate,
        }
    }

    /// Group key for one claim; None excludes the row from the breakdown.
    fn key_for(&self, claim: &Claim) -> Option<String> {
        match self {
            Dimension::LossCause => claim.loss_cause.clone(),
            Dimension::State => claim.state.clone(),
            Dimension::LineOfBusiness => claim.line_of_business.clone(),
            Dimension::PolicyYear => claim.policy_year.map(|y| y.to_string()),
            Dimension::Status => Some(claim.status.as_str().to_string()),
            Dimension::Weekday => claim.weekday().map(|w| weekday_label(w).to_string()),
        }
    }
}

impl std::str::FromStr for Dimension {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| AnalysisError::InvalidDimension { dimension: s.to_string() })
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// One row of a dimension breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStat {
    pub key: String,
    pub count: u64,
    /// Sum of incurred, cents.
    pub total: u64,
    /// total / count, cents.
    pub average: f64,
}

/// Group claims by the dimension's distinct values (nulls excluded) and
/// rank descending by total incurred, ascending key on ties. Fails with
/// `InvalidDimension` when the backing column is absent from the table.
pub fn group_by_dimension(
    claims: &ClaimsTable,
    dimension: Dimension,
) -> Result<Vec<GroupStat>, AnalysisError> {
    if !claims.has_column(dimension.column()) {
        return Err(AnalysisError::InvalidDimension {
            dimension: dimension.as_str().to_string(),
        });
    }

    let mut groups: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for claim in claims.rows() {
        if let Some(key) = dimension.key_for(claim) {
            let entry = groups.entry(key).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += claim.incurred;
        }
    }

    let mut result: Vec<GroupStat> = groups
        .into_iter()
        .map(|(key, (count, total))| GroupStat {
            key,
            count,
            total,
            average: total as f64 / count as f64,
        })
        .collect();

    result.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.key.cmp(&b.key)));
    Ok(result)
}
