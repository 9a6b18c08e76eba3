use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::claims::{Claim, ClaimsTable, Column};
use crate::types::ClaimStatus;

/// Rounding slack when reconciling incurred against paid + reserve, cents.
const RECONCILE_TOLERANCE_CENTS: u64 = 100;

/// Failure while turning a CSV upload into a normalized claims table.
#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// A column the engine cannot run without is absent from the header.
    /// Configuration error: the upload does not match the claims schema.
    MissingColumn { column: Column },
    /// A value that must be parseable (money, status) was not.
    BadField { row: usize, field: &'static str, value: String },
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "io error: {e}"),
            IngestError::Csv(e) => write!(f, "csv error: {e}"),
            IngestError::MissingColumn { column } => {
                write!(f, "claims file is missing required column: {column}")
            }
            IngestError::BadField { row, field, value } => {
                write!(f, "row {row}: cannot parse {field} from {value:?}")
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(e) => Some(e),
            IngestError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Io(e)
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::Csv(e)
    }
}

/// Collapse a header to lowercase with underscore-separated word runs, so
/// "Total Incurred", "total-incurred", and "TOTAL_INCURRED" all match.
fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut last_was_sep = true;
    for ch in header.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}

/// Map a normalized header onto a canonical column. Aliases cover the
/// usual carrier loss-run and TPA export vocabularies.
fn column_for(normalized: &str) -> Option<Column> {
    match normalized {
        "claim_id" | "claim_number" | "claim_no" | "claim_num" | "claim" => Some(Column::ClaimId),
        "incurred" | "total_incurred" | "incurred_loss" | "total_incurred_loss" | "incurred_total" => {
            Some(Column::Incurred)
        }
        "paid" | "total_paid" | "paid_loss" | "paid_total" => Some(Column::Paid),
        "reserve" | "total_reserve" | "outstanding" | "outstanding_reserve" | "os_reserve" => {
            Some(Column::Reserve)
        }
        "status" | "claim_status" | "open_closed" => Some(Column::Status),
        "loss_cause" | "cause" | "cause_of_loss" | "loss_description" | "peril" => {
            Some(Column::LossCause)
        }
        "policy_year" | "policy_yr" | "pol_year" | "accident_year" => Some(Column::PolicyYear),
        "line_of_business" | "lob" | "line" | "coverage_line" => Some(Column::LineOfBusiness),
        "state" | "loss_state" | "jurisdiction" | "jurisdiction_state" => Some(Column::State),
        "loss_date" | "date_of_loss" | "dol" | "accident_date" => Some(Column::LossDate),
        "report_date" | "date_reported" | "reported_date" | "date_of_report" => {
            Some(Column::ReportDate)
        }
        _ => None,
    }
}

fn parse_money(raw: &str, row: usize, field: &'static str) -> Result<u64, IngestError> {
    let cleaned: String =
        raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
    let value: f64 = cleaned.parse().map_err(|_| IngestError::BadField {
        row,
        field,
        value: raw.to_string(),
    })?;
    if value < 0.0 {
        return Err(IngestError::BadField { row, field, value: raw.to_string() });
    }
    Ok((value * 100.0).round() as u64)
}

fn parse_status(raw: &str, row: usize) -> Result<ClaimStatus, IngestError> {
    match raw.to_ascii_lowercase().as_str() {
        "open" | "o" | "reopen" | "re-open" | "reopened" => Ok(ClaimStatus::Open),
        "closed" | "c" | "close" | "settled" => Ok(ClaimStatus::Closed),
        _ => Err(IngestError::BadField { row, field: "status", value: raw.to_string() }),
    }
}

/// Lenient date parsing: several common export formats, unparseable
/// values coerced to null rather than failing the upload.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%b-%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Read a claims CSV into a normalized table.
///
/// Required columns: status, paid, reserve. Incurred is taken from the
/// file when present (reconciled against paid + reserve within rounding
/// tolerance) and derived otherwise. All other columns are optional;
/// absent ones simply disable the breakdowns that need them.
pub fn read_claims<R: Read>(reader: R) -> Result<ClaimsTable, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut index: BTreeMap<Column, usize> = BTreeMap::new();
    for (i, header) in csv_reader.headers()?.iter().enumerate() {
        if let Some(column) = column_for(&normalize_header(header)) {
            index.entry(column).or_insert(i);
        }
    }

    for required in [Column::Status, Column::Paid, Column::Reserve] {
        if !index.contains_key(&required) {
            return Err(IngestError::MissingColumn { column: required });
        }
    }

    let field = |record: &csv::StringRecord, column: Column| -> Option<String> {
        index
            .get(&column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut claims = Vec::new();
    for (row_idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = row_idx + 1;

        let paid = match field(&record, Column::Paid) {
            Some(raw) => parse_money(&raw, row, "paid")?,
            None => 0,
        };
        let reserve = match field(&record, Column::Reserve) {
            Some(raw) => parse_money(&raw, row, "reserve")?,
            None => 0,
        };
        let incurred = match field(&record, Column::Incurred) {
            Some(raw) => {
                let stated = parse_money(&raw, row, "incurred")?;
                // paid + reserve is the ground truth; stated incurred only
                // survives when it agrees within rounding.
                if stated.abs_diff(paid + reserve) <= RECONCILE_TOLERANCE_CENTS {
                    stated
                } else {
                    paid + reserve
                }
            }
            None => paid + reserve,
        };

        let status_raw = field(&record, Column::Status).ok_or(IngestError::BadField {
            row,
            field: "status",
            value: String::new(),
        })?;
        let status = parse_status(&status_raw, row)?;

        let loss_date = field(&record, Column::LossDate).and_then(|raw| parse_date(&raw));
        let report_date = field(&record, Column::ReportDate).and_then(|raw| parse_date(&raw));

        claims.push(Claim {
            claim_id: field(&record, Column::ClaimId)
                .unwrap_or_else(|| format!("CLM-{row:05}")),
            incurred,
            paid,
            reserve,
            status,
            loss_cause: field(&record, Column::LossCause),
            policy_year: field(&record, Column::PolicyYear).and_then(|raw| raw.parse().ok()),
            line_of_business: field(&record, Column::LineOfBusiness),
            state: field(&record, Column::State),
            loss_date,
            report_date,
            report_lag_days: Claim::lag_from_dates(loss_date, report_date),
        });
    }

    let mut columns: BTreeSet<Column> = index.keys().copied().collect();
    // The normalized table always defines incurred, derived or not.
    columns.insert(Column::Incurred);

    Ok(ClaimsTable::new(claims, columns))
}

/// File-path convenience wrapper around `read_claims`.
pub fn load_claims_file(path: impl AsRef<Path>) -> Result<ClaimsTable, IngestError> {
    let file = File::open(path)?;
    read_claims(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_from(csv_text: &str) -> Result<ClaimsTable, IngestError> {
        read_claims(csv_text.as_bytes())
    }

    #[test]
    fn parses_aliased_headers_and_derives_lag() {
        let table = table_from(
            "Claim Number,Total Incurred,Paid,Outstanding Reserve,Claim Status,Cause of Loss,Date of Loss,Date Reported,State\n\
             WC-1001,\"$10,000.00\",\"$10,000.00\",$0.00,Closed,Slip/Fall,2024-03-01,2024-03-06,TX\n\
             WC-1002,\"$5,000.00\",\"$2,000.00\",\"$3,000.00\",Open,Slip/Fall,03/01/2024,03/31/2024,CA\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column(Column::State));
        assert!(table.has_column(Column::LossCause));
        assert!(!table.has_column(Column::LineOfBusiness));

        let rows = table.rows();
        assert_eq!(rows[0].claim_id, "WC-1001");
        assert_eq!(rows[0].incurred, 1_000_000);
        assert_eq!(rows[0].status, ClaimStatus::Closed);
        assert_eq!(rows[0].report_lag_days, Some(5));
        assert_eq!(rows[1].status, ClaimStatus::Open);
        assert_eq!(rows[1].report_lag_days, Some(30));
    }

    #[test]
    fn missing_status_column_is_configuration_error() {
        let err = table_from("claim_id,incurred,paid,reserve\nA,1,1,0\n").unwrap_err();
        match err {
            IngestError::MissingColumn { column } => assert_eq!(column, Column::Status),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn incurred_derived_when_column_absent() {
        let table =
            table_from("paid,reserve,status\n$100.00,$50.00,Open\n").unwrap();
        assert_eq!(table.rows()[0].incurred, 15_000);
        assert!(table.has_column(Column::Incurred), "derived incurred counts as present");
    }

    #[test]
    fn stated_incurred_reconciled_against_paid_plus_reserve() {
        // $999 stated vs $150 actual: paid + reserve wins.
        let table =
            table_from("incurred,paid,reserve,status\n999.00,100.00,50.00,Open\n").unwrap();
        assert_eq!(table.rows()[0].incurred, 15_000);

        // Within a dollar of agreement the stated value survives.
        let table =
            table_from("incurred,paid,reserve,status\n150.50,100.00,50.00,Open\n").unwrap();
        assert_eq!(table.rows()[0].incurred, 15_050);
    }

    #[test]
    fn unknown_status_value_fails_fast() {
        let err = table_from("paid,reserve,status\n1.00,0.00,pending\n").unwrap_err();
        match err {
            IngestError::BadField { row, field, value } => {
                assert_eq!(row, 1);
                assert_eq!(field, "status");
                assert_eq!(value, "pending");
            }
            other => panic!("expected BadField, got {other:?}"),
        }
    }

    #[test]
    fn negative_money_is_rejected() {
        let err = table_from("paid,reserve,status\n-5.00,0.00,Open\n").unwrap_err();
        assert!(matches!(err, IngestError::BadField { field: "paid", .. }));
    }

    #[test]
    fn junk_dates_coerce_to_null() {
        let table = table_from(
            "paid,reserve,status,loss_date,report_date\n1.00,0.00,Open,not-a-date,2024-01-05\n",
        )
        .unwrap();
        assert_eq!(table.rows()[0].loss_date, None);
        assert_eq!(table.rows()[0].report_lag_days, None);
    }

    #[test]
    fn missing_claim_id_synthesized() {
        let table = table_from("paid,reserve,status\n1.00,0.00,Open\n2.00,0.00,Closed\n").unwrap();
        assert_eq!(table.rows()[0].claim_id, "CLM-00001");
        assert_eq!(table.rows()[1].claim_id, "CLM-00002");
        assert!(!table.has_column(Column::ClaimId));
    }

    #[test]
    fn empty_file_yields_empty_table() {
        let table = table_from("paid,reserve,status\n").unwrap();
        assert!(table.is_empty());
    }
}
