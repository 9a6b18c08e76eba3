use std::io::Write;

use chrono::NaiveDate;

use crate::claims::ClaimsTable;
use crate::pipeline::AnalysisReport;
use crate::recommend::RecommendationSet;

/// Render cents as whole dollars with thousands separators: `$12,345`.
pub fn format_currency(cents: u64) -> String {
    format!("${}", group_digits(cents / 100))
}

/// Signed variant for net benefits, which can be negative.
pub fn format_currency_signed(cents: i64) -> String {
    if cents < 0 {
        format!("-${}", group_digits(cents.unsigned_abs() / 100))
    } else {
        format_currency(cents as u64)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_digits(mut n: u64) -> String {
    let mut groups: Vec<String> = Vec::new();
    loop {
        let group = n % 1_000;
        n /= 1_000;
        if n == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }
    groups.reverse();
    groups.join(",")
}

/// Flatten the claims table back out as CSV, dollars with two decimals.
pub fn write_claims_csv<W: Write>(table: &ClaimsTable, writer: W) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([
        "claim_id",
        "incurred",
        "paid",
        "reserve",
        "status",
        "loss_cause",
        "policy_year",
        "line_of_business",
        "state",
        "loss_date",
        "report_date",
        "report_lag_days",
    ])?;
    for claim in table.rows() {
        w.write_record([
            claim.claim_id.clone(),
            format!("{:.2}", claim.incurred as f64 / 100.0),
            format!("{:.2}", claim.paid as f64 / 100.0),
            format!("{:.2}", claim.reserve as f64 / 100.0),
            claim.status.as_str().to_string(),
            claim.loss_cause.clone().unwrap_or_default(),
            claim.policy_year.map(|y| y.to_string()).unwrap_or_default(),
            claim.line_of_business.clone().unwrap_or_default(),
            claim.state.clone().unwrap_or_default(),
            claim.loss_date.map(|d| d.to_string()).unwrap_or_default(),
            claim.report_date.map(|d| d.to_string()).unwrap_or_default(),
            claim.report_lag_days.map(|l| l.to_string()).unwrap_or_default(),
        ])?;
    }
    w.flush().map_err(csv::Error::from)
}

/// Flattened recommendation list for spreadsheet handoff.
pub fn write_recommendations_csv<W: Write>(
    set: &RecommendationSet,
    writer: W,
) -> Result<(), csv::Error> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([
        "Strategy",
        "Priority",
        "Loss Cause",
        "Frequency",
        "Total Loss",
        "Implementation Cost",
        "Potential Savings",
        "ROI",
        "Payback Months",
    ])?;
    for rec in &set.items {
        w.write_record([
            rec.strategy_name.clone(),
            rec.priority.as_str().to_string(),
            rec.cause.clone(),
            rec.frequency.to_string(),
            format!("{:.2}", rec.total_loss as f64 / 100.0),
            format!("{:.2}", rec.implementation_cost as f64 / 100.0),
            format!("{:.2}", rec.potential_savings as f64 / 100.0),
            format!("{:.0}%", rec.roi),
            rec.payback_months.to_string(),
        ])?;
    }
    w.flush().map_err(csv::Error::from)
}

/// Executive summary report in Markdown: summary table, risk assessment,
/// and the top five recommendations with their financial case.
pub fn markdown_report(
    report: &AnalysisReport,
    table: &ClaimsTable,
    source: &str,
    generated: NaiveDate,
) -> String {
    let summary = &report.summary;
    let risk = &report.risk_score;
    let recs = &report.recommendations;

    let years: Vec<i32> = table.rows().iter().filter_map(|c| c.policy_year).collect();
    let period = match (years.iter().min(), years.iter().max()) {
        (Some(min), Some(max)) => format!("{min}–{max}"),
        _ => "N/A".to_string(),
    };

    let pct_of_total = |count: u64| -> String {
        if summary.total_claims == 0 {
            "0.0%".to_string()
        } else {
            format_percent(count as f64 / summary.total_claims as f64 * 100.0)
        }
    };

    let mut md = String::new();
    md.push_str("# Loss Analysis Report\n");
    md.push_str(&format!("**Generated:** {}  \n", generated.format("%B %-d, %Y")));
    md.push_str(&format!("**Data Source:** {source}  \n"));
    md.push_str(&format!("**Analysis Period:** {period}\n\n---\n\n"));

    md.push_str("## Executive Summary\n\n");
    md.push_str("| Metric | Value |\n|--------|-------|\n");
    md.push_str(&format!("| Total Claims | {} |\n", group_digits(summary.total_claims)));
    md.push_str(&format!("| Total Incurred | {} |\n", format_currency(summary.total_incurred)));
    md.push_str(&format!("| Total Paid | {} |\n", format_currency(summary.total_paid)));
    md.push_str(&format!("| Total Reserve | {} |\n", format_currency(summary.total_reserve)));
    md.push_str(&format!("| Average Claim | {} |\n", format_currency(summary.avg_claim.round() as u64)));
    md.push_str(&format!(
        "| Open Claims | {} ({}) |\n",
        group_digits(summary.open_claims),
        pct_of_total(summary.open_claims)
    ));
    md.push_str(&format!(
        "| Closed Claims | {} ({}) |\n",
        group_digits(summary.closed_claims),
        pct_of_total(summary.closed_claims)
    ));
    md.push_str(&format!("| Average Report Lag | {:.1} days |\n\n---\n\n", summary.avg_lag_time));

    md.push_str("## Risk Assessment\n\n");
    md.push_str(&format!(
        "**Overall Risk Score:** {}/100 ({})\n\n### Risk Factors\n",
        risk.total_score,
        risk.level.as_str()
    ));
    for (name, value) in risk.factors() {
        md.push_str(&format!("- {name}: {value}/25\n"));
    }
    md.push_str("\n---\n\n## Risk Mitigation Recommendations\n\n");

    let priority_actions = recs
        .items
        .iter()
        .filter(|r| r.priority >= crate::types::Priority::High)
        .count();
    md.push_str(&format!(
        "**Total Potential Savings:** {}  \n**Average ROI:** {:.0}%  \n**Priority Actions:** {priority_actions}\n",
        format_currency(recs.total_savings),
        recs.avg_roi
    ));

    for (i, rec) in recs.items.iter().take(5).enumerate() {
        md.push_str(&format!(
            "\n### {}. {} ({} Priority)\n\n",
            i + 1,
            rec.strategy_name,
            rec.priority.as_str().to_uppercase()
        ));
        md.push_str(&format!("- **Target:** {}\n", rec.cause));
        md.push_str(&format!("- **Frequency:** {} claims\n", rec.frequency));
        md.push_str(&format!("- **Total Loss:** {}\n", format_currency(rec.total_loss)));
        md.push_str(&format!(
            "- **Implementation Cost:** {}\n",
            format_currency(rec.implementation_cost)
        ));
        md.push_str(&format!(
            "- **Potential Savings:** {}\n",
            format_currency(rec.potential_savings)
        ));
        md.push_str(&format!("- **ROI:** {:.0}%\n", rec.roi));
        md.push_str(&format!("- **Payback:** {} months\n", rec.payback_months));
        md.push_str(&format!(
            "- **Net Annual Benefit:** {}\n",
            format_currency_signed(rec.net_benefit)
        ));
        if !rec.actions.is_empty() {
            md.push_str("\n**Recommended Actions:**\n");
            for action in &rec.actions {
                md.push_str(&format!("- {action}\n"));
            }
        }
    }

    md.push_str("\n---\n\n*Report generated by claimscope*\n");
    md
}
