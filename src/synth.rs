use chrono::{Days, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Exp, LogNormal};

use crate::claims::Claim;
use crate::types::ClaimStatus;

/// Severity profile for one loss cause in the synthetic book.
/// Log-normal severity in ln-cents space: E[X] = exp(mu + sigma²/2) cents.
#[derive(Debug, Clone, Copy)]
pub struct CauseProfile {
    pub cause: &'static str,
    /// Relative frequency weight within the mix.
    pub weight: f64,
    pub mu: f64,
    pub sigma: f64,
}

/// Parameters of the synthetic claims generator.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub seed: u64,
    pub n_claims: usize,
    pub year_start: i32,
    pub year_end: i32,
    pub causes: Vec<CauseProfile>,
    pub states: Vec<&'static str>,
    pub lines_of_business: Vec<&'static str>,
    /// Report lag is exponential with this mean, days.
    pub mean_lag_days: f64,
    /// Open probability for the most recent policy year vs. earlier years.
    pub open_rate_recent: f64,
    pub open_rate_mature: f64,
    /// Fraction of rows with no report date (lag unknown).
    pub missing_report_date_rate: f64,
}

impl SampleConfig {
    /// Default sample book. Severity calibration is PLACEHOLDER — it only
    /// needs to look like a commercial casualty/property mix, roughly
    /// $5k–$60k average severity depending on cause.
    pub fn canonical() -> Self {
        SampleConfig {
            seed: 42,
            n_claims: 500,
            year_start: 2021,
            year_end: 2024,
            causes: vec![
                CauseProfile { cause: "Slip/Fall", weight: 0.22, mu: 13.8, sigma: 1.1 },
                CauseProfile { cause: "Motor Vehicle Accident", weight: 0.18, mu: 14.2, sigma: 1.2 },
                CauseProfile { cause: "Strain/Lifting", weight: 0.16, mu: 13.2, sigma: 0.9 },
                CauseProfile { cause: "Water Damage", weight: 0.12, mu: 13.9, sigma: 1.0 },
                CauseProfile { cause: "Equipment Failure", weight: 0.10, mu: 13.6, sigma: 1.1 },
                CauseProfile { cause: "Theft/Burglary", weight: 0.08, mu: 12.9, sigma: 0.8 },
                CauseProfile { cause: "Wind/Hail", weight: 0.08, mu: 14.5, sigma: 1.3 },
                CauseProfile { cause: "Fire", weight: 0.06, mu: 15.0, sigma: 1.4 },
            ],
            states: vec!["TX", "CA", "FL", "NY", "IL", "PA", "OH", "GA", "NC", "NJ"],
            lines_of_business: vec![
                "General Liability",
                "Workers Compensation",
                "Commercial Auto",
                "Commercial Property",
            ],
            mean_lag_days: 12.0,
            open_rate_recent: 0.55,
            open_rate_mature: 0.18,
            missing_report_date_rate: 0.05,
        }
    }
}

fn pick_cause<'a>(causes: &'a [CauseProfile], rng: &mut impl Rng) -> &'a CauseProfile {
    let total: f64 = causes.iter().map(|c| c.weight).sum();
    let mut roll = rng.random_range(0.0..total);
    for profile in causes {
        if roll < profile.weight {
            return profile;
        }
        roll -= profile.weight;
    }
    causes.last().expect("cause mix must be non-empty")
}

/// Generate a deterministic synthetic claims book from a seeded RNG.
/// Every canonical column is populated, so the resulting table supports
/// all breakdowns.
pub fn generate_claims(config: &SampleConfig, rng: &mut impl Rng) -> Vec<Claim> {
    let lag_dist = Exp::new(1.0 / config.mean_lag_days).expect("invalid Exp params");
    let mut claims = Vec::with_capacity(config.n_claims);

    for i in 0..config.n_claims {
        let profile = pick_cause(&config.causes, rng);
        let severity = LogNormal::new(profile.mu, profile.sigma).expect("invalid LogNormal params");
        // Floor at $100 so no claim rounds to a zero-dollar row.
        let incurred = (severity.sample(rng) as u64).max(10_000);

        let policy_year = rng.random_range(config.year_start..=config.year_end);
        let ordinal = rng.random_range(1..=365u32);
        let loss_date =
            NaiveDate::from_yo_opt(policy_year, ordinal).expect("ordinal 1..=365 is always valid");

        let lag_days = (lag_dist.sample(rng).round() as u64).min(365);
        let report_date = if rng.random_bool(config.missing_report_date_rate) {
            None
        } else {
            loss_date.checked_add_days(Days::new(lag_days))
        };

        let open_rate = if policy_year == config.year_end {
            config.open_rate_recent
        } else {
            config.open_rate_mature
        };
        let status =
            if rng.random_bool(open_rate) { ClaimStatus::Open } else { ClaimStatus::Closed };

        let paid = match status {
            ClaimStatus::Closed => incurred,
            ClaimStatus::Open => (incurred as f64 * rng.random_range(0.1..0.6)) as u64,
        };

        claims.push(Claim {
            claim_id: format!("CLM-{:05}", i + 1),
            incurred,
            paid,
            reserve: incurred - paid,
            status,
            loss_cause: Some(profile.cause.to_string()),
            policy_year: Some(policy_year),
            line_of_business: Some(
                config.lines_of_business[rng.random_range(0..config.lines_of_business.len())]
                    .to_string(),
            ),
            state: Some(config.states[rng.random_range(0..config.states.len())].to_string()),
            loss_date: Some(loss_date),
            report_date,
            report_lag_days: Claim::lag_from_dates(Some(loss_date), report_date),
        });
    }

    claims
}
