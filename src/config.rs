use crate::recommend::{CostModel, StrategyTemplate};

/// Reference benchmarks for the four risk factors. Each factor scales the
/// observed value against its benchmark onto [0, 25]: hitting the benchmark
/// scores the factor at its ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBenchmarks {
    /// Average incurred per claim that saturates the severity factor, cents.
    pub severity_benchmark_cents: f64,
    /// Claim volume that saturates the frequency factor.
    pub frequency_benchmark_claims: f64,
    /// Open-claim proportion that saturates the open-rate factor.
    pub open_rate_benchmark: f64,
    /// Average report lag that saturates the lag factor, days.
    pub lag_benchmark_days: f64,
}

/// Thresholds steering recommendation candidate selection and priority.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationParams {
    /// How many top loss causes to consider as candidates.
    pub top_n: usize,
    /// Noise floors: causes below either are not worth a recommendation.
    pub min_frequency: u64,
    pub min_total_loss_cents: u64,
    /// Critical requires both a large loss and a strong ROI.
    pub critical_loss_cents: u64,
    pub critical_roi: f64,
    /// High requires either a sizeable loss or an outstanding ROI.
    pub high_loss_cents: u64,
    pub high_roi: f64,
}

/// Every tunable business parameter of the engine: risk benchmarks,
/// recommendation thresholds, and the mitigation-strategy catalog.
/// Loaded once and treated as read-only for the lifetime of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub risk: RiskBenchmarks,
    pub recommend: RecommendationParams,
    pub catalog: Vec<StrategyTemplate>,
    /// Applied to loss causes with no catalog match.
    pub fallback: StrategyTemplate,
}

impl EngineConfig {
    /// Default calibration. All numeric values are business-parameter
    /// PLACEHOLDERS — expect them to change as loss-control consultants
    /// tune the model against book experience. Monetary values in cents.
    pub fn canonical() -> Self {
        EngineConfig {
            risk: RiskBenchmarks {
                severity_benchmark_cents: 5_000_000.0, // $50k average claim
                frequency_benchmark_claims: 500.0,
                open_rate_benchmark: 0.60,
                lag_benchmark_days: 45.0,
            },
            recommend: RecommendationParams {
                top_n: 5,
                min_frequency: 3,
                min_total_loss_cents: 2_500_000, // $25k
                critical_loss_cents: 25_000_000, // $250k
                critical_roi: 200.0,
                high_loss_cents: 10_000_000, // $100k
                high_roi: 300.0,
            },
            // ── Strategy catalog, keyed by loss-cause category ───────────────
            // reduction_rate × confidence_factor gives the expected fraction
            // of the cause's incurred loss the program recovers per year.
            catalog: vec![
                StrategyTemplate {
                    cause: "Slip/Fall",
                    strategy_name: "Walking Surface Safety Program",
                    cost: CostModel::Fixed(4_500_000), // $45k
                    reduction_rate: 0.30,
                    confidence_factor: 0.85,
                    actions: &[
                        "Audit walking surfaces and stair nosings quarterly",
                        "Install slip-resistant flooring in high-traffic zones",
                        "Formalize spill response with 15-minute cleanup SLA",
                        "Add footwear requirements for wet-process areas",
                    ],
                },
                StrategyTemplate {
                    cause: "Motor Vehicle Accident",
                    strategy_name: "Fleet Telematics & Driver Coaching",
                    cost: CostModel::PerClaim { base: 6_000_000, per_claim: 50_000 }, // $60k + $500/claim
                    reduction_rate: 0.25,
                    confidence_factor: 0.80,
                    actions: &[
                        "Deploy telematics across the fleet with event scoring",
                        "Coach drivers flagged for harsh braking or speeding",
                        "Tighten MVR screening on hire and annually",
                    ],
                },
                StrategyTemplate {
                    cause: "Water Damage",
                    strategy_name: "Water Intrusion Detection Program",
                    cost: CostModel::Fixed(3_500_000), // $35k
                    reduction_rate: 0.35,
                    confidence_factor: 0.85,
                    actions: &[
                        "Install leak sensors at supply lines and water heaters",
                        "Map and label shutoff valves at every location",
                        "Inspect roof drainage before storm season",
                    ],
                },
                StrategyTemplate {
                    cause: "Fire",
                    strategy_name: "Fire Protection System Upgrade",
                    cost: CostModel::Fixed(8_500_000), // $85k
                    reduction_rate: 0.40,
                    confidence_factor: 0.90,
                    actions: &[
                        "Bring sprinkler coverage up to NFPA 13 across occupancies",
                        "Quarterly thermographic scans of electrical panels",
                        "Enforce hot-work permit program with fire watch",
                    ],
                },
                StrategyTemplate {
                    cause: "Theft/Burglary",
                    strategy_name: "Physical Security Hardening",
                    cost: CostModel::Fixed(3_000_000), // $30k
                    reduction_rate: 0.45,
                    confidence_factor: 0.75,
                    actions: &[
                        "Upgrade perimeter access control and camera coverage",
                        "Cage and log high-value inventory",
                        "Connect alarms to central-station monitoring",
                    ],
                },
                StrategyTemplate {
                    cause: "Wind/Hail",
                    strategy_name: "Roof & Envelope Resilience Program",
                    cost: CostModel::Fixed(7_000_000), // $70k
                    reduction_rate: 0.20,
                    confidence_factor: 0.70,
                    actions: &[
                        "Engineer-inspect roofs over 10 years old",
                        "Retrofit roof attachment to wind-rated fasteners",
                        "Pre-position loss mitigation contracts for storm season",
                    ],
                },
                StrategyTemplate {
                    cause: "Equipment Failure",
                    strategy_name: "Predictive Maintenance Program",
                    cost: CostModel::PerClaim { base: 4_000_000, per_claim: 25_000 }, // $40k + $250/claim
                    reduction_rate: 0.30,
                    confidence_factor: 0.80,
                    actions: &[
                        "Move critical equipment from reactive to predictive PM",
                        "Vibration and oil analysis on rotating machinery",
                        "Stock critical spares for long-lead components",
                    ],
                },
                StrategyTemplate {
                    cause: "Strain/Lifting",
                    strategy_name: "Ergonomics & Safe Lifting Program",
                    cost: CostModel::Fixed(2_500_000), // $25k
                    reduction_rate: 0.28,
                    confidence_factor: 0.80,
                    actions: &[
                        "Job-task analysis for high-frequency lifting roles",
                        "Deploy mechanical assists above 50 lb thresholds",
                        "Early-intervention stretch and conditioning program",
                    ],
                },
            ],
            fallback: StrategyTemplate {
                cause: "*",
                strategy_name: "Targeted Loss Control Review",
                cost: CostModel::PerClaim { base: 1_500_000, per_claim: 15_000 }, // $15k + $150/claim
                reduction_rate: 0.15,
                confidence_factor: 0.70,
                actions: &[
                    "Commission a loss-control survey for the cause category",
                    "Review the largest claims with the carrier's consultant",
                    "Set a 90-day corrective action plan with owners",
                ],
            },
        }
    }
}
