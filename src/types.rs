use serde::Serialize;

/// Lifecycle state of a claim. A claim is Open while any reserve remains
/// outstanding and Closed once fully settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClaimStatus {
    Open,
    Closed,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "Open",
            ClaimStatus::Closed => "Closed",
        }
    }
}

/// Composite risk band derived from the 0–100 total score.
///
/// Bands are contiguous and exhaustive over [0, 100]:
///   Low [0, 24] · Moderate [25, 49] · High [50, 74] · Critical [75, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub const MODERATE_FLOOR: u8 = 25;
    pub const HIGH_FLOOR: u8 = 50;
    pub const CRITICAL_FLOOR: u8 = 75;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::CRITICAL_FLOOR {
            RiskLevel::Critical
        } else if score >= Self::HIGH_FLOOR {
            RiskLevel::High
        } else if score >= Self::MODERATE_FLOOR {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }
}

/// Urgency tier of a loss-control recommendation. Variant order is rank
/// order, so `Ord` sorts Moderate < High < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Moderate,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Moderate => "moderate",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}
