//! Loss analysis engine for commercial insurance claims portfolios.
//!
//! The engine is a fixed pipeline of pure functions over a normalized claims
//! table: portfolio summary aggregation, a four-factor composite risk score,
//! ranked dimension breakdowns, and ROI-ranked loss-control recommendations.
//! Ingestion (CSV), synthetic data generation, and export (CSV / Markdown)
//! are collaborators around that core and carry no analytical logic.

pub mod claims;
pub mod config;
pub mod dimensions;
pub mod export;
pub mod ingest;
pub mod pipeline;
pub mod recommend;
pub mod risk;
pub mod summary;
pub mod synth;
pub mod types;
