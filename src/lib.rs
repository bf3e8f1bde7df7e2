//! Vitalspan - On-device health impact computation and target-solving engine
//!
//! Vitalspan converts raw health metric readings into estimated lifespan
//! impact (minutes per day), combines multiple metrics while accounting for
//! pairwise synergy and antagonism, and solves the metric values a user would
//! need to reach a target impact:
//! calculator evaluation → interaction adjustment → aggregation, with a
//! staleness-aware cache wrapping the bisection target solver.
//!
//! ## Modules
//!
//! - **calculators**: per-metric dose-response evaluation over research breakpoints
//! - **interaction**: pairwise synergy/antagonism rules
//! - **aggregator**: metric-set totals, scaled per reporting period
//! - **solver**: bisection search for goal-impact metric values
//! - **cache**: persisted daily targets with drift and expiry rules

pub mod aggregator;
pub mod cache;
pub mod calculators;
pub mod curve;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod solver;
pub mod types;

// FFI bindings for host-app interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use aggregator::ImpactAggregator;
pub use cache::{DailyTargetCache, MemoryStore, TargetStore, DRIFT_THRESHOLD};
pub use calculators::{CalculatorRegistry, ImpactCalculator};
pub use engine::ImpactEngine;
pub use error::EngineError;
pub use interaction::{InteractionEngine, InteractionRule};
pub use solver::{SolvedTarget, TargetGoal, TargetSolver, IMPACT_TOLERANCE, MAX_ITERATIONS};
pub use types::{
    BiologicalSex, CalculationMethod, DailyTarget, HealthMetric, Interaction, InteractionKind,
    MetricImpactDetail, MetricSource, MetricType, ReportingPeriod, ResponseShape, StudyReference,
    TotalImpact, UserProfile,
};

/// Engine version embedded in CLI and FFI surfaces
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
