//! Engine facade
//!
//! [`ImpactEngine`] wires the calculator registry, interaction rules, solver,
//! and daily-target cache together behind one stateful object. The host app
//! keeps a single engine per user session; all computation is synchronous and
//! bounded, so no cancellation or timeout concept is needed.

use crate::aggregator::ImpactAggregator;
use crate::cache::{DailyTargetCache, MemoryStore, TargetStore};
use crate::calculators::CalculatorRegistry;
use crate::error::EngineError;
use crate::interaction::InteractionEngine;
use crate::solver::{SolvedTarget, TargetGoal, TargetSolver};
use crate::types::{
    DailyTarget, HealthMetric, Interaction, MetricImpactDetail, ReportingPeriod, TotalImpact,
    UserProfile,
};
use chrono::{DateTime, Utc};

/// Stateful engine owning the registry, interaction rules, and target cache
pub struct ImpactEngine<S: TargetStore = MemoryStore> {
    registry: CalculatorRegistry,
    interactions: InteractionEngine,
    cache: DailyTargetCache<S>,
}

impl Default for ImpactEngine<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl ImpactEngine<MemoryStore> {
    /// Engine with an in-memory target store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Serialize the target cache so a host app can persist it across
    /// launches
    pub fn export_cache(&self) -> Result<String, EngineError> {
        self.cache.store().to_json().map_err(EngineError::from)
    }

    /// Restore a previously exported target cache
    pub fn import_cache(&mut self, json: &str) -> Result<(), EngineError> {
        *self.cache.store_mut() = MemoryStore::from_json(json)?;
        Ok(())
    }
}

impl<S: TargetStore> ImpactEngine<S> {
    /// Engine with an injected storage backend
    pub fn with_store(store: S) -> Self {
        Self {
            registry: CalculatorRegistry::default(),
            interactions: InteractionEngine::default(),
            cache: DailyTargetCache::new(store),
        }
    }

    /// Evaluate one reading, without interaction adjustment
    pub fn evaluate(&self, metric: &HealthMetric, profile: &UserProfile) -> MetricImpactDetail {
        self.registry.evaluate(metric, profile)
    }

    /// Interaction-adjusted per-day impact details for a metric set
    pub fn evaluate_all(
        &self,
        metrics: &[HealthMetric],
        profile: &UserProfile,
    ) -> Vec<MetricImpactDetail> {
        ImpactAggregator::new(&self.registry, &self.interactions).evaluate_all(metrics, profile)
    }

    /// Aggregated impact for the reporting period
    pub fn total_impact(
        &self,
        metrics: &[HealthMetric],
        profile: &UserProfile,
        period: ReportingPeriod,
    ) -> TotalImpact {
        ImpactAggregator::new(&self.registry, &self.interactions)
            .total_impact(metrics, profile, period)
    }

    /// Currently-firing interactions, for display
    pub fn active_interactions(&self, metrics: &[HealthMetric]) -> Vec<Interaction> {
        self.interactions.active_interactions(metrics)
    }

    /// Uncached solve for an arbitrary goal
    pub fn solve_target(
        &self,
        metric: &HealthMetric,
        profile: &UserProfile,
        goal: TargetGoal,
    ) -> SolvedTarget {
        TargetSolver::new(&self.registry).solve(metric, profile, goal)
    }

    /// Cached neutral target for (metric type, period)
    pub fn daily_target(
        &mut self,
        metric: &HealthMetric,
        profile: &UserProfile,
        period: ReportingPeriod,
    ) -> DailyTarget {
        self.daily_target_at(metric, profile, period, Utc::now())
    }

    /// Clock-injected variant of [`daily_target`](Self::daily_target)
    pub fn daily_target_at(
        &mut self,
        metric: &HealthMetric,
        profile: &UserProfile,
        period: ReportingPeriod,
        now: DateTime<Utc>,
    ) -> DailyTarget {
        let solver = TargetSolver::new(&self.registry);
        self.cache
            .get_or_solve_at(&solver, metric, profile, period, now)
    }

    /// Drop the cached target for one (metric type, period)
    pub fn invalidate_target(
        &mut self,
        metric_type: crate::types::MetricType,
        period: ReportingPeriod,
    ) -> Result<(), EngineError> {
        self.cache.invalidate(metric_type, period)
    }
}
