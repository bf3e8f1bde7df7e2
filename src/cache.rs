//! Daily target cache
//!
//! Without a cache the recommendation surface would re-run bisection (dozens
//! of calculator calls) on every render. Solved targets are therefore kept in
//! an injected key-value store, one entry per (metric type, period), and
//! reused until the live value drifts at least 1% from the value the target
//! was solved against or the entry ages past its calendar day.
//!
//! The store is an external collaborator with last-write-wins semantics. A
//! store failure is treated as a cache miss: the engine falls back to an
//! uncached synchronous solve rather than propagating the storage error.

use crate::error::EngineError;
use crate::solver::{TargetGoal, TargetSolver};
use crate::types::{DailyTarget, HealthMetric, MetricType, ReportingPeriod, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relative drift at which a cached target is no longer trusted
pub const DRIFT_THRESHOLD: f64 = 0.01;

/// Generic key-value backend for persisted targets
pub trait TargetStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError>;
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), EngineError>;
    fn delete(&mut self, key: &str) -> Result<(), EngineError>;
}

/// In-memory store, used by the FFI engine handle and in tests. Can be
/// round-tripped through JSON so a host app can persist it across launches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TargetStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), EngineError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), EngineError> {
        self.entries.remove(key);
        Ok(())
    }
}

fn cache_key(metric_type: MetricType, period: ReportingPeriod) -> String {
    format!("daily_target:{}:{}", metric_type, period)
}

/// Staleness-aware cache wrapping the target solver
pub struct DailyTargetCache<S: TargetStore> {
    store: S,
}

impl<S: TargetStore> DailyTargetCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Return the cached target for (metric type, period), solving and
    /// caching a fresh one when the entry is absent, expired, undecodable,
    /// or stale against the live value.
    pub fn get_or_solve(
        &mut self,
        solver: &TargetSolver<'_>,
        metric: &HealthMetric,
        profile: &UserProfile,
        period: ReportingPeriod,
    ) -> DailyTarget {
        self.get_or_solve_at(solver, metric, profile, period, Utc::now())
    }

    /// Clock-injected variant of [`get_or_solve`](Self::get_or_solve)
    pub fn get_or_solve_at(
        &mut self,
        solver: &TargetSolver<'_>,
        metric: &HealthMetric,
        profile: &UserProfile,
        period: ReportingPeriod,
        now: DateTime<Utc>,
    ) -> DailyTarget {
        let key = cache_key(metric.metric_type, period);

        match self.store.get(&key) {
            Ok(Some(bytes)) => {
                match serde_json::from_slice::<DailyTarget>(&bytes) {
                    Ok(cached) => {
                        if cached.created_at.date_naive() < now.date_naive() {
                            // Expired: sweep and fall through to a fresh solve
                            let _ = self.store.delete(&key);
                        } else {
                            let drift = (metric.value - cached.original_current_value).abs()
                                / cached.original_current_value.max(1.0);
                            if drift < DRIFT_THRESHOLD {
                                return cached;
                            }
                            // Stale: the live value moved materially
                            let _ = self.store.delete(&key);
                        }
                    }
                    Err(_) => {
                        // Undecodable entry, drop it
                        let _ = self.store.delete(&key);
                    }
                }
                self.solve_and_cache(solver, metric, profile, period, now, true)
            }
            Ok(None) => self.solve_and_cache(solver, metric, profile, period, now, true),
            // Store read failed: degrade to an uncached solve
            Err(_) => self.solve_and_cache(solver, metric, profile, period, now, false),
        }
    }

    /// Drop the cached entry for one (metric type, period)
    pub fn invalidate(
        &mut self,
        metric_type: MetricType,
        period: ReportingPeriod,
    ) -> Result<(), EngineError> {
        self.store.delete(&cache_key(metric_type, period))
    }

    fn solve_and_cache(
        &mut self,
        solver: &TargetSolver<'_>,
        metric: &HealthMetric,
        profile: &UserProfile,
        period: ReportingPeriod,
        now: DateTime<Utc>,
        persist: bool,
    ) -> DailyTarget {
        let solved = solver.solve(metric, profile, TargetGoal::Neutral);

        // Benefit is per-day at the solver boundary; scale exactly once here
        let target = DailyTarget {
            metric_type: metric.metric_type,
            period,
            target_value: solved.target_value,
            original_current_value: metric.value,
            benefit_minutes: solved.benefit_minutes * period.day_count(),
            created_at: now,
        };

        if persist {
            if let Ok(bytes) = serde_json::to_vec(&target) {
                // Write failures degrade to an uncached result
                let _ = self.store.set(&cache_key(metric.metric_type, period), bytes);
            }
        }

        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{reading, test_profile};
    use crate::calculators::CalculatorRegistry;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    struct FailingStore;

    impl TargetStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, EngineError> {
            Err(EngineError::Storage("disk unavailable".into()))
        }

        fn set(&mut self, _key: &str, _value: Vec<u8>) -> Result<(), EngineError> {
            Err(EngineError::Storage("disk unavailable".into()))
        }

        fn delete(&mut self, _key: &str) -> Result<(), EngineError> {
            Err(EngineError::Storage("disk unavailable".into()))
        }
    }

    #[test]
    fn test_miss_solves_and_caches() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();
        let metric = reading(MetricType::Steps, 2000.0);

        let target =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());

        assert_eq!(target.original_current_value, 2000.0);
        assert!(target.target_value > 2000.0);
        assert_eq!(cache.store().len(), 1);
    }

    #[test]
    fn test_small_drift_returns_cached_entry() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();

        let first = cache.get_or_solve_at(
            &solver,
            &reading(MetricType::Steps, 2000.0),
            &profile,
            ReportingPeriod::Day,
            now(),
        );

        // 0.5% drift: cached target survives unchanged
        let second = cache.get_or_solve_at(
            &solver,
            &reading(MetricType::Steps, 2010.0),
            &profile,
            ReportingPeriod::Day,
            now() + Duration::hours(1),
        );

        assert_eq!(second.original_current_value, first.original_current_value);
        assert_eq!(second.target_value, first.target_value);
        assert_eq!(second.created_at, first.created_at);
    }

    #[test]
    fn test_material_drift_forces_resolve() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();

        cache.get_or_solve_at(
            &solver,
            &reading(MetricType::Steps, 2000.0),
            &profile,
            ReportingPeriod::Day,
            now(),
        );

        // 2% drift: entry is discarded and re-solved against the new value
        let resolved = cache.get_or_solve_at(
            &solver,
            &reading(MetricType::Steps, 2040.0),
            &profile,
            ReportingPeriod::Day,
            now() + Duration::hours(1),
        );

        assert_eq!(resolved.original_current_value, 2040.0);
    }

    #[test]
    fn test_calendar_day_expiry() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();
        let metric = reading(MetricType::SleepHours, 5.0);

        let first =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());

        // Same value next morning: entry is from a previous calendar day
        let next_day = cache.get_or_solve_at(
            &solver,
            &metric,
            &profile,
            ReportingPeriod::Day,
            now() + Duration::days(1),
        );

        assert!(next_day.created_at > first.created_at);
    }

    #[test]
    fn test_store_failure_degrades_to_uncached_solve() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(FailingStore);
        let profile = test_profile();
        let metric = reading(MetricType::Steps, 2000.0);

        let target =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());
        assert!(target.target_value > 2000.0);
    }

    #[test]
    fn test_corrupt_entry_is_replaced() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();
        let metric = reading(MetricType::Steps, 2000.0);

        let key = cache_key(MetricType::Steps, ReportingPeriod::Day);
        cache.store_mut().set(&key, b"not json".to_vec()).unwrap();

        let target =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());
        assert_eq!(target.original_current_value, 2000.0);
    }

    #[test]
    fn test_benefit_scales_with_period() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();
        let metric = reading(MetricType::Steps, 2000.0);

        let day =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());
        let month =
            cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Month, now());

        assert!((month.benefit_minutes - 30.0 * day.benefit_minutes).abs() < 0.1);
        // Separate entries per period
        assert_eq!(cache.store().len(), 2);
    }

    #[test]
    fn test_invalidate_clears_entry() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let mut cache = DailyTargetCache::new(MemoryStore::new());
        let profile = test_profile();
        let metric = reading(MetricType::Steps, 2000.0);

        cache.get_or_solve_at(&solver, &metric, &profile, ReportingPeriod::Day, now());
        cache
            .invalidate(MetricType::Steps, ReportingPeriod::Day)
            .unwrap();
        assert!(cache.store().is_empty());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set("daily_target:steps:day", vec![1, 2, 3]).unwrap();

        let json = store.to_json().unwrap();
        let loaded = MemoryStore::from_json(&json).unwrap();
        assert_eq!(loaded.get("daily_target:steps:day").unwrap(), Some(vec![1, 2, 3]));
    }
}
