//! Impact aggregation
//!
//! Evaluates every metric through the calculator registry, applies interaction
//! adjustment, sums the per-day impacts, and scales the result for the
//! requested reporting period. Scaling by the period's day count happens here
//! exactly once; calculators always work per-day.

use crate::calculators::CalculatorRegistry;
use crate::interaction::InteractionEngine;
use crate::types::{
    HealthMetric, MetricImpactDetail, MetricType, ReportingPeriod, TotalImpact, UserProfile,
};
use std::collections::BTreeMap;

pub struct ImpactAggregator<'a> {
    registry: &'a CalculatorRegistry,
    interactions: &'a InteractionEngine,
}

impl<'a> ImpactAggregator<'a> {
    pub fn new(registry: &'a CalculatorRegistry, interactions: &'a InteractionEngine) -> Self {
        Self {
            registry,
            interactions,
        }
    }

    /// Interaction-adjusted per-day impact details for the freshest reading
    /// of each tracked metric type
    pub fn evaluate_all(
        &self,
        metrics: &[HealthMetric],
        profile: &UserProfile,
    ) -> Vec<MetricImpactDetail> {
        let freshest = freshest_per_type(metrics);
        let impacts: Vec<MetricImpactDetail> = freshest
            .iter()
            .map(|m| self.registry.evaluate(m, profile))
            .collect();
        self.interactions.adjust(&impacts, metrics)
    }

    /// Total impact across the metric set, scaled to the reporting period
    pub fn total_impact(
        &self,
        metrics: &[HealthMetric],
        profile: &UserProfile,
        period: ReportingPeriod,
    ) -> TotalImpact {
        let adjusted = self.evaluate_all(metrics, profile);
        let scale = period.day_count();

        let mut per_metric_impacts = BTreeMap::new();
        let mut total = 0.0;
        for impact in &adjusted {
            total += impact.lifespan_impact_minutes;
            per_metric_impacts
                .insert(impact.metric_type, impact.lifespan_impact_minutes * scale);
        }

        TotalImpact {
            total_impact_minutes: total * scale,
            per_metric_impacts,
            period,
        }
    }
}

/// Keep only the most recent reading per metric type, preserving first-seen
/// type order
fn freshest_per_type(metrics: &[HealthMetric]) -> Vec<HealthMetric> {
    let mut order: Vec<MetricType> = Vec::new();
    let mut best: BTreeMap<MetricType, HealthMetric> = BTreeMap::new();

    for metric in metrics {
        let replace = match best.get(&metric.metric_type) {
            Some(existing) => existing.date < metric.date,
            None => {
                order.push(metric.metric_type);
                true
            }
        };
        if replace {
            best.insert(metric.metric_type, metric.clone());
        }
    }

    order.into_iter().filter_map(|t| best.remove(&t)).collect()
}
