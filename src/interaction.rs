//! Interaction effect engine
//!
//! Some metric pairs are known to amplify or dampen each other's effect:
//! good sleep multiplies the return on exercise, alcohol blunts what a high
//! HRV would otherwise signal. Rules are static registrations; when several
//! rules fire for the same metric their multipliers compose in registration
//! order.
//!
//! Adjustment is a pure transform over a per-call copy of the input, so
//! re-running it on unadjusted calculator output always yields the same
//! result and adjusted values are never written back into calculator output.

use crate::types::{HealthMetric, Interaction, InteractionKind, MetricImpactDetail, MetricType};

/// A registered pairwise interaction
pub struct InteractionRule {
    pub name: &'static str,
    pub kind: InteractionKind,
    /// Both metrics must be present for the rule to be considered
    pub trigger: (MetricType, MetricType),
    /// Predicate over the trigger metrics' current values, in trigger order
    pub condition: fn(f64, f64) -> bool,
    pub affected: MetricType,
    /// >1 amplifies (synergy), <1 dampens (antagonism)
    pub multiplier: f64,
}

impl InteractionRule {
    fn fires(&self, metrics: &[HealthMetric]) -> bool {
        let first = latest_value(metrics, self.trigger.0);
        let second = latest_value(metrics, self.trigger.1);
        match (first, second) {
            (Some(a), Some(b)) => (self.condition)(a, b),
            _ => false,
        }
    }
}

/// Most recent reading for a metric type, by reading date
fn latest_value(metrics: &[HealthMetric], metric_type: MetricType) -> Option<f64> {
    metrics
        .iter()
        .filter(|m| m.metric_type == metric_type)
        .max_by_key(|m| m.date)
        .map(|m| m.value)
}

/// Engine holding the registered rule set
pub struct InteractionEngine {
    rules: Vec<InteractionRule>,
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self {
            rules: vec![
                InteractionRule {
                    name: "sleep-exercise synergy",
                    kind: InteractionKind::Synergy,
                    trigger: (MetricType::SleepHours, MetricType::ExerciseMinutes),
                    condition: |sleep, exercise| sleep >= 7.0 && exercise >= 20.0,
                    affected: MetricType::SleepHours,
                    multiplier: 1.15,
                },
                InteractionRule {
                    name: "sleep-exercise synergy",
                    kind: InteractionKind::Synergy,
                    trigger: (MetricType::SleepHours, MetricType::ExerciseMinutes),
                    condition: |sleep, exercise| sleep >= 7.0 && exercise >= 20.0,
                    affected: MetricType::ExerciseMinutes,
                    multiplier: 1.15,
                },
                InteractionRule {
                    name: "alcohol-HRV antagonism",
                    kind: InteractionKind::Antagonism,
                    trigger: (MetricType::AlcoholConsumption, MetricType::HeartRateVariability),
                    condition: |alcohol, _hrv| alcohol > 0.0,
                    affected: MetricType::HeartRateVariability,
                    multiplier: 0.75,
                },
                InteractionRule {
                    name: "mindfulness-stress buffering",
                    kind: InteractionKind::Antagonism,
                    trigger: (MetricType::StressLevel, MetricType::MindfulnessMinutes),
                    condition: |_stress, mindfulness| mindfulness >= 10.0,
                    affected: MetricType::StressLevel,
                    multiplier: 0.85,
                },
                InteractionRule {
                    name: "smoking-exercise antagonism",
                    kind: InteractionKind::Antagonism,
                    trigger: (MetricType::Smoking, MetricType::ExerciseMinutes),
                    condition: |cigarettes, _exercise| cigarettes > 0.0,
                    affected: MetricType::ExerciseMinutes,
                    multiplier: 0.80,
                },
            ],
        }
    }
}

impl InteractionEngine {
    pub fn new(rules: Vec<InteractionRule>) -> Self {
        Self { rules }
    }

    /// Rescale per-metric impacts for every firing rule. Returns a fresh
    /// list; the input is never modified.
    pub fn adjust(
        &self,
        impacts: &[MetricImpactDetail],
        metrics: &[HealthMetric],
    ) -> Vec<MetricImpactDetail> {
        let firing: Vec<&InteractionRule> =
            self.rules.iter().filter(|r| r.fires(metrics)).collect();

        impacts
            .iter()
            .map(|impact| {
                let mut adjusted = impact.clone();
                for rule in firing.iter().filter(|r| r.affected == impact.metric_type) {
                    adjusted.lifespan_impact_minutes *= rule.multiplier;
                }
                adjusted
            })
            .collect()
    }

    /// Currently-firing interactions, for display only. Has no effect on any
    /// computation path.
    pub fn active_interactions(&self, metrics: &[HealthMetric]) -> Vec<Interaction> {
        self.rules
            .iter()
            .filter(|r| r.fires(metrics))
            .map(|r| Interaction {
                name: r.name.to_string(),
                kind: r.kind,
                trigger_metrics: [r.trigger.0, r.trigger.1],
                affected_metric: r.affected,
                multiplier: r.multiplier,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{reading, test_profile};
    use crate::calculators::CalculatorRegistry;

    fn evaluate_all(
        registry: &CalculatorRegistry,
        metrics: &[HealthMetric],
    ) -> Vec<MetricImpactDetail> {
        let profile = test_profile();
        metrics.iter().map(|m| registry.evaluate(m, &profile)).collect()
    }

    #[test]
    fn test_sleep_exercise_synergy_multiplier() {
        let registry = CalculatorRegistry::default();
        let engine = InteractionEngine::default();
        let metrics = vec![
            reading(MetricType::SleepHours, 7.5),
            reading(MetricType::ExerciseMinutes, 30.0),
        ];

        let impacts = evaluate_all(&registry, &metrics);
        let adjusted = engine.adjust(&impacts, &metrics);

        for (before, after) in impacts.iter().zip(&adjusted) {
            let expected = before.lifespan_impact_minutes * 1.15;
            assert!(
                (after.lifespan_impact_minutes - expected).abs() < 1e-9,
                "{} not boosted",
                before.metric_type
            );
        }
    }

    #[test]
    fn test_synergy_requires_both_conditions() {
        let engine = InteractionEngine::default();
        let registry = CalculatorRegistry::default();

        // Exercise below the 20-minute threshold: no boost
        let metrics = vec![
            reading(MetricType::SleepHours, 7.5),
            reading(MetricType::ExerciseMinutes, 10.0),
        ];
        let impacts = evaluate_all(&registry, &metrics);
        let adjusted = engine.adjust(&impacts, &metrics);
        for (before, after) in impacts.iter().zip(&adjusted) {
            assert_eq!(
                before.lifespan_impact_minutes,
                after.lifespan_impact_minutes
            );
        }
    }

    #[test]
    fn test_alcohol_hrv_antagonism() {
        let registry = CalculatorRegistry::default();
        let engine = InteractionEngine::default();
        let metrics = vec![
            reading(MetricType::AlcoholConsumption, 2.0),
            reading(MetricType::HeartRateVariability, 70.0),
        ];

        let impacts = evaluate_all(&registry, &metrics);
        let adjusted = engine.adjust(&impacts, &metrics);

        let hrv_before = impacts
            .iter()
            .find(|i| i.metric_type == MetricType::HeartRateVariability)
            .unwrap();
        let hrv_after = adjusted
            .iter()
            .find(|i| i.metric_type == MetricType::HeartRateVariability)
            .unwrap();
        assert!(
            (hrv_after.lifespan_impact_minutes - hrv_before.lifespan_impact_minutes * 0.75).abs()
                < 1e-9
        );

        // Alcohol's own impact is untouched by this rule
        let alcohol_before = impacts
            .iter()
            .find(|i| i.metric_type == MetricType::AlcoholConsumption)
            .unwrap();
        let alcohol_after = adjusted
            .iter()
            .find(|i| i.metric_type == MetricType::AlcoholConsumption)
            .unwrap();
        assert_eq!(
            alcohol_before.lifespan_impact_minutes,
            alcohol_after.lifespan_impact_minutes
        );
    }

    #[test]
    fn test_adjust_is_idempotent_over_unadjusted_input() {
        let registry = CalculatorRegistry::default();
        let engine = InteractionEngine::default();
        let metrics = vec![
            reading(MetricType::SleepHours, 8.0),
            reading(MetricType::ExerciseMinutes, 45.0),
        ];

        let impacts = evaluate_all(&registry, &metrics);
        let once = engine.adjust(&impacts, &metrics);
        let twice = engine.adjust(&impacts, &metrics);

        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.lifespan_impact_minutes, b.lifespan_impact_minutes);
        }
    }

    #[test]
    fn test_multipliers_compose_in_registration_order() {
        let registry = CalculatorRegistry::default();
        let engine = InteractionEngine::default();
        // Exercise is affected by both the sleep synergy and the smoking
        // antagonism
        let metrics = vec![
            reading(MetricType::SleepHours, 7.5),
            reading(MetricType::ExerciseMinutes, 40.0),
            reading(MetricType::Smoking, 3.0),
        ];

        let impacts = evaluate_all(&registry, &metrics);
        let adjusted = engine.adjust(&impacts, &metrics);

        let exercise_before = impacts
            .iter()
            .find(|i| i.metric_type == MetricType::ExerciseMinutes)
            .unwrap();
        let exercise_after = adjusted
            .iter()
            .find(|i| i.metric_type == MetricType::ExerciseMinutes)
            .unwrap();
        let expected = exercise_before.lifespan_impact_minutes * 1.15 * 0.80;
        assert!((exercise_after.lifespan_impact_minutes - expected).abs() < 1e-9);
    }

    #[test]
    fn test_active_interactions_are_display_only() {
        let engine = InteractionEngine::default();
        let metrics = vec![
            reading(MetricType::SleepHours, 7.5),
            reading(MetricType::ExerciseMinutes, 30.0),
            reading(MetricType::AlcoholConsumption, 1.0),
            reading(MetricType::HeartRateVariability, 60.0),
        ];

        let active = engine.active_interactions(&metrics);
        assert_eq!(active.len(), 3);
        assert!(active
            .iter()
            .any(|i| i.kind == InteractionKind::Antagonism && i.multiplier == 0.75));
    }
}
