//! Dose-response calculators
//!
//! One calculator per tracked metric, grouped by family:
//!
//! - **activity**: steps, exercise, active calories, stand hours
//! - **cardio**: resting HR, HRV, VO2 max, cardio recovery
//! - **lifestyle**: sleep, BMI, alcohol, smoking, stress, nutrition, mindfulness
//!
//! Calculators are pure functions of `(value, profile)`: no I/O, no shared
//! mutable state. They are dispatched through [`CalculatorRegistry`] so new
//! metrics can be added without touching the solver or aggregator.

pub mod activity;
pub mod cardio;
pub mod lifestyle;

use crate::curve::DoseResponseCurve;
use crate::types::{
    CalculationMethod, HealthMetric, MetricImpactDetail, MetricType, ResponseShape,
    StudyReference, UserProfile,
};
use chrono::Utc;
use std::collections::HashMap;

/// Common interface for every metric's impact calculator
pub trait ImpactCalculator: Send + Sync {
    /// Metric this calculator evaluates
    fn metric_type(&self) -> MetricType;

    /// Shape of the response curve, used by the solver to pick a bracket side
    fn shape(&self) -> ResponseShape;

    /// Floor and ceiling of the solver's search bracket
    fn search_bounds(&self) -> (f64, f64);

    /// Evaluate the metric value against the user's profile.
    ///
    /// Must degrade gracefully: a profile missing required fields yields a
    /// zero-impact `AlgorithmicEstimate` result, never an error.
    fn evaluate(&self, value: f64, profile: &UserProfile) -> MetricImpactDetail;
}

/// Impact tables are calibrated for a 40-year-old; the marginal effect of a
/// habit shifts modestly with age.
fn age_modifier(age_years: f64) -> f64 {
    (1.0 + (age_years - 40.0) * 0.005).clamp(0.75, 1.25)
}

/// Breakpoint-table calculator backing all tracked metrics
pub struct CurveCalculator {
    pub metric_type: MetricType,
    /// Human-readable metric name used in recommendations
    pub label: &'static str,
    pub unit: &'static str,
    pub curve: DoseResponseCurve,
    pub shape: ResponseShape,
    /// Method reported for in-range evaluations
    pub method: CalculationMethod,
    /// Nominal neutral value for this metric
    pub baseline: f64,
    pub references: &'static [(&'static str, u16)],
}

impl CurveCalculator {
    fn study_references(&self) -> Vec<StudyReference> {
        self.references
            .iter()
            .map(|(citation, year)| StudyReference {
                citation: (*citation).to_string(),
                year: *year,
                url: None,
            })
            .collect()
    }

    fn recommendation(&self, impact: f64) -> String {
        if impact <= -0.5 {
            match self.shape {
                ResponseShape::IncreasingBenefit => format!(
                    "Work toward {} {} of {} to reach a neutral impact.",
                    self.baseline, self.unit, self.label
                ),
                ResponseShape::DecreasingBenefit => format!(
                    "Bring your {} down toward {} {} to reach a neutral impact.",
                    self.label, self.baseline, self.unit
                ),
                ResponseShape::UShaped { optimum } => format!(
                    "Aim for about {} {} of {}.",
                    optimum, self.unit, self.label
                ),
            }
        } else if impact >= 0.5 {
            format!("Your {} is adding time. Keep it up.", self.label)
        } else {
            format!("Your {} is close to neutral.", self.label)
        }
    }
}

impl ImpactCalculator for CurveCalculator {
    fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    fn shape(&self) -> ResponseShape {
        self.shape
    }

    fn search_bounds(&self) -> (f64, f64) {
        self.curve.domain()
    }

    fn evaluate(&self, value: f64, profile: &UserProfile) -> MetricImpactDetail {
        let Some(age) = profile.age_years(Utc::now()) else {
            return MetricImpactDetail::degraded(self.metric_type, value);
        };

        let point = self.curve.evaluate(value);
        let impact = point.impact * age_modifier(age);

        // Extreme extrapolations are lower-confidence; report them as
        // algorithmic estimates rather than interpolation.
        let method = if point.extrapolated {
            CalculationMethod::AlgorithmicEstimate
        } else {
            self.method
        };

        MetricImpactDetail {
            metric_type: self.metric_type,
            current_value: value,
            baseline_value: self.baseline,
            lifespan_impact_minutes: impact,
            calculation_method: method,
            study_references: self.study_references(),
            recommendation: self.recommendation(impact),
        }
    }
}

/// Registry mapping metric type to its calculator
pub struct CalculatorRegistry {
    calculators: HashMap<MetricType, Box<dyn ImpactCalculator>>,
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            calculators: HashMap::new(),
        };
        for calculator in activity::calculators() {
            registry.register(calculator);
        }
        for calculator in cardio::calculators() {
            registry.register(calculator);
        }
        for calculator in lifestyle::calculators() {
            registry.register(calculator);
        }
        registry
    }
}

impl CalculatorRegistry {
    pub fn register(&mut self, calculator: Box<dyn ImpactCalculator>) {
        self.calculators.insert(calculator.metric_type(), calculator);
    }

    pub fn get(&self, metric_type: MetricType) -> Option<&dyn ImpactCalculator> {
        self.calculators.get(&metric_type).map(|c| c.as_ref())
    }

    /// Evaluate one reading. An unregistered metric type degrades to a
    /// zero-impact estimate rather than failing.
    pub fn evaluate(&self, metric: &HealthMetric, profile: &UserProfile) -> MetricImpactDetail {
        match self.get(metric.metric_type) {
            Some(calculator) => calculator.evaluate(metric.value, profile),
            None => MetricImpactDetail::degraded(metric.metric_type, metric.value),
        }
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::{BiologicalSex, HealthMetric, MetricSource, MetricType, UserProfile};
    use chrono::{TimeZone, Utc};

    pub fn test_profile() -> UserProfile {
        UserProfile {
            birth_year: Some(1985),
            sex: BiologicalSex::Unspecified,
            height_cm: Some(175.0),
            weight_kg: Some(72.0),
            has_premium: true,
            onboarding_complete: true,
        }
    }

    pub fn reading(metric_type: MetricType, value: f64) -> HealthMetric {
        HealthMetric::new(
            metric_type,
            value,
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            MetricSource::DeviceMeasured,
        )
    }
}
