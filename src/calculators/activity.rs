//! Activity-family calculators
//!
//! Movement metrics all improve with volume: more steps, more exercise, more
//! active energy. Tables follow the large prospective cohort literature, with
//! diminishing returns past the guideline range.

use super::{CurveCalculator, ImpactCalculator};
use crate::curve::DoseResponseCurve;
use crate::types::{CalculationMethod, MetricType, ResponseShape};

/// Daily step count vs all-cause mortality. Neutral at 10k steps; benefit
/// plateaus past ~15k.
const STEPS: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, -70.0),
    (2000.0, -45.0),
    (5000.0, -18.0),
    (8000.0, -5.0),
    (10_000.0, 0.0),
    (12_500.0, 8.0),
    (15_000.0, 13.0),
    (20_000.0, 18.0),
]);

/// Daily moderate-to-vigorous exercise minutes. Neutral at the ~150 min/week
/// guideline spread over a day.
const EXERCISE_MINUTES: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, -28.0),
    (10.0, -12.0),
    (22.5, 0.0),
    (30.0, 6.0),
    (45.0, 14.0),
    (60.0, 20.0),
    (90.0, 25.0),
]);

/// Active energy burned per day (kcal)
const ACTIVE_CALORIES: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, -20.0),
    (150.0, -8.0),
    (300.0, 0.0),
    (450.0, 6.0),
    (600.0, 10.0),
    (900.0, 14.0),
]);

/// Hours per day with at least one minute of standing movement
const STAND_HOURS: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, -12.0),
    (4.0, -6.0),
    (8.0, 0.0),
    (10.0, 2.0),
    (14.0, 4.0),
]);

pub fn calculators() -> Vec<Box<dyn ImpactCalculator>> {
    vec![
        Box::new(CurveCalculator {
            metric_type: MetricType::Steps,
            label: "daily steps",
            unit: "steps",
            curve: STEPS,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 10_000.0,
            references: &[
                ("Paluch et al., Lancet Public Health: daily steps and all-cause mortality", 2022),
                ("Saint-Maurice et al., JAMA: step volume and intensity", 2020),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::ExerciseMinutes,
            label: "exercise",
            unit: "minutes",
            curve: EXERCISE_MINUTES,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 22.5,
            references: &[
                ("Arem et al., JAMA Internal Medicine: leisure time physical activity", 2015),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::ActiveCalories,
            label: "active energy",
            unit: "kcal",
            curve: ACTIVE_CALORIES,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 300.0,
            references: &[
                ("Lee et al., Circulation: energy expenditure and cardiovascular events", 2018),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::StandHours,
            label: "stand hours",
            unit: "hours",
            curve: STAND_HOURS,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 8.0,
            references: &[
                ("Diaz et al., Annals of Internal Medicine: sedentary patterns and mortality", 2017),
            ],
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_profile;
    use super::*;

    #[test]
    fn test_steps_below_baseline_is_negative() {
        let calcs = calculators();
        let steps = calcs
            .iter()
            .find(|c| c.metric_type() == MetricType::Steps)
            .unwrap();

        let detail = steps.evaluate(2000.0, &test_profile());
        assert!(detail.lifespan_impact_minutes < 0.0);
        assert_eq!(detail.baseline_value, 10_000.0);
    }

    #[test]
    fn test_steps_at_baseline_is_neutral() {
        let calcs = calculators();
        let steps = calcs
            .iter()
            .find(|c| c.metric_type() == MetricType::Steps)
            .unwrap();

        let detail = steps.evaluate(10_000.0, &test_profile());
        assert!(detail.lifespan_impact_minutes.abs() < 1e-9);
    }

    #[test]
    fn test_activity_curves_increase_with_volume() {
        let profile = test_profile();
        for calc in calculators() {
            let (lo, hi) = calc.search_bounds();
            let low = calc.evaluate(lo, &profile).lifespan_impact_minutes;
            let high = calc.evaluate(hi, &profile).lifespan_impact_minutes;
            assert!(low < high, "{} not increasing", calc.metric_type());
        }
    }
}
