//! Cardiovascular-family calculators
//!
//! Resting heart rate improves as it falls; HRV, VO2 max, and post-exercise
//! heart rate recovery improve as they rise.

use super::{CurveCalculator, ImpactCalculator};
use crate::curve::DoseResponseCurve;
use crate::types::{CalculationMethod, MetricType, ResponseShape};

/// Resting heart rate (bpm). Neutral at 60; risk climbs steeply past 80.
const RESTING_HEART_RATE: DoseResponseCurve = DoseResponseCurve::new(&[
    (40.0, 10.0),
    (50.0, 5.0),
    (60.0, 0.0),
    (70.0, -7.0),
    (80.0, -16.0),
    (95.0, -30.0),
    (110.0, -45.0),
]);

/// Heart rate variability, RMSSD (ms)
const HEART_RATE_VARIABILITY: DoseResponseCurve = DoseResponseCurve::new(&[
    (15.0, -18.0),
    (25.0, -10.0),
    (40.0, 0.0),
    (55.0, 4.0),
    (70.0, 8.0),
    (100.0, 12.0),
]);

/// VO2 max (ml/kg/min)
const VO2_MAX: DoseResponseCurve = DoseResponseCurve::new(&[
    (20.0, -25.0),
    (30.0, -10.0),
    (38.0, 0.0),
    (45.0, 6.0),
    (55.0, 12.0),
    (65.0, 16.0),
]);

/// Heart rate recovery one minute after exercise (bpm drop)
const CARDIO_RECOVERY: DoseResponseCurve = DoseResponseCurve::new(&[
    (10.0, -15.0),
    (18.0, -6.0),
    (25.0, 0.0),
    (35.0, 6.0),
    (50.0, 10.0),
]);

pub fn calculators() -> Vec<Box<dyn ImpactCalculator>> {
    vec![
        Box::new(CurveCalculator {
            metric_type: MetricType::RestingHeartRate,
            label: "resting heart rate",
            unit: "bpm",
            curve: RESTING_HEART_RATE,
            shape: ResponseShape::DecreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 60.0,
            references: &[
                ("Zhang et al., CMAJ: resting heart rate and all-cause mortality", 2016),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::HeartRateVariability,
            label: "heart rate variability",
            unit: "ms",
            curve: HEART_RATE_VARIABILITY,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 40.0,
            references: &[
                ("Jarczok et al., Neuroscience & Biobehavioral Reviews: HRV and mortality", 2022),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::Vo2Max,
            label: "VO2 max",
            unit: "ml/kg/min",
            curve: VO2_MAX,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 38.0,
            references: &[
                ("Mandsager et al., JAMA Network Open: cardiorespiratory fitness", 2018),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::CardioRecovery,
            label: "cardio recovery",
            unit: "bpm",
            curve: CARDIO_RECOVERY,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 25.0,
            references: &[
                ("Cole et al., NEJM: heart-rate recovery after exercise", 1999),
            ],
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_profile;
    use super::*;

    #[test]
    fn test_resting_heart_rate_improves_downward() {
        let calcs = calculators();
        let rhr = calcs
            .iter()
            .find(|c| c.metric_type() == MetricType::RestingHeartRate)
            .unwrap();
        let profile = test_profile();

        let elevated = rhr.evaluate(85.0, &profile).lifespan_impact_minutes;
        let athletic = rhr.evaluate(48.0, &profile).lifespan_impact_minutes;
        assert!(elevated < 0.0);
        assert!(athletic > 0.0);
        assert_eq!(rhr.shape(), ResponseShape::DecreasingBenefit);
    }

    #[test]
    fn test_hrv_neutral_at_baseline() {
        let calcs = calculators();
        let hrv = calcs
            .iter()
            .find(|c| c.metric_type() == MetricType::HeartRateVariability)
            .unwrap();

        let detail = hrv.evaluate(40.0, &test_profile());
        assert!(detail.lifespan_impact_minutes.abs() < 1e-9);
        assert!(!detail.study_references.is_empty());
    }
}
