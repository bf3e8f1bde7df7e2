//! Lifestyle-family calculators
//!
//! Sleep follows a U-shaped curve with an interior optimum; the remaining
//! metrics are monotonic. Questionnaire-derived metrics (stress, nutrition,
//! mindfulness) have no single dose-response literature and are reported as
//! expert-consensus estimates.

use super::{CurveCalculator, ImpactCalculator};
use crate::curve::DoseResponseCurve;
use crate::types::{CalculationMethod, MetricType, ResponseShape};

/// Nightly sleep duration (hours). Both short and long sleep carry risk;
/// the optimum sits at 7.5 h.
const SLEEP_HOURS: DoseResponseCurve = DoseResponseCurve::new(&[
    (3.0, -65.0),
    (5.0, -28.0),
    (6.5, -6.0),
    (7.0, 3.0),
    (7.5, 9.0),
    (8.25, 4.0),
    (9.0, -2.0),
    (10.0, -14.0),
    (12.0, -40.0),
]);

/// Body mass index (kg/m²)
const BODY_MASS_INDEX: DoseResponseCurve = DoseResponseCurve::new(&[
    (19.0, 6.0),
    (23.0, 2.0),
    (25.0, 0.0),
    (28.0, -8.0),
    (32.0, -22.0),
    (38.0, -45.0),
]);

/// Alcohol consumption (standard drinks per day)
const ALCOHOL_CONSUMPTION: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, 2.0),
    (1.0, -6.0),
    (2.0, -18.0),
    (4.0, -45.0),
    (7.0, -90.0),
]);

/// Cigarettes smoked per day
const SMOKING: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, 0.0),
    (1.0, -15.0),
    (5.0, -60.0),
    (10.0, -110.0),
    (20.0, -180.0),
]);

/// Self-reported stress level (1-10)
const STRESS_LEVEL: DoseResponseCurve = DoseResponseCurve::new(&[
    (1.0, 6.0),
    (3.0, 2.0),
    (4.0, 0.0),
    (6.0, -8.0),
    (8.0, -20.0),
    (10.0, -35.0),
]);

/// Diet quality score (0-100)
const NUTRITION_SCORE: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, -35.0),
    (30.0, -15.0),
    (55.0, 0.0),
    (70.0, 6.0),
    (85.0, 12.0),
    (100.0, 16.0),
]);

/// Mindfulness practice (minutes per day)
const MINDFULNESS_MINUTES: DoseResponseCurve = DoseResponseCurve::new(&[
    (0.0, 0.0),
    (10.0, 3.0),
    (20.0, 5.0),
    (40.0, 8.0),
    (60.0, 10.0),
]);

pub fn calculators() -> Vec<Box<dyn ImpactCalculator>> {
    vec![
        Box::new(CurveCalculator {
            metric_type: MetricType::SleepHours,
            label: "sleep",
            unit: "hours",
            curve: SLEEP_HOURS,
            shape: ResponseShape::UShaped { optimum: 7.5 },
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 7.5,
            references: &[
                ("Cappuccio et al., Sleep: sleep duration and all-cause mortality", 2010),
                ("Svensson et al., JAMA Network Open: sleep duration in Asian cohorts", 2021),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::BodyMassIndex,
            label: "body mass index",
            unit: "kg/m²",
            curve: BODY_MASS_INDEX,
            shape: ResponseShape::DecreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 25.0,
            references: &[
                ("Global BMI Mortality Collaboration, Lancet: BMI and all-cause mortality", 2016),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::AlcoholConsumption,
            label: "alcohol intake",
            unit: "drinks",
            curve: ALCOHOL_CONSUMPTION,
            shape: ResponseShape::DecreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 0.0,
            references: &[
                ("GBD 2016 Alcohol Collaborators, Lancet: alcohol use and burden", 2018),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::Smoking,
            label: "smoking",
            unit: "cigarettes",
            curve: SMOKING,
            shape: ResponseShape::DecreasingBenefit,
            method: CalculationMethod::DoseResponseInterpolation,
            baseline: 0.0,
            references: &[
                ("Jha et al., NEJM: 21st-century hazards of smoking", 2013),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::StressLevel,
            label: "stress level",
            unit: "points",
            curve: STRESS_LEVEL,
            shape: ResponseShape::DecreasingBenefit,
            method: CalculationMethod::ExpertConsensus,
            baseline: 4.0,
            references: &[
                ("Russ et al., BMJ: psychological distress and mortality pooling", 2012),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::NutritionScore,
            label: "nutrition score",
            unit: "points",
            curve: NUTRITION_SCORE,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::ExpertConsensus,
            baseline: 55.0,
            references: &[
                ("Shan et al., JAMA Internal Medicine: dietary patterns and mortality", 2020),
            ],
        }),
        Box::new(CurveCalculator {
            metric_type: MetricType::MindfulnessMinutes,
            label: "mindfulness",
            unit: "minutes",
            curve: MINDFULNESS_MINUTES,
            shape: ResponseShape::IncreasingBenefit,
            method: CalculationMethod::ExpertConsensus,
            baseline: 0.0,
            references: &[
                ("Goyal et al., JAMA Internal Medicine: meditation programs meta-analysis", 2014),
            ],
        }),
    ]
}
