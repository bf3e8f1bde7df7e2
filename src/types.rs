//! Core types for the Vitalspan engine
//!
//! This module defines the value objects that flow through the engine:
//! metric readings, the user profile, per-metric impact details, aggregated
//! totals, solved daily targets, and interaction records. All of them are
//! read-only once constructed; a new instance is created whenever a fresher
//! result is needed.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Tracked metric kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Steps,
    ExerciseMinutes,
    ActiveCalories,
    StandHours,
    Vo2Max,
    RestingHeartRate,
    HeartRateVariability,
    CardioRecovery,
    SleepHours,
    BodyMassIndex,
    AlcoholConsumption,
    Smoking,
    StressLevel,
    NutritionScore,
    MindfulnessMinutes,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Steps => "steps",
            MetricType::ExerciseMinutes => "exercise_minutes",
            MetricType::ActiveCalories => "active_calories",
            MetricType::StandHours => "stand_hours",
            MetricType::Vo2Max => "vo2_max",
            MetricType::RestingHeartRate => "resting_heart_rate",
            MetricType::HeartRateVariability => "heart_rate_variability",
            MetricType::CardioRecovery => "cardio_recovery",
            MetricType::SleepHours => "sleep_hours",
            MetricType::BodyMassIndex => "body_mass_index",
            MetricType::AlcoholConsumption => "alcohol_consumption",
            MetricType::Smoking => "smoking",
            MetricType::StressLevel => "stress_level",
            MetricType::NutritionScore => "nutrition_score",
            MetricType::MindfulnessMinutes => "mindfulness_minutes",
        }
    }

    /// All tracked metric kinds, in registry order
    pub fn all() -> &'static [MetricType] {
        &[
            MetricType::Steps,
            MetricType::ExerciseMinutes,
            MetricType::ActiveCalories,
            MetricType::StandHours,
            MetricType::Vo2Max,
            MetricType::RestingHeartRate,
            MetricType::HeartRateVariability,
            MetricType::CardioRecovery,
            MetricType::SleepHours,
            MetricType::BodyMassIndex,
            MetricType::AlcoholConsumption,
            MetricType::Smoking,
            MetricType::StressLevel,
            MetricType::NutritionScore,
            MetricType::MindfulnessMinutes,
        ]
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricType::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown metric type: {s}"))
    }
}

/// Where a metric reading came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    DeviceMeasured,
    UserEntered,
}

/// A single health metric reading. Immutable once constructed; a new instance
/// is created whenever a fresher reading is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetric {
    pub id: Uuid,
    pub metric_type: MetricType,
    pub value: f64,
    pub date: DateTime<Utc>,
    pub source: MetricSource,
}

impl HealthMetric {
    pub fn new(
        metric_type: MetricType,
        value: f64,
        date: DateTime<Utc>,
        source: MetricSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            metric_type,
            value,
            date,
            source,
        }
    }
}

/// Biological sex, as used by the dose-response literature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Male,
    Female,
    Unspecified,
}

/// User profile. Owned by the application layer and passed read-only into
/// every calculator call; calculators never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub birth_year: Option<i32>,
    pub sex: BiologicalSex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub has_premium: bool,
    #[serde(default)]
    pub onboarding_complete: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            birth_year: None,
            sex: BiologicalSex::Unspecified,
            height_cm: None,
            weight_kg: None,
            has_premium: false,
            onboarding_complete: false,
        }
    }
}

impl UserProfile {
    /// Age in whole years at the given instant, if a birth year is known
    pub fn age_years(&self, on: DateTime<Utc>) -> Option<f64> {
        self.birth_year.map(|by| f64::from(on.year() - by))
    }
}

/// How an impact figure was derived. Extrapolation outside the studied range
/// and missing-profile degradation both report `AlgorithmicEstimate` so the
/// caller can treat the result as lower-confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    DoseResponseInterpolation,
    ExpertConsensus,
    AlgorithmicEstimate,
}

/// Citation record backing a dose-response curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyReference {
    pub citation: String,
    pub year: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Result of evaluating a single metric. `lifespan_impact_minutes` is always
/// per-day at this boundary; period scaling happens in the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricImpactDetail {
    pub metric_type: MetricType,
    pub current_value: f64,
    pub baseline_value: f64,
    /// Signed lifespan impact, minutes per day
    pub lifespan_impact_minutes: f64,
    pub calculation_method: CalculationMethod,
    pub study_references: Vec<StudyReference>,
    pub recommendation: String,
}

impl MetricImpactDetail {
    /// Zero-impact, low-confidence result used when required inputs are
    /// missing. The engine degrades gracefully instead of failing.
    pub fn degraded(metric_type: MetricType, current_value: f64) -> Self {
        Self {
            metric_type,
            current_value,
            baseline_value: current_value,
            lifespan_impact_minutes: 0.0,
            calculation_method: CalculationMethod::AlgorithmicEstimate,
            study_references: Vec::new(),
            recommendation: String::from(
                "Complete your profile to unlock a personalized estimate for this metric.",
            ),
        }
    }
}

/// Reporting period for aggregated impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingPeriod {
    Day,
    Month,
    Year,
}

impl ReportingPeriod {
    /// Number of days the period scales a per-day figure by
    pub fn day_count(&self) -> f64 {
        match self {
            ReportingPeriod::Day => 1.0,
            ReportingPeriod::Month => 30.0,
            ReportingPeriod::Year => 365.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportingPeriod::Day => "day",
            ReportingPeriod::Month => "month",
            ReportingPeriod::Year => "year",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(ReportingPeriod::Day),
            "month" => Ok(ReportingPeriod::Month),
            "year" => Ok(ReportingPeriod::Year),
            other => Err(format!("unknown reporting period: {other}")),
        }
    }
}

/// Aggregated impact across a metric set. Derived on demand, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalImpact {
    /// Period-scaled total, minutes per period
    pub total_impact_minutes: f64,
    /// Period-scaled per-metric breakdown, for display
    pub per_metric_impacts: BTreeMap<MetricType, f64>,
    pub period: ReportingPeriod,
}

/// A solved target cached per (metric type, period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTarget {
    pub metric_type: MetricType,
    pub period: ReportingPeriod,
    /// Metric value the user would need to reach for the goal impact
    pub target_value: f64,
    /// Metric value at the time the target was solved; staleness is judged
    /// against this
    pub original_current_value: f64,
    /// Signed gain of reaching `target_value`, minutes per period
    pub benefit_minutes: f64,
    pub created_at: DateTime<Utc>,
}

/// Kind of pairwise interaction between metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Synergy,
    Antagonism,
}

/// Active interaction record, exposed purely for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub name: String,
    pub kind: InteractionKind,
    pub trigger_metrics: [MetricType; 2],
    pub affected_metric: MetricType,
    pub multiplier: f64,
}

/// Shape of a metric's dose-response curve, as seen by the target solver.
/// U-shaped metrics expose their interior optimum so the solver can pick a
/// search direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Impact improves as the value increases (steps, exercise)
    IncreasingBenefit,
    /// Impact improves as the value decreases (resting heart rate, stress)
    DecreasingBenefit,
    /// Impact peaks at an interior optimum (sleep)
    UShaped { optimum: f64 },
}
