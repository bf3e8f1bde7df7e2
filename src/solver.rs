//! Target solving
//!
//! Given a metric's current value, finds the value the user would need to
//! reach for a goal impact (usually neutral, i.e. zero marginal effect) by
//! bisection over the metric's dose-response curve. The curve has no closed
//! form once profile modifiers are applied, so the solver only ever queries
//! the calculator.
//!
//! The search is bounded: at most [`MAX_ITERATIONS`] calculator evaluations,
//! each O(1). If the loop exhausts without meeting tolerance the final
//! midpoint is returned as a best-effort target; an imprecise target beats no
//! recommendation.

use crate::calculators::CalculatorRegistry;
use crate::types::{HealthMetric, ResponseShape, UserProfile};
use serde::{Deserialize, Serialize};

/// Iteration cap for one bisection run
pub const MAX_ITERATIONS: usize = 24;

/// Convergence tolerance, minutes per day
pub const IMPACT_TOLERANCE: f64 = 0.5;

/// What the solved target should achieve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetGoal {
    /// Zero marginal lifespan impact
    Neutral,
    /// Impact raised to `current × (1 + factor)`
    RelativeImprovement(f64),
}

/// Outcome of one solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolvedTarget {
    /// Metric value that yields (approximately) the goal impact
    pub target_value: f64,
    /// Impact gain of reaching the target, minutes per day
    pub benefit_minutes: f64,
    /// Calculator evaluations spent
    pub iterations: usize,
    /// False when the iteration budget ran out before meeting tolerance
    pub converged: bool,
}

impl SolvedTarget {
    fn settled(value: f64) -> Self {
        Self {
            target_value: value,
            benefit_minutes: 0.0,
            iterations: 0,
            converged: true,
        }
    }
}

pub struct TargetSolver<'a> {
    registry: &'a CalculatorRegistry,
}

impl<'a> TargetSolver<'a> {
    pub fn new(registry: &'a CalculatorRegistry) -> Self {
        Self { registry }
    }

    /// Solve the value `metric` would need to reach for `goal`.
    ///
    /// Never fails: an unregistered metric, a degraded profile, or a
    /// non-converging search all yield a usable (if imprecise) result.
    pub fn solve(
        &self,
        metric: &HealthMetric,
        profile: &UserProfile,
        goal: TargetGoal,
    ) -> SolvedTarget {
        let Some(calculator) = self.registry.get(metric.metric_type) else {
            return SolvedTarget::settled(metric.value);
        };

        let evaluate =
            |value: f64| calculator.evaluate(value, profile).lifespan_impact_minutes;

        let current_impact = evaluate(metric.value);
        let goal_impact = match goal {
            TargetGoal::Neutral => 0.0,
            TargetGoal::RelativeImprovement(factor) => current_impact * (1.0 + factor),
        };

        // Already there: no search needed
        if current_impact >= goal_impact {
            return SolvedTarget::settled(metric.value);
        }

        // Impact improves monotonically from the current value toward the
        // better end of the bracket, including on either flank of a U-shaped
        // curve.
        let (floor, ceiling) = calculator.search_bounds();
        let better_end = match calculator.shape() {
            ResponseShape::IncreasingBenefit => ceiling,
            ResponseShape::DecreasingBenefit => floor,
            ResponseShape::UShaped { optimum } => optimum,
        };

        let mut worse = metric.value;
        let mut better = better_end;
        if (better - worse).abs() < 1e-12 {
            return SolvedTarget::settled(metric.value);
        }

        let mut midpoint = metric.value;
        let mut midpoint_impact = current_impact;

        for iteration in 1..=MAX_ITERATIONS {
            midpoint = 0.5 * (worse + better);
            midpoint_impact = evaluate(midpoint);

            if (midpoint_impact - goal_impact).abs() < IMPACT_TOLERANCE {
                return SolvedTarget {
                    target_value: midpoint,
                    benefit_minutes: midpoint_impact - current_impact,
                    iterations: iteration,
                    converged: true,
                };
            }

            if midpoint_impact < goal_impact {
                worse = midpoint;
            } else {
                better = midpoint;
            }
        }

        // Budget exhausted: hand back the best midpoint rather than failing
        SolvedTarget {
            target_value: midpoint,
            benefit_minutes: midpoint_impact - current_impact,
            iterations: MAX_ITERATIONS,
            converged: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculators::test_support::{reading, test_profile};
    use crate::types::MetricType;

    fn solve_neutral(metric_type: MetricType, value: f64) -> SolvedTarget {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        solver.solve(&reading(metric_type, value), &test_profile(), TargetGoal::Neutral)
    }

    fn impact_at(metric_type: MetricType, value: f64) -> f64 {
        let registry = CalculatorRegistry::default();
        registry
            .evaluate(&reading(metric_type, value), &test_profile())
            .lifespan_impact_minutes
    }

    #[test]
    fn test_steps_below_baseline_solves_upward() {
        let solved = solve_neutral(MetricType::Steps, 2000.0);

        assert!(solved.converged);
        assert!(solved.target_value > 2000.0 && solved.target_value < 15_000.0);
        assert!(impact_at(MetricType::Steps, solved.target_value).abs() < IMPACT_TOLERANCE);
        // Getting from -45 min/day to ~0 is the benefit
        assert!(solved.benefit_minutes > 40.0);
    }

    #[test]
    fn test_resting_heart_rate_solves_downward() {
        let solved = solve_neutral(MetricType::RestingHeartRate, 85.0);

        assert!(solved.converged);
        assert!(solved.target_value < 85.0);
        assert!(
            impact_at(MetricType::RestingHeartRate, solved.target_value).abs()
                < IMPACT_TOLERANCE
        );
    }

    #[test]
    fn test_short_sleep_searches_toward_optimum() {
        let solved = solve_neutral(MetricType::SleepHours, 5.0);

        assert!(solved.converged);
        assert!(solved.target_value > 5.0 && solved.target_value <= 7.5);
        assert!(impact_at(MetricType::SleepHours, solved.target_value).abs() < IMPACT_TOLERANCE);
    }

    #[test]
    fn test_long_sleep_searches_back_toward_optimum() {
        let solved = solve_neutral(MetricType::SleepHours, 10.0);

        assert!(solved.converged);
        assert!(solved.target_value < 10.0 && solved.target_value >= 7.5);
        assert!(impact_at(MetricType::SleepHours, solved.target_value).abs() < IMPACT_TOLERANCE);
    }

    #[test]
    fn test_already_neutral_returns_current_value() {
        let solved = solve_neutral(MetricType::Steps, 12_000.0);

        assert_eq!(solved.target_value, 12_000.0);
        assert_eq!(solved.benefit_minutes, 0.0);
        assert_eq!(solved.iterations, 0);
    }

    #[test]
    fn test_relative_improvement_goal() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let profile = test_profile();
        let metric = reading(MetricType::ExerciseMinutes, 45.0);

        let current = impact_at(MetricType::ExerciseMinutes, 45.0);
        assert!(current > 0.0);

        let solved = solver.solve(&metric, &profile, TargetGoal::RelativeImprovement(0.2));
        assert!(solved.converged);
        assert!(solved.target_value > 45.0);
        let achieved = impact_at(MetricType::ExerciseMinutes, solved.target_value);
        assert!((achieved - current * 1.2).abs() < IMPACT_TOLERANCE);
    }

    #[test]
    fn test_relative_improvement_on_negative_impact_is_a_no_op() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let metric = reading(MetricType::Steps, 2000.0);

        // goal = current × 1.2 is below current for a negative impact, so
        // the already-meets-goal rule fires
        let solved = solver.solve(&metric, &test_profile(), TargetGoal::RelativeImprovement(0.2));
        assert_eq!(solved.target_value, 2000.0);
        assert_eq!(solved.iterations, 0);
    }

    #[test]
    fn test_degraded_profile_returns_current_value() {
        let registry = CalculatorRegistry::default();
        let solver = TargetSolver::new(&registry);
        let metric = reading(MetricType::Steps, 2000.0);

        let solved = solver.solve(&metric, &UserProfile::default(), TargetGoal::Neutral);
        assert_eq!(solved.target_value, 2000.0);
        assert_eq!(solved.benefit_minutes, 0.0);
    }

    #[test]
    fn test_iteration_budget_is_bounded() {
        for metric_type in MetricType::all() {
            let registry = CalculatorRegistry::default();
            let solver = TargetSolver::new(&registry);
            let (lo, _hi) = registry.get(*metric_type).unwrap().search_bounds();
            let solved = solver.solve(
                &reading(*metric_type, lo),
                &test_profile(),
                TargetGoal::Neutral,
            );
            assert!(solved.iterations <= MAX_ITERATIONS);
        }
    }
}
