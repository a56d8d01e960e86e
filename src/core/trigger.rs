use super::types::{CelebrationState, GoalResult, MonthsToGoal};

/// Months-to-goal threshold below which a snapshot counts as "close".
const CLOSE_MONTHS: u32 = 3;

/// Outcome of feeding one result snapshot to the celebration trigger: the
/// state to carry into the next evaluation, and whether to fire the
/// animation right now.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CelebrationStep {
    pub state: CelebrationState,
    pub fire: bool,
}

/// Advances the one-shot celebration state machine with a freshly computed
/// result. Pure: the caller owns the state and passes it back in on the
/// next snapshot.
///
/// The reset check runs first against the same snapshot, so a qualifying
/// snapshot arriving after the condition lapsed fires again, while repeated
/// qualifying snapshots (e.g. the user tweaking an unrelated field) fire at
/// most once.
pub fn evaluate_celebration(
    state: CelebrationState,
    result: &GoalResult,
    savings_goal: f64,
) -> CelebrationStep {
    let far_from_goal = match result.months_to_goal {
        MonthsToGoal::Months(months) => months >= CLOSE_MONTHS,
        MonthsToGoal::Unreachable => true,
    };
    let should_reset = far_from_goal || !result.is_goal_reachable || savings_goal == 0.0;

    let state = if should_reset {
        CelebrationState::Idle
    } else {
        state
    };

    let is_close = result.is_goal_reachable
        && matches!(result.months_to_goal, MonthsToGoal::Months(m) if m > 0 && m < CLOSE_MONTHS);
    let is_reached = result.is_goal_reached(savings_goal);

    if (is_close || is_reached) && state == CelebrationState::Idle {
        CelebrationStep {
            state: CelebrationState::Celebrated,
            fire: true,
        }
    } else {
        CelebrationStep { state, fire: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Inputs, compute};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn result_with_months(months: u32) -> GoalResult {
        GoalResult {
            disposable_income: 2_000.0,
            months_to_goal: MonthsToGoal::Months(months),
            is_goal_reachable: true,
            progress_percentage: 50.0,
        }
    }

    fn unreachable_result() -> GoalResult {
        GoalResult {
            disposable_income: -500.0,
            months_to_goal: MonthsToGoal::Unreachable,
            is_goal_reachable: false,
            progress_percentage: 0.0,
        }
    }

    #[test]
    fn close_snapshot_fires_from_idle() {
        let step = evaluate_celebration(CelebrationState::Idle, &result_with_months(2), 10_000.0);
        assert!(step.fire);
        assert_eq!(step.state, CelebrationState::Celebrated);
    }

    #[test]
    fn reached_snapshot_fires_from_idle() {
        let step = evaluate_celebration(CelebrationState::Idle, &result_with_months(0), 10_000.0);
        assert!(step.fire);
        assert_eq!(step.state, CelebrationState::Celebrated);
    }

    #[test]
    fn repeated_qualifying_snapshots_fire_only_once() {
        let mut state = CelebrationState::Idle;
        let mut fires = 0;
        for _ in 0..5 {
            let step = evaluate_celebration(state, &result_with_months(1), 10_000.0);
            state = step.state;
            fires += usize::from(step.fire);
        }
        assert_eq!(fires, 1);
        assert_eq!(state, CelebrationState::Celebrated);
    }

    #[test]
    fn three_months_out_does_not_fire() {
        let step = evaluate_celebration(CelebrationState::Idle, &result_with_months(3), 10_000.0);
        assert!(!step.fire);
        assert_eq!(step.state, CelebrationState::Idle);
    }

    #[test]
    fn distant_snapshot_resets_a_celebrated_state() {
        let step =
            evaluate_celebration(CelebrationState::Celebrated, &result_with_months(12), 10_000.0);
        assert!(!step.fire);
        assert_eq!(step.state, CelebrationState::Idle);
    }

    #[test]
    fn unreachable_snapshot_resets_a_celebrated_state() {
        let step =
            evaluate_celebration(CelebrationState::Celebrated, &unreachable_result(), 10_000.0);
        assert!(!step.fire);
        assert_eq!(step.state, CelebrationState::Idle);
    }

    #[test]
    fn reset_is_idempotent_when_already_idle() {
        let step = evaluate_celebration(CelebrationState::Idle, &unreachable_result(), 10_000.0);
        assert!(!step.fire);
        assert_eq!(step.state, CelebrationState::Idle);
    }

    #[test]
    fn zero_goal_forces_reset_and_suppresses_the_reached_fire() {
        // months_to_goal == 0 here is only vacuous: no goal was ever set.
        let step = evaluate_celebration(CelebrationState::Celebrated, &result_with_months(0), 0.0);
        assert!(!step.fire);
        assert_eq!(step.state, CelebrationState::Idle);
    }

    #[test]
    fn trigger_rearms_after_a_reset_snapshot() {
        let mut state = CelebrationState::Idle;

        let step = evaluate_celebration(state, &result_with_months(2), 10_000.0);
        assert!(step.fire);
        state = step.state;

        // Condition lapses, then holds again: the trigger fires a second time.
        let step = evaluate_celebration(state, &result_with_months(8), 10_000.0);
        assert!(!step.fire);
        state = step.state;

        let step = evaluate_celebration(state, &result_with_months(1), 10_000.0);
        assert!(step.fire);
    }

    #[test]
    fn walkthrough_from_engine_outputs() {
        // Two months out fires; the user then raises the goal far enough to
        // re-arm and drops it back, which fires again.
        let mut inputs = Inputs {
            monthly_income: 5_000.0,
            monthly_expenses: 3_000.0,
            savings_goal: 4_000.0,
            current_savings: 0.0,
        };
        let mut state = CelebrationState::Idle;

        let step = evaluate_celebration(state, &compute(&inputs), inputs.savings_goal);
        assert!(step.fire);
        state = step.state;

        inputs.savings_goal = 50_000.0;
        let step = evaluate_celebration(state, &compute(&inputs), inputs.savings_goal);
        assert!(!step.fire);
        state = step.state;
        assert_eq!(state, CelebrationState::Idle);

        inputs.savings_goal = 4_000.0;
        let step = evaluate_celebration(state, &compute(&inputs), inputs.savings_goal);
        assert!(step.fire);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_at_most_one_fire_per_qualifying_interval(
            months_seq in proptest::collection::vec(0u32..8, 1..40),
            goal in 1u32..100_000
        ) {
            let goal = goal as f64;
            let mut state = CelebrationState::Idle;
            let mut fires = 0usize;
            let mut intervals = 0usize;
            let mut qualifying = false;

            for months in months_seq {
                let result = result_with_months(months);
                let step = evaluate_celebration(state, &result, goal);
                state = step.state;
                fires += usize::from(step.fire);

                let now_qualifying = months < 3;
                if now_qualifying && !qualifying {
                    intervals += 1;
                }
                qualifying = now_qualifying;
            }

            prop_assert!(fires <= intervals);
        }

        #[test]
        fn prop_fire_implies_qualifying_snapshot(
            months in 0u32..20,
            goal in 0u32..100_000,
            celebrated in proptest::bool::ANY
        ) {
            let state = if celebrated {
                CelebrationState::Celebrated
            } else {
                CelebrationState::Idle
            };
            let result = result_with_months(months);
            let step = evaluate_celebration(state, &result, goal as f64);

            if step.fire {
                prop_assert!(months < 3);
                prop_assert!(months > 0 || goal > 0);
                prop_assert_eq!(step.state, CelebrationState::Celebrated);
            }
        }
    }
}
