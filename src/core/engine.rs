use super::types::{GoalResult, Inputs, MonthsToGoal};

/// Derives a full `GoalResult` from one inputs snapshot. Total and
/// deterministic: every well-formed snapshot maps to a well-formed result,
/// with no error path and no side effects.
pub fn compute(inputs: &Inputs) -> GoalResult {
    let disposable_income = inputs.monthly_income - inputs.monthly_expenses;
    let remaining_goal = (inputs.savings_goal - inputs.current_savings).max(0.0);

    let (months_to_goal, is_goal_reachable) = if remaining_goal <= 0.0 {
        // Goal already met, or no goal set at all.
        (MonthsToGoal::Months(0), true)
    } else if disposable_income <= 0.0 {
        (MonthsToGoal::Unreachable, false)
    } else {
        // Partial months count as a full month. The cast saturates at
        // u32::MAX for pathological magnitudes instead of wrapping.
        let months = (remaining_goal / disposable_income).ceil() as u32;
        (MonthsToGoal::Months(months), true)
    };

    // Guarding on savings_goal > 0 avoids the division by zero; a zero goal
    // reports zero progress no matter how much is saved.
    let progress_percentage = if inputs.savings_goal > 0.0 {
        inputs.current_savings / inputs.savings_goal * 100.0
    } else {
        0.0
    };

    GoalResult {
        disposable_income,
        months_to_goal,
        is_goal_reachable,
        progress_percentage,
    }
}
