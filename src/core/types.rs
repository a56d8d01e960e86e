use serde::{Serialize, Serializer};

/// A snapshot of the four user-entered amounts. Callers must supply finite
/// numbers; an empty field is represented as `0.0`, never as NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inputs {
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub savings_goal: f64,
    pub current_savings: f64,
}

/// Whole months of saving left before the goal is met, or the
/// infinite-horizon sentinel when saving at the current rate never gets
/// there. Serializes as the bare month count, or `null` for the sentinel —
/// it must never appear as a numeric value on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MonthsToGoal {
    Months(u32),
    Unreachable,
}

impl MonthsToGoal {
    pub fn months(self) -> Option<u32> {
        match self {
            MonthsToGoal::Months(n) => Some(n),
            MonthsToGoal::Unreachable => None,
        }
    }

    pub fn is_unreachable(self) -> bool {
        self == MonthsToGoal::Unreachable
    }
}

impl Serialize for MonthsToGoal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MonthsToGoal::Months(n) => serializer.serialize_u32(*n),
            MonthsToGoal::Unreachable => serializer.serialize_none(),
        }
    }
}

/// Everything derived from one `Inputs` snapshot. Recomputed wholesale on
/// every edit; no field is ever patched in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalResult {
    /// Monthly income minus monthly expenses; negative when overspending.
    pub disposable_income: f64,
    pub months_to_goal: MonthsToGoal,
    pub is_goal_reachable: bool,
    /// Current savings as a percentage of the goal. Unclamped: exceeds 100
    /// when savings exceed the goal. Bounded visuals clamp to [0, 100]
    /// themselves.
    pub progress_percentage: f64,
}

impl GoalResult {
    /// Whether the goal is genuinely reached. `months_to_goal == 0` alone is
    /// not enough: with no goal set the result is only vacuously achieved,
    /// so a real achievement additionally requires `savings_goal > 0`.
    pub fn is_goal_reached(&self, savings_goal: f64) -> bool {
        self.is_goal_reachable
            && self.months_to_goal == MonthsToGoal::Months(0)
            && savings_goal > 0.0
    }
}

/// One-shot flag for the celebration animation. `Idle` means the next
/// qualifying snapshot fires; `Celebrated` suppresses re-fires while the
/// qualifying condition keeps holding across recomputes.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CelebrationState {
    #[default]
    Idle,
    Celebrated,
}
