mod engine;
mod trigger;
mod types;

pub use engine::compute;
pub use trigger::{CelebrationStep, evaluate_celebration};
pub use types::{CelebrationState, GoalResult, Inputs, MonthsToGoal};
