use crate::meals::dto::MealMetrics;
use crate::meals::repo_types::Meal;

/// Longest run of consecutive `true` flags.
pub fn best_on_diet_sequence<I>(flags: I) -> u64
where
    I: IntoIterator<Item = bool>,
{
    let mut best = 0;
    let mut current = 0;
    for on_diet in flags {
        current = if on_diet { current + 1 } else { 0 };
        best = best.max(current);
    }
    best
}

/// Aggregates over the user's meals, which must already be ordered by date.
pub fn summarize(meals: &[Meal]) -> MealMetrics {
    let total_meals = meals.len() as u64;
    let total_meals_on_diet = meals.iter().filter(|m| m.is_on_diet).count() as u64;
    MealMetrics {
        total_meals,
        total_meals_on_diet,
        total_meals_off_diet: total_meals - total_meals_on_diet,
        best_on_diet_sequence: best_on_diet_sequence(meals.iter().map(|m| m.is_on_diet)),
    }
}
