use serde::{Deserialize, Serialize};

use crate::error::FieldIssue;
use crate::meals::date::EpochMillis;
use crate::meals::repo_types::{Meal, MealInput};
use crate::validation::{finish, require_non_empty, Validate};

/// Body of both create and full-replacement update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRequest {
    pub name: String,
    pub description: String,
    pub is_on_the_diet: bool,
    pub date: EpochMillis,
}

impl MealRequest {
    pub fn into_input(self) -> MealInput {
        MealInput {
            name: self.name.trim().to_string(),
            description: self.description,
            is_on_diet: self.is_on_the_diet,
            date: self.date.0,
        }
    }
}

impl Validate for MealRequest {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        require_non_empty(&mut issues, "name", &self.name);
        finish(issues)
    }
}

#[derive(Debug, Serialize)]
pub struct MealEnvelope {
    pub meal: Meal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMetrics {
    pub total_meals: u64,
    pub total_meals_on_diet: u64,
    pub total_meals_off_diet: u64,
    pub best_on_diet_sequence: u64,
}
