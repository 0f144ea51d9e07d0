use serde::Deserialize;

use crate::error::FieldIssue;
use crate::users::services::is_valid_email;
use crate::validation::{finish, require_non_empty, Validate};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Trimmed copy of the body, as it is stored.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
        }
    }
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), Vec<FieldIssue>> {
        let mut issues = Vec::new();
        require_non_empty(&mut issues, "name", &self.name);
        if !is_valid_email(self.email.trim()) {
            issues.push(FieldIssue::new("email", "Invalid email"));
        }
        finish(issues)
    }
}
