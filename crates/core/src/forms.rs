//! Validated input structs for user-initiated create operations.
//!
//! Create/add flows collect a full input struct and validate it before any
//! operation runs; a validation failure surfaces inline and nothing is
//! attempted against the backend.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::project::ProjectCategory;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProjectInput {
    pub name: String,
    pub category: ProjectCategory,
    pub total_budget: Decimal,
    pub description: Option<String>,
}

impl NewProjectInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyProjectName);
        }
        if self.total_budget < Decimal::ZERO {
            return Err(DomainError::NegativeBudget);
        }
        Ok(())
    }

    pub fn description_or_default(&self) -> String {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or("New project created.")
            .to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMilestoneInput {
    pub title: String,
    pub due_date: NaiveDate,
}

impl NewMilestoneInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::EmptyMilestoneTitle);
        }
        Ok(())
    }
}
