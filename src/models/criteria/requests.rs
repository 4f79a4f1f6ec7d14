use serde::Deserialize;

use super::entities::CriterionKind;
use crate::errors::{GradingError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCriterionRequest {
    pub name: String,
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl CreateCriterionRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GradingError::validation("Criterion name must not be blank"));
        }
        let value = match self.kind {
            CriterionKind::Rubric { weight } => weight,
            CriterionKind::Flexible { max } => max,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(GradingError::validation(
                "Criterion weight or max must be a non-negative number",
            ));
        }
        Ok(())
    }
}
