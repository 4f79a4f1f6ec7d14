use serde::Deserialize;

use super::entities::SubmissionRuleType;
use crate::errors::{GradingError, Result};
use crate::utils::validate::validate_period;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PeriodRequest {
    pub hours: i32,
    pub deduction: i32,
}

// 创建或替换提交规则，periods 的顺序即阶段顺序
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionRuleRequest {
    pub rule_type: SubmissionRuleType,
    #[serde(default)]
    pub periods: Vec<PeriodRequest>,
}

impl SubmissionRuleRequest {
    pub fn no_late() -> Self {
        Self {
            rule_type: SubmissionRuleType::NoLate,
            periods: vec![],
        }
    }

    pub fn grace_period(periods: Vec<PeriodRequest>) -> Self {
        Self {
            rule_type: SubmissionRuleType::GracePeriod,
            periods,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rule_type == SubmissionRuleType::NoLate && !self.periods.is_empty() {
            return Err(GradingError::validation(
                "A no-late submission rule cannot have penalty periods",
            ));
        }
        for period in &self.periods {
            validate_period(period.hours, period.deduction).map_err(GradingError::validation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_late_with_periods_rejected() {
        let mut req = SubmissionRuleRequest::no_late();
        req.periods.push(PeriodRequest {
            hours: 24,
            deduction: 1,
        });
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_grace_period_with_bad_period_rejected() {
        let req = SubmissionRuleRequest::grace_period(vec![
            PeriodRequest {
                hours: 24,
                deduction: 1,
            },
            PeriodRequest {
                hours: -3,
                deduction: 1,
            },
        ]);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_deserialize_request() {
        let req: SubmissionRuleRequest = serde_json::from_str(
            r#"{"rule_type":"grace_period","periods":[{"hours":24,"deduction":5}]}"#,
        )
        .unwrap();
        assert_eq!(req.rule_type, SubmissionRuleType::GracePeriod);
        assert_eq!(req.periods.len(), 1);
        assert!(req.validate().is_ok());
    }
}
