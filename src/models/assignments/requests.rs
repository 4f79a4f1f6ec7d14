use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::MarkingScheme;
use crate::errors::{GradingError, Result};
use crate::models::submission_rules::requests::SubmissionRuleRequest;
use crate::utils::validate::{validate_group_bounds, validate_short_identifier};

// 创建作业请求，作业与其提交规则一同创建
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub short_identifier: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub section_due_dates_enabled: bool,
    pub marking_scheme: MarkingScheme,
    pub group_min: i32,
    pub group_max: i32,
    pub submission_rule: SubmissionRuleRequest,
}

impl CreateAssignmentRequest {
    /// 在进入规则引擎之前校验作业配置
    pub fn validate(&self) -> Result<()> {
        validate_short_identifier(&self.short_identifier).map_err(GradingError::validation)?;
        if self.description.trim().is_empty() {
            return Err(GradingError::validation("Description must not be blank"));
        }
        validate_group_bounds(self.group_min, self.group_max).map_err(GradingError::validation)?;
        self.submission_rule.validate()
    }
}

// 设置分班截止时间请求
#[derive(Debug, Clone, Deserialize)]
pub struct SectionDueDateRequest {
    pub section_id: i64,
    pub due_date: Option<DateTime<Utc>>,
}
