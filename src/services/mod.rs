//! 业务服务层
//!
//! 服务只依赖 `Storage` trait 与注入的 `Clock`，评分相关配置通过
//! [`GradingSettings`] 显式传入。

pub mod due_dates;
pub mod grace_credits;
pub mod grades;
pub mod submission_rules;

pub use due_dates::DueDateService;
pub use grace_credits::GraceCreditService;
pub use grades::GradeService;
pub use submission_rules::SubmissionRuleService;

/// 评分服务使用的配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradingSettings {
    // 成绩分布的区间数
    pub distribution_intervals: usize,
    // 新学生未指定宽限额度时的默认值
    pub default_grace_credits: i32,
}

impl Default for GradingSettings {
    fn default() -> Self {
        Self {
            distribution_intervals: 20,
            default_grace_credits: 0,
        }
    }
}
