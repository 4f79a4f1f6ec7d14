use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{Assignment, Section, SectionDueDate},
        requests::{CreateAssignmentRequest, SectionDueDateRequest},
    },
    criteria::{entities::Criterion, requests::CreateCriterionRequest},
    deductions::entities::GracePeriodDeduction,
    groupings::entities::{Grouping, Membership, MembershipStatus},
    results::entities::{ExtraMark, ExtraMarkUnit, Mark, MarkingState, ResultDetail, SubmissionResult},
    stats::entities::AssignmentStats,
    students::{entities::Student, requests::CreateStudentRequest},
    submission_rules::{entities::SubmissionRule, requests::SubmissionRuleRequest},
    submissions::entities::Submission,
};

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 作业管理方法
    // 创建作业（连同提交规则，短标识必须唯一）
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 通过短标识获取作业
    async fn get_assignment_by_short_identifier(
        &self,
        short_identifier: &str,
    ) -> Result<Option<Assignment>>;

    /// 教学班与分班截止时间
    // 创建教学班
    async fn create_section(&self, name: &str) -> Result<Section>;
    // 通过ID获取教学班
    async fn get_section_by_id(&self, section_id: i64) -> Result<Option<Section>>;
    // 设置（或覆盖）某教学班的截止时间
    async fn set_section_due_date(
        &self,
        assignment_id: i64,
        req: SectionDueDateRequest,
    ) -> Result<SectionDueDate>;
    // 列出作业的全部分班截止时间
    async fn list_section_due_dates(&self, assignment_id: i64) -> Result<Vec<SectionDueDate>>;

    /// 提交规则
    // 获取作业的提交规则（阶段按顺序排列）
    async fn get_submission_rule(&self, assignment_id: i64) -> Result<Option<SubmissionRule>>;
    // 在同一事务内销毁旧规则并挂上新规则
    async fn replace_submission_rule(
        &self,
        assignment_id: i64,
        req: SubmissionRuleRequest,
    ) -> Result<SubmissionRule>;

    /// 学生
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, student_id: i64) -> Result<Option<Student>>;
    // 按用户名排序列出全部学生
    async fn list_students(&self) -> Result<Vec<Student>>;

    /// 小组
    async fn create_grouping(&self, assignment_id: i64, group_name: &str) -> Result<Grouping>;
    async fn get_grouping_by_id(&self, grouping_id: i64) -> Result<Option<Grouping>>;
    async fn list_groupings(&self, assignment_id: i64) -> Result<Vec<Grouping>>;
    async fn add_membership(
        &self,
        grouping_id: i64,
        user_id: i64,
        status: MembershipStatus,
    ) -> Result<Membership>;
    async fn list_memberships(&self, grouping_id: i64) -> Result<Vec<Membership>>;
    // 学生在某作业下已接受的小组
    async fn get_student_grouping(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grouping>>;

    /// 提交
    // 创建提交版本（版本号自动递增）
    async fn create_submission(
        &self,
        grouping_id: i64,
        revision_timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 在事务内更新小组的当前提交
    async fn set_current_submission(&self, grouping_id: i64, submission_id: i64)
    -> Result<Grouping>;

    /// 评分项与批改结果
    async fn create_criterion(
        &self,
        assignment_id: i64,
        req: CreateCriterionRequest,
    ) -> Result<Criterion>;
    // 按 position 排序列出评分项
    async fn list_criteria(&self, assignment_id: i64) -> Result<Vec<Criterion>>;
    async fn create_result(
        &self,
        submission_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<SubmissionResult>;
    async fn update_result_state(
        &self,
        result_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<Option<SubmissionResult>>;
    // 设置评分项分数（已存在则覆盖）
    async fn set_mark(&self, result_id: i64, criterion_id: i64, mark: Option<f64>) -> Result<Mark>;
    async fn add_extra_mark(
        &self,
        result_id: i64,
        extra_mark: f64,
        unit: ExtraMarkUnit,
    ) -> Result<ExtraMark>;
    // 提交的最新批改结果
    async fn get_latest_result(&self, submission_id: i64) -> Result<Option<ResultDetail>>;
    // 提交最新的已完成批改结果
    async fn get_latest_completed_result(&self, submission_id: i64)
    -> Result<Option<ResultDetail>>;

    /// 宽限期扣除
    // 在事务内为每个成员记录扣除，已记录的 (成员, 提交) 跳过
    async fn record_grace_period_deductions(
        &self,
        submission_id: i64,
        membership_ids: &[i64],
        deduction: i32,
    ) -> Result<Vec<GracePeriodDeduction>>;
    async fn list_deductions_for_submission(
        &self,
        submission_id: i64,
    ) -> Result<Vec<GracePeriodDeduction>>;
    // 学生在所有作业中已被扣除的额度总和
    async fn sum_deductions_for_student(&self, student_id: i64) -> Result<i64>;

    /// 作业统计
    async fn save_assignment_stats(&self, stats: AssignmentStats) -> Result<AssignmentStats>;
    async fn get_assignment_stats(&self, assignment_id: i64) -> Result<Option<AssignmentStats>>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async(config).await?;
    Ok(Arc::new(storage))
}
