pub mod apply;
pub mod collection;
pub mod current;
pub mod engine;
pub mod messages;

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use crate::errors::{GradingError, Result};
use crate::models::groupings::entities::Grouping;
use crate::models::submission_rules::{entities::SubmissionRule, requests::SubmissionRuleRequest};
use crate::models::submissions::entities::Submission;
use crate::storage::Storage;
use crate::utils::Clock;

pub use engine::{LatePenalty, OvertimeMessage, SubmissionRuleBehavior};

pub struct SubmissionRuleService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl SubmissionRuleService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 作业的提交规则，缺失时视为规则约束被破坏
    pub(crate) async fn load_rule(&self, assignment_id: i64) -> Result<SubmissionRule> {
        self.storage
            .get_submission_rule(assignment_id)
            .await?
            .ok_or_else(|| {
                GradingError::contract_violation(format!(
                    "Assignment {assignment_id} has no submission rule"
                ))
            })
    }

    /// 以作业截止时间计算的收取时间
    pub async fn calculate_collection_time(&self, assignment_id: i64) -> Result<DateTime<Utc>> {
        collection::calculate_collection_time(self, assignment_id).await
    }

    /// 以小组适用截止时间计算的收取时间
    pub async fn collection_time_for_grouping(&self, grouping_id: i64) -> Result<DateTime<Utc>> {
        collection::collection_time_for_grouping(self, grouping_id).await
    }

    /// 对提交应用规则，迟交时为每个已接受成员记录扣除
    pub async fn apply_submission_rule(&self, submission_id: i64) -> Result<Submission> {
        apply::apply_submission_rule(self, submission_id).await
    }

    pub async fn set_current_submission(
        &self,
        grouping_id: i64,
        submission_id: i64,
    ) -> Result<Grouping> {
        current::set_current_submission(self, grouping_id, submission_id).await
    }

    pub async fn overtime_message(&self, grouping_id: i64) -> Result<Option<OvertimeMessage>> {
        messages::overtime_message(self, grouping_id).await
    }

    pub async fn commit_after_collection_message(
        &self,
        grouping_id: i64,
    ) -> Result<Option<&'static str>> {
        messages::commit_after_collection_message(self, grouping_id).await
    }

    pub async fn describe_rule(&self, assignment_id: i64) -> Result<String> {
        Ok(self.load_rule(assignment_id).await?.describe_rule())
    }

    /// 整体替换作业的提交规则
    pub async fn replace_submission_rule(
        &self,
        assignment_id: i64,
        req: SubmissionRuleRequest,
    ) -> Result<SubmissionRule> {
        let rule = self
            .storage
            .replace_submission_rule(assignment_id, req)
            .await?;
        info!(
            "作业 {} 新提交规则: {}",
            assignment_id,
            rule.describe_rule()
        );
        Ok(rule)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use std::sync::Arc;

    use crate::models::assignments::entities::{Assignment, MarkingScheme};
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::groupings::entities::{Grouping, MembershipStatus};
    use crate::models::students::{entities::Student, requests::CreateStudentRequest};
    use crate::models::submission_rules::requests::SubmissionRuleRequest;
    use crate::storage::Storage;

    pub(crate) struct Seeded {
        pub assignment: Assignment,
        pub grouping: Grouping,
        pub members: Vec<Student>,
    }

    /// 一个作业、一个小组：发起人、已接受成员、待确认成员各一名
    pub(crate) async fn seed_grouping(
        storage: &Arc<dyn Storage>,
        due_date: DateTime<Utc>,
        rule: SubmissionRuleRequest,
    ) -> Seeded {
        let assignment = storage
            .create_assignment(CreateAssignmentRequest {
                short_identifier: "A3".to_string(),
                description: "Hash tables".to_string(),
                due_date,
                section_due_dates_enabled: false,
                marking_scheme: MarkingScheme::Rubric,
                group_min: 1,
                group_max: 3,
                submission_rule: rule,
            })
            .await
            .unwrap();
        let grouping = storage
            .create_grouping(assignment.id, "group_0001")
            .await
            .unwrap();

        let mut members = Vec::new();
        for (username, status) in [
            ("c6inviter", MembershipStatus::Inviter),
            ("c6accepted", MembershipStatus::Accepted),
            ("c6pending", MembershipStatus::Pending),
        ] {
            let student = storage
                .create_student(CreateStudentRequest {
                    username: username.to_string(),
                    section_id: None,
                    grace_credits: Some(20),
                    hidden: false,
                })
                .await
                .unwrap();
            storage
                .add_membership(grouping.id, student.id, status)
                .await
                .unwrap();
            members.push(student);
        }

        Seeded {
            assignment,
            grouping,
            members,
        }
    }
}
