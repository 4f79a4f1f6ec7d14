//! 提交规则存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::periods::{
    ActiveModel as PeriodActiveModel, Column as PeriodColumn, Entity as Periods,
    Model as PeriodModel,
};
use crate::entity::submission_rules::{ActiveModel, Column, Entity as SubmissionRules, Model};
use crate::errors::{GradingError, Result};
use crate::models::submission_rules::{
    entities::SubmissionRule, requests::SubmissionRuleRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

/// 插入规则及其阶段，阶段位置按请求顺序从 1 编号
pub(super) async fn insert_submission_rule<C: ConnectionTrait>(
    db: &C,
    assignment_id: i64,
    req: &SubmissionRuleRequest,
    now: i64,
) -> Result<(Model, Vec<PeriodModel>)> {
    let rule = ActiveModel {
        assignment_id: Set(assignment_id),
        rule_type: Set(req.rule_type.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| GradingError::database_operation(format!("创建提交规则失败: {e}")))?;

    let mut periods = Vec::with_capacity(req.periods.len());
    for (index, period) in req.periods.iter().enumerate() {
        let model = PeriodActiveModel {
            submission_rule_id: Set(rule.id),
            hours: Set(period.hours),
            deduction: Set(period.deduction),
            position: Set(index as i32 + 1),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| GradingError::database_operation(format!("创建罚分阶段失败: {e}")))?;
        periods.push(model);
    }

    Ok((rule, periods))
}

impl SeaOrmStorage {
    /// 获取作业的提交规则
    pub async fn get_submission_rule_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<SubmissionRule>> {
        let rule = SubmissionRules::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交规则失败: {e}")))?;

        let Some(rule) = rule else {
            return Ok(None);
        };

        let periods = Periods::find()
            .filter(PeriodColumn::SubmissionRuleId.eq(rule.id))
            .order_by_asc(PeriodColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询罚分阶段失败: {e}")))?;

        rule.into_submission_rule(periods).map(Some)
    }

    /// 替换提交规则：旧规则与其阶段一并销毁，新规则在同一事务内挂上
    pub async fn replace_submission_rule_impl(
        &self,
        assignment_id: i64,
        req: SubmissionRuleRequest,
    ) -> Result<SubmissionRule> {
        req.validate()?;

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradingError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = Assignments::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;
        if assignment.is_none() {
            return Err(GradingError::not_found(format!(
                "Assignment {assignment_id} not found"
            )));
        }

        let old_rule = SubmissionRules::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交规则失败: {e}")))?;

        if let Some(old_rule) = old_rule {
            Periods::delete_many()
                .filter(PeriodColumn::SubmissionRuleId.eq(old_rule.id))
                .exec(&txn)
                .await
                .map_err(|e| {
                    GradingError::database_operation(format!("删除罚分阶段失败: {e}"))
                })?;
            old_rule.delete(&txn).await.map_err(|e| {
                GradingError::database_operation(format!("删除提交规则失败: {e}"))
            })?;
        }

        let (rule, periods) = insert_submission_rule(&txn, assignment_id, &req, now).await?;

        txn.commit()
            .await
            .map_err(|e| GradingError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "作业 {} 的提交规则已替换为 {}（{} 个罚分阶段）",
            assignment_id,
            req.rule_type,
            periods.len()
        );

        rule.into_submission_rule(periods)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::entities::MarkingScheme;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::submission_rules::entities::{SubmissionRule, SubmissionRuleType};
    use crate::models::submission_rules::requests::{PeriodRequest, SubmissionRuleRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use chrono::{TimeZone, Utc};

    fn assignment_request(rule: SubmissionRuleRequest) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            short_identifier: "A1".to_string(),
            description: "Recursion".to_string(),
            due_date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            section_due_dates_enabled: false,
            marking_scheme: MarkingScheme::Rubric,
            group_min: 1,
            group_max: 2,
            submission_rule: rule,
        }
    }

    #[tokio::test]
    async fn test_rule_created_with_assignment() {
        let storage = memory_storage().await;
        let assignment = storage
            .create_assignment_impl(assignment_request(SubmissionRuleRequest::no_late()))
            .await
            .unwrap();

        let rule = storage
            .get_submission_rule_impl(assignment.id)
            .await
            .unwrap()
            .expect("rule should exist");
        assert_eq!(rule.rule_type(), SubmissionRuleType::NoLate);
        assert_eq!(rule.assignment_id(), assignment.id);
    }

    #[tokio::test]
    async fn test_replace_rule_keeps_exactly_one() {
        let storage = memory_storage().await;
        let assignment = storage
            .create_assignment_impl(assignment_request(SubmissionRuleRequest::no_late()))
            .await
            .unwrap();

        let replaced = storage
            .replace_submission_rule_impl(
                assignment.id,
                SubmissionRuleRequest::grace_period(vec![
                    PeriodRequest {
                        hours: 24,
                        deduction: 5,
                    },
                    PeriodRequest {
                        hours: 12,
                        deduction: 10,
                    },
                ]),
            )
            .await
            .unwrap();

        let loaded = storage
            .get_submission_rule_impl(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, replaced);
        match loaded {
            SubmissionRule::GracePeriod(rule) => {
                let shape: Vec<_> = rule
                    .periods
                    .iter()
                    .map(|p| (p.position, p.hours, p.deduction))
                    .collect();
                assert_eq!(shape, vec![(1, 24, 5), (2, 12, 10)]);
            }
            other => panic!("expected grace period rule, got {other:?}"),
        }

        // 再换回不接受迟交，旧阶段随规则一起删除
        let back = storage
            .replace_submission_rule_impl(assignment.id, SubmissionRuleRequest::no_late())
            .await
            .unwrap();
        assert!(back.periods().is_empty());
        assert_eq!(back.rule_type(), SubmissionRuleType::NoLate);
    }

    #[tokio::test]
    async fn test_replace_rule_for_missing_assignment() {
        let storage = memory_storage().await;
        let err = storage
            .replace_submission_rule_impl(404, SubmissionRuleRequest::no_late())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_duplicate_short_identifier_rejected() {
        let storage = memory_storage().await;
        storage
            .create_assignment_impl(assignment_request(SubmissionRuleRequest::no_late()))
            .await
            .unwrap();
        let err = storage
            .create_assignment_impl(assignment_request(SubmissionRuleRequest::no_late()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
