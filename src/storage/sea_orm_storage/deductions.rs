//! 宽限期扣除存储操作

use super::SeaOrmStorage;
use crate::entity::grace_period_deductions::Column;
use crate::entity::memberships::Column as MembershipColumn;
use crate::entity::prelude::{DeductionActiveModel as ActiveModel, GracePeriodDeductions, Memberships};
use crate::errors::{GradingError, Result};
use crate::models::deductions::entities::GracePeriodDeduction;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

impl SeaOrmStorage {
    /// 为每个成员记录一次扣除，已存在的 (成员, 提交) 原样返回
    pub async fn record_grace_period_deductions_impl(
        &self,
        submission_id: i64,
        membership_ids: &[i64],
        deduction: i32,
    ) -> Result<Vec<GracePeriodDeduction>> {
        if deduction < 0 {
            return Err(GradingError::validation("Deduction must not be negative"));
        }

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradingError::database_operation(format!("开启事务失败: {e}")))?;

        let mut recorded = Vec::with_capacity(membership_ids.len());
        let mut created = 0usize;
        for &membership_id in membership_ids {
            let existing = GracePeriodDeductions::find()
                .filter(Column::MembershipId.eq(membership_id))
                .filter(Column::SubmissionId.eq(submission_id))
                .one(&txn)
                .await
                .map_err(|e| {
                    GradingError::database_operation(format!("查询宽限期扣除失败: {e}"))
                })?;

            let model = match existing {
                Some(model) => model,
                None => {
                    created += 1;
                    ActiveModel {
                        membership_id: Set(membership_id),
                        submission_id: Set(submission_id),
                        deduction: Set(deduction),
                        created_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| {
                        GradingError::database_operation(format!("记录宽限期扣除失败: {e}"))
                    })?
                }
            };
            recorded.push(model.into_deduction());
        }

        txn.commit()
            .await
            .map_err(|e| GradingError::database_operation(format!("提交事务失败: {e}")))?;

        if created > 0 {
            info!(
                "提交 {} 记录宽限期扣除 {}，涉及 {} 名成员",
                submission_id, deduction, created
            );
        }

        Ok(recorded)
    }

    pub async fn list_deductions_for_submission_impl(
        &self,
        submission_id: i64,
    ) -> Result<Vec<GracePeriodDeduction>> {
        let results = GracePeriodDeductions::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_asc(Column::MembershipId)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询宽限期扣除失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_deduction()).collect())
    }

    /// 学生所有成员关系上累计的扣除
    pub async fn sum_deductions_for_student_impl(&self, student_id: i64) -> Result<i64> {
        let membership_ids: Vec<i64> = Memberships::find()
            .filter(MembershipColumn::UserId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组成员失败: {e}")))?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if membership_ids.is_empty() {
            return Ok(0);
        }

        let deductions = GracePeriodDeductions::find()
            .filter(Column::MembershipId.is_in(membership_ids))
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询宽限期扣除失败: {e}")))?;

        Ok(deductions.iter().map(|d| i64::from(d.deduction)).sum())
    }
}
