//! 提交版本存储操作

use super::SeaOrmStorage;
use crate::entity::groupings::{ActiveModel as GroupingActiveModel, Entity as Groupings};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{GradingError, Result};
use crate::models::groupings::entities::Grouping;
use crate::models::submissions::entities::Submission;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

impl SeaOrmStorage {
    /// 创建新的提交版本，版本号为该小组已有最大版本号加一
    pub async fn create_submission_impl(
        &self,
        grouping_id: i64,
        revision_timestamp: DateTime<Utc>,
    ) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradingError::database_operation(format!("开启事务失败: {e}")))?;

        let grouping = Groupings::find_by_id(grouping_id)
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组失败: {e}")))?;
        if grouping.is_none() {
            return Err(GradingError::not_found(format!(
                "Grouping {grouping_id} not found"
            )));
        }

        let latest = Submissions::find()
            .filter(Column::GroupingId.eq(grouping_id))
            .order_by_desc(Column::RevisionNumber)
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交失败: {e}")))?;
        let revision_number = latest.map(|s| s.revision_number + 1).unwrap_or(1);

        let model = ActiveModel {
            grouping_id: Set(grouping_id),
            revision_number: Set(revision_number),
            revision_timestamp: Set(revision_timestamp.timestamp()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradingError::database_operation(format!("提交事务失败: {e}")))?;

        debug!(
            "小组 {} 创建提交版本 {} (id={})",
            grouping_id, revision_number, result.id
        );

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 在事务内移动小组的当前提交指针
    pub async fn set_current_submission_impl(
        &self,
        grouping_id: i64,
        submission_id: i64,
    ) -> Result<Grouping> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradingError::database_operation(format!("开启事务失败: {e}")))?;

        let grouping = Groupings::find_by_id(grouping_id)
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组失败: {e}")))?
            .ok_or_else(|| GradingError::not_found(format!("Grouping {grouping_id} not found")))?;

        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                GradingError::not_found(format!("Submission {submission_id} not found"))
            })?;

        if submission.grouping_id != grouping_id {
            return Err(GradingError::validation(format!(
                "Submission {submission_id} does not belong to grouping {grouping_id}"
            )));
        }

        let mut active: GroupingActiveModel = grouping.into();
        active.current_submission_id = Set(Some(submission_id));

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("更新当前提交失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradingError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "小组 {} 的当前提交设为 {} (版本 {})",
            grouping_id, submission_id, submission.revision_number
        );

        Ok(updated.into_grouping())
    }
}
