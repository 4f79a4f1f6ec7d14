//! 作业存储操作

use super::SeaOrmStorage;
use super::submission_rules::insert_submission_rule;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{GradingError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::info;

impl SeaOrmStorage {
    /// 创建作业并挂上初始提交规则
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        req.validate()?;

        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradingError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Assignments::find()
            .filter(Column::ShortIdentifier.eq(&req.short_identifier))
            .one(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;
        if existing.is_some() {
            return Err(GradingError::validation(format!(
                "Short identifier '{}' has already been taken",
                req.short_identifier
            )));
        }

        let model = ActiveModel {
            short_identifier: Set(req.short_identifier.clone()),
            description: Set(req.description.clone()),
            due_date: Set(req.due_date.timestamp()),
            section_due_dates_enabled: Set(req.section_due_dates_enabled),
            marking_scheme: Set(req.marking_scheme.to_string()),
            group_min: Set(req.group_min),
            group_max: Set(req.group_max),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let assignment = model
            .insert(&txn)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建作业失败: {e}")))?;

        insert_submission_rule(&txn, assignment.id, &req.submission_rule, now).await?;

        txn.commit()
            .await
            .map_err(|e| GradingError::database_operation(format!("提交事务失败: {e}")))?;

        info!(
            "创建作业 {} (id={})，提交规则: {}",
            assignment.short_identifier, assignment.id, req.submission_rule.rule_type
        );

        Ok(assignment.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 通过短标识获取作业
    pub async fn get_assignment_by_short_identifier_impl(
        &self,
        short_identifier: &str,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ShortIdentifier.eq(short_identifier))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }
}
