//! 作业统计存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::{AssignmentStatsActiveModel as ActiveModel, AssignmentStatsEntity};
use crate::errors::{GradingError, Result};
use crate::models::stats::entities::AssignmentStats;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 保存作业统计，已存在则覆盖
    pub async fn save_assignment_stats_impl(
        &self,
        stats: AssignmentStats,
    ) -> Result<AssignmentStats> {
        let existing = AssignmentStatsEntity::find_by_id(stats.assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业统计失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.results_average = Set(stats.results_average);
                active.results_median = Set(stats.results_median);
                active.results_fails = Set(stats.results_fails);
                active.results_zeros = Set(stats.results_zeros);
                active.updated_at = Set(stats.updated_at.timestamp());
                active.update(&self.db).await.map_err(|e| {
                    GradingError::database_operation(format!("更新作业统计失败: {e}"))
                })?
            }
            None => ActiveModel {
                assignment_id: Set(stats.assignment_id),
                results_average: Set(stats.results_average),
                results_median: Set(stats.results_median),
                results_fails: Set(stats.results_fails),
                results_zeros: Set(stats.results_zeros),
                updated_at: Set(stats.updated_at.timestamp()),
            }
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建作业统计失败: {e}")))?,
        };

        Ok(result.into_stats())
    }

    pub async fn get_assignment_stats_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<AssignmentStats>> {
        let result = AssignmentStatsEntity::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业统计失败: {e}")))?;

        Ok(result.map(|m| m.into_stats()))
    }
}
