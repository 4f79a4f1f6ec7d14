//! 教学班与分班截止时间存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::section_due_dates::{
    ActiveModel as SectionDueDateActiveModel, Column as SectionDueDateColumn,
    Entity as SectionDueDates,
};
use crate::entity::sections::{ActiveModel, Column, Entity as Sections};
use crate::errors::{GradingError, Result};
use crate::models::assignments::{
    entities::{Section, SectionDueDate},
    requests::SectionDueDateRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建教学班
    pub async fn create_section_impl(&self, name: &str) -> Result<Section> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GradingError::validation("Section name must not be blank"));
        }

        let existing = Sections::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询教学班失败: {e}")))?;
        if existing.is_some() {
            return Err(GradingError::validation(format!(
                "Section '{name}' already exists"
            )));
        }

        let model = ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建教学班失败: {e}")))?;

        Ok(result.into_section())
    }

    /// 通过 ID 获取教学班
    pub async fn get_section_by_id_impl(&self, section_id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(section_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询教学班失败: {e}")))?;

        Ok(result.map(|m| m.into_section()))
    }

    /// 设置分班截止时间，已存在则覆盖
    pub async fn set_section_due_date_impl(
        &self,
        assignment_id: i64,
        req: SectionDueDateRequest,
    ) -> Result<SectionDueDate> {
        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;
        if assignment.is_none() {
            return Err(GradingError::not_found(format!(
                "Assignment {assignment_id} not found"
            )));
        }
        if self.get_section_by_id_impl(req.section_id).await?.is_none() {
            return Err(GradingError::not_found(format!(
                "Section {} not found",
                req.section_id
            )));
        }

        let existing = SectionDueDates::find()
            .filter(SectionDueDateColumn::AssignmentId.eq(assignment_id))
            .filter(SectionDueDateColumn::SectionId.eq(req.section_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                GradingError::database_operation(format!("查询分班截止时间失败: {e}"))
            })?;

        let due_date = req.due_date.map(|d| d.timestamp());

        let result = match existing {
            Some(model) => {
                let mut active: SectionDueDateActiveModel = model.into();
                active.due_date = Set(due_date);
                active.update(&self.db).await.map_err(|e| {
                    GradingError::database_operation(format!("更新分班截止时间失败: {e}"))
                })?
            }
            None => {
                let active = SectionDueDateActiveModel {
                    assignment_id: Set(assignment_id),
                    section_id: Set(req.section_id),
                    due_date: Set(due_date),
                    ..Default::default()
                };
                active.insert(&self.db).await.map_err(|e| {
                    GradingError::database_operation(format!("创建分班截止时间失败: {e}"))
                })?
            }
        };

        Ok(result.into_section_due_date())
    }

    /// 列出作业的全部分班截止时间
    pub async fn list_section_due_dates_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SectionDueDate>> {
        let results = SectionDueDates::find()
            .filter(SectionDueDateColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(SectionDueDateColumn::SectionId)
            .all(&self.db)
            .await
            .map_err(|e| {
                GradingError::database_operation(format!("查询分班截止时间失败: {e}"))
            })?;

        Ok(results
            .into_iter()
            .map(|m| m.into_section_due_date())
            .collect())
    }
}
