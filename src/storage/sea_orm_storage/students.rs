//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{GradingError, Result};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let username = req.username.trim().to_string();
        if username.is_empty() {
            return Err(GradingError::validation("Username must not be blank"));
        }

        let existing = Students::find()
            .filter(Column::Username.eq(&username))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询学生失败: {e}")))?;
        if existing.is_some() {
            return Err(GradingError::validation(format!(
                "Username '{username}' has already been taken"
            )));
        }

        if let Some(section_id) = req.section_id {
            if self.get_section_by_id_impl(section_id).await?.is_none() {
                return Err(GradingError::not_found(format!(
                    "Section {section_id} not found"
                )));
            }
        }

        let grace_credits = req.grace_credits.unwrap_or(0);
        if grace_credits < 0 {
            return Err(GradingError::validation(
                "Grace credits must not be negative",
            ));
        }

        let model = ActiveModel {
            username: Set(username),
            section_id: Set(req.section_id),
            grace_credits: Set(grace_credits),
            hidden: Set(req.hidden),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建学生失败: {e}")))?;

        info!("创建学生 {} (id={})", result.username, result.id);

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, student_id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_impl(&self) -> Result<Vec<Student>> {
        let results = Students::find()
            .order_by_asc(Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_student()).collect())
    }
}
