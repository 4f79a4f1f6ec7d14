//! 宽限额度
//!
//! 学生剩余额度 = 总额度 − 已记录的扣除之和；
//! 小组剩余额度取全部已接受成员中的最小值。

use std::sync::Arc;
use tracing::debug;

use super::GradingSettings;
use crate::errors::{GradingError, Result};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use crate::storage::Storage;

pub struct GraceCreditService {
    storage: Arc<dyn Storage>,
    settings: GradingSettings,
}

impl GraceCreditService {
    pub fn new(storage: Arc<dyn Storage>, settings: GradingSettings) -> Self {
        Self { storage, settings }
    }

    /// 创建学生，未指定额度时使用默认宽限额度
    pub async fn create_student(&self, mut req: CreateStudentRequest) -> Result<Student> {
        if req.grace_credits.is_none() {
            req.grace_credits = Some(self.settings.default_grace_credits);
        }
        self.storage.create_student(req).await
    }

    pub async fn remaining_grace_credits(&self, student_id: i64) -> Result<i64> {
        let student = self
            .storage
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("Student {student_id} not found")))?;
        remaining_for_student(self.storage.as_ref(), &student).await
    }

    pub async fn grouping_remaining_credits(&self, grouping_id: i64) -> Result<i64> {
        grouping_remaining_credits(self.storage.as_ref(), grouping_id).await
    }
}

pub(crate) async fn remaining_for_student(storage: &dyn Storage, student: &Student) -> Result<i64> {
    let used = storage.sum_deductions_for_student(student.id).await?;
    Ok(i64::from(student.grace_credits) - used)
}

/// 小组剩余额度，没有已接受成员时为 0
pub(crate) async fn grouping_remaining_credits(
    storage: &dyn Storage,
    grouping_id: i64,
) -> Result<i64> {
    let memberships = storage.list_memberships(grouping_id).await?;

    let mut remaining: Option<i64> = None;
    for membership in memberships.iter().filter(|m| m.status.is_accepted()) {
        let Some(student) = storage.get_student_by_id(membership.user_id).await? else {
            continue;
        };
        let credits = remaining_for_student(storage, &student).await?;
        remaining = Some(remaining.map_or(credits, |r| r.min(credits)));
    }

    let remaining = remaining.unwrap_or(0);
    debug!("小组 {} 剩余宽限额度: {}", grouping_id, remaining);
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_default_grace_credits_applied() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let service = GraceCreditService::new(
            storage,
            GradingSettings {
                distribution_intervals: 20,
                default_grace_credits: 4,
            },
        );

        let defaulted = service
            .create_student(CreateStudentRequest {
                username: "g4alice".to_string(),
                section_id: None,
                grace_credits: None,
                hidden: false,
            })
            .await
            .unwrap();
        assert_eq!(defaulted.grace_credits, 4);

        let explicit = service
            .create_student(CreateStudentRequest {
                username: "g4bob".to_string(),
                section_id: None,
                grace_credits: Some(1),
                hidden: false,
            })
            .await
            .unwrap();
        assert_eq!(explicit.grace_credits, 1);
        assert_eq!(service.remaining_grace_credits(explicit.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_student() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let service = GraceCreditService::new(storage, GradingSettings::default());
        let err = service.remaining_grace_credits(42).await.unwrap_err();
        assert_eq!(err.code(), "E005");
    }
}
