//! 小组与成员存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::groupings::{ActiveModel, Column, Entity as Groupings};
use crate::entity::memberships::{
    ActiveModel as MembershipActiveModel, Column as MembershipColumn, Entity as Memberships,
};
use crate::entity::students::Entity as Students;
use crate::errors::{GradingError, Result};
use crate::models::groupings::entities::{Grouping, Membership, MembershipStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use tracing::info;

impl SeaOrmStorage {
    pub async fn create_grouping_impl(
        &self,
        assignment_id: i64,
        group_name: &str,
    ) -> Result<Grouping> {
        let group_name = group_name.trim();
        if group_name.is_empty() {
            return Err(GradingError::validation("Group name must not be blank"));
        }

        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;
        if assignment.is_none() {
            return Err(GradingError::not_found(format!(
                "Assignment {assignment_id} not found"
            )));
        }

        let existing = Groupings::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::GroupName.eq(group_name))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组失败: {e}")))?;
        if existing.is_some() {
            return Err(GradingError::validation(format!(
                "Group '{group_name}' already exists for this assignment"
            )));
        }

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            group_name: Set(group_name.to_string()),
            current_submission_id: Set(None),
            grader_id: Set(None),
            admin_approved: Set(false),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建小组失败: {e}")))?;

        info!(
            "创建小组 {} (id={}, assignment={})",
            result.group_name, result.id, assignment_id
        );

        Ok(result.into_grouping())
    }

    pub async fn get_grouping_by_id_impl(&self, grouping_id: i64) -> Result<Option<Grouping>> {
        let result = Groupings::find_by_id(grouping_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组失败: {e}")))?;

        Ok(result.map(|m| m.into_grouping()))
    }

    pub async fn list_groupings_impl(&self, assignment_id: i64) -> Result<Vec<Grouping>> {
        let results = Groupings::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_grouping()).collect())
    }

    /// 添加成员，同一学生在同一小组只能有一条成员关系
    pub async fn add_membership_impl(
        &self,
        grouping_id: i64,
        user_id: i64,
        status: MembershipStatus,
    ) -> Result<Membership> {
        let grouping = Groupings::find_by_id(grouping_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组失败: {e}")))?
            .ok_or_else(|| GradingError::not_found(format!("Grouping {grouping_id} not found")))?;

        let student = Students::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询学生失败: {e}")))?;
        if student.is_none() {
            return Err(GradingError::not_found(format!(
                "Student {user_id} not found"
            )));
        }

        let existing = Memberships::find()
            .filter(MembershipColumn::GroupingId.eq(grouping_id))
            .filter(MembershipColumn::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组成员失败: {e}")))?;
        if existing.is_some() {
            return Err(GradingError::validation(format!(
                "Student {user_id} is already a member of grouping {grouping_id}"
            )));
        }

        // 同一作业下学生只能有一个有效小组
        if status.is_accepted()
            && self
                .get_student_grouping_impl(grouping.assignment_id, user_id)
                .await?
                .is_some()
        {
            return Err(GradingError::validation(format!(
                "Student {user_id} already belongs to a group for this assignment"
            )));
        }

        let model = MembershipActiveModel {
            grouping_id: Set(grouping_id),
            user_id: Set(user_id),
            status: Set(status.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("添加小组成员失败: {e}")))?;

        Ok(result.into_membership())
    }

    pub async fn list_memberships_impl(&self, grouping_id: i64) -> Result<Vec<Membership>> {
        let results = Memberships::find()
            .filter(MembershipColumn::GroupingId.eq(grouping_id))
            .order_by_asc(MembershipColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询小组成员失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_membership()).collect())
    }

    /// 学生在某作业下作为发起人或已接受成员所在的小组
    pub async fn get_student_grouping_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Grouping>> {
        let result = Groupings::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::groupings::Relation::Memberships.def(),
            )
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(MembershipColumn::UserId.eq(student_id))
            .filter(MembershipColumn::Status.is_in([
                MembershipStatus::Inviter.to_string(),
                MembershipStatus::Accepted.to_string(),
            ]))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询学生小组失败: {e}")))?;

        Ok(result.map(|m| m.into_grouping()))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::entities::MarkingScheme;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::groupings::entities::MembershipStatus;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::submission_rules::requests::SubmissionRuleRequest;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::memory_storage};
    use chrono::{TimeZone, Utc};

    async fn seed(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_assignment_impl(CreateAssignmentRequest {
                short_identifier: "A2".to_string(),
                description: "Trees".to_string(),
                due_date: Utc.with_ymd_and_hms(2025, 4, 1, 12, 0, 0).unwrap(),
                section_due_dates_enabled: false,
                marking_scheme: MarkingScheme::Flexible,
                group_min: 1,
                group_max: 3,
                submission_rule: SubmissionRuleRequest::no_late(),
            })
            .await
            .unwrap()
            .id
    }

    fn student(username: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            username: username.to_string(),
            section_id: None,
            grace_credits: Some(4),
            hidden: false,
        }
    }

    #[tokio::test]
    async fn test_student_grouping_ignores_pending() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage).await;
        let alice = storage.create_student_impl(student("alice")).await.unwrap();
        let bob = storage.create_student_impl(student("bob")).await.unwrap();

        let grouping = storage
            .create_grouping_impl(assignment_id, "group_1")
            .await
            .unwrap();
        storage
            .add_membership_impl(grouping.id, alice.id, MembershipStatus::Inviter)
            .await
            .unwrap();
        storage
            .add_membership_impl(grouping.id, bob.id, MembershipStatus::Pending)
            .await
            .unwrap();

        let found = storage
            .get_student_grouping_impl(assignment_id, alice.id)
            .await
            .unwrap();
        assert_eq!(found.map(|g| g.id), Some(grouping.id));

        let none = storage
            .get_student_grouping_impl(assignment_id, bob.id)
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage).await;
        let alice = storage.create_student_impl(student("alice")).await.unwrap();
        let grouping = storage
            .create_grouping_impl(assignment_id, "group_1")
            .await
            .unwrap();
        storage
            .add_membership_impl(grouping.id, alice.id, MembershipStatus::Inviter)
            .await
            .unwrap();

        let err = storage
            .add_membership_impl(grouping.id, alice.id, MembershipStatus::Accepted)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let storage = memory_storage().await;
        storage.create_student_impl(student("alice")).await.unwrap();
        let err = storage
            .create_student_impl(student("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
