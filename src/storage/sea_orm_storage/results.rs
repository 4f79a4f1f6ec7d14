//! 评分项与批改结果存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::Entity as Assignments;
use crate::entity::criteria::{
    ActiveModel as CriterionActiveModel, Column as CriterionColumn, Entity as Criteria,
};
use crate::entity::extra_marks::{
    ActiveModel as ExtraMarkActiveModel, Column as ExtraMarkColumn, Entity as ExtraMarks,
};
use crate::entity::marks::{ActiveModel as MarkActiveModel, Column as MarkColumn, Entity as Marks};
use crate::entity::results::{ActiveModel, Column, Entity as Results, Model as ResultModel};
use crate::entity::submissions::Entity as Submissions;
use crate::errors::{GradingError, Result};
use crate::models::criteria::{
    entities::{Criterion, CriterionKind, RUBRIC_LEVELS},
    requests::CreateCriterionRequest,
};
use crate::models::results::entities::{
    ExtraMark, ExtraMarkUnit, Mark, MarkingState, ResultDetail, SubmissionResult,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建评分项，位置排在已有评分项之后
    pub async fn create_criterion_impl(
        &self,
        assignment_id: i64,
        req: CreateCriterionRequest,
    ) -> Result<Criterion> {
        req.validate()?;

        let assignment = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询作业失败: {e}")))?;
        let Some(assignment) = assignment else {
            return Err(GradingError::not_found(format!(
                "Assignment {assignment_id} not found"
            )));
        };

        let scheme = req.kind.scheme().to_string();
        if assignment.marking_scheme != scheme {
            return Err(GradingError::validation(format!(
                "A {scheme} criterion cannot be added to an assignment marked with the {} scheme",
                assignment.marking_scheme
            )));
        }

        let last = Criteria::find()
            .filter(CriterionColumn::AssignmentId.eq(assignment_id))
            .order_by_desc(CriterionColumn::Position)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询评分项失败: {e}")))?;
        let position = last.map(|c| c.position + 1).unwrap_or(1);

        let (weight, max_mark) = match req.kind {
            CriterionKind::Rubric { weight } => (weight, 0.0),
            CriterionKind::Flexible { max } => (0.0, max),
        };

        let model = CriterionActiveModel {
            assignment_id: Set(assignment_id),
            name: Set(req.name.trim().to_string()),
            position: Set(position),
            criterion_type: Set(scheme),
            weight: Set(weight),
            max_mark: Set(max_mark),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建评分项失败: {e}")))?;

        Ok(result.into_criterion())
    }

    pub async fn list_criteria_impl(&self, assignment_id: i64) -> Result<Vec<Criterion>> {
        let results = Criteria::find()
            .filter(CriterionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(CriterionColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询评分项列表失败: {e}")))?;

        Ok(results.into_iter().map(|m| m.into_criterion()).collect())
    }

    pub async fn create_result_impl(
        &self,
        submission_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<SubmissionResult> {
        let submission = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询提交失败: {e}")))?;
        if submission.is_none() {
            return Err(GradingError::not_found(format!(
                "Submission {submission_id} not found"
            )));
        }

        let model = ActiveModel {
            submission_id: Set(submission_id),
            marking_state: Set(marking_state.to_string()),
            released_to_students: Set(released_to_students),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建批改结果失败: {e}")))?;

        Ok(result.into_result())
    }

    pub async fn update_result_state_impl(
        &self,
        result_id: i64,
        marking_state: MarkingState,
        released_to_students: bool,
    ) -> Result<Option<SubmissionResult>> {
        let existing = Results::find_by_id(result_id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询批改结果失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.marking_state = Set(marking_state.to_string());
        active.released_to_students = Set(released_to_students);

        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("更新批改结果失败: {e}")))?;

        Ok(Some(updated.into_result()))
    }

    /// 设置评分项分数，已存在则覆盖
    ///
    /// 量规分数为 0 到 4 的等级，自由评分不超过评分项满分。
    pub async fn set_mark_impl(
        &self,
        result_id: i64,
        criterion_id: i64,
        mark: Option<f64>,
    ) -> Result<Mark> {
        if let Some(value) = mark {
            if !value.is_finite() || value < 0.0 {
                return Err(GradingError::validation("Mark must be a non-negative number"));
            }

            let criterion = Criteria::find_by_id(criterion_id)
                .one(&self.db)
                .await
                .map_err(|e| GradingError::database_operation(format!("查询评分项失败: {e}")))?
                .ok_or_else(|| {
                    GradingError::not_found(format!("Criterion {criterion_id} not found"))
                })?
                .into_criterion();
            let limit = match criterion.kind {
                CriterionKind::Rubric { .. } => RUBRIC_LEVELS,
                CriterionKind::Flexible { max } => max,
            };
            if value > limit {
                return Err(GradingError::validation(format!(
                    "Mark {value} exceeds the maximum {limit} of criterion '{}'",
                    criterion.name
                )));
            }
        }

        let existing = Marks::find()
            .filter(MarkColumn::ResultId.eq(result_id))
            .filter(MarkColumn::CriterionId.eq(criterion_id))
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询分数失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: MarkActiveModel = model.into();
                active.mark = Set(mark);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| GradingError::database_operation(format!("更新分数失败: {e}")))?
            }
            None => MarkActiveModel {
                result_id: Set(result_id),
                criterion_id: Set(criterion_id),
                mark: Set(mark),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建分数失败: {e}")))?,
        };

        Ok(result.into_mark())
    }

    pub async fn add_extra_mark_impl(
        &self,
        result_id: i64,
        extra_mark: f64,
        unit: ExtraMarkUnit,
    ) -> Result<ExtraMark> {
        if !extra_mark.is_finite() {
            return Err(GradingError::validation("Extra mark must be a finite number"));
        }

        let model = ExtraMarkActiveModel {
            result_id: Set(result_id),
            extra_mark: Set(extra_mark),
            unit: Set(unit.to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("创建附加分失败: {e}")))?;

        Ok(result.into_extra_mark())
    }

    /// 提交最新的批改结果及其分数
    pub async fn get_latest_result_impl(&self, submission_id: i64) -> Result<Option<ResultDetail>> {
        let result = Results::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询批改结果失败: {e}")))?;

        match result {
            Some(result) => Ok(Some(self.load_result_detail(result).await?)),
            None => Ok(None),
        }
    }

    /// 提交最新的已完成批改结果，之后新建的重评结果不影响它
    pub async fn get_latest_completed_result_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<ResultDetail>> {
        let result = Results::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .filter(Column::MarkingState.eq(MarkingState::Complete.to_string()))
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询批改结果失败: {e}")))?;

        match result {
            Some(result) => Ok(Some(self.load_result_detail(result).await?)),
            None => Ok(None),
        }
    }

    async fn load_result_detail(&self, result: ResultModel) -> Result<ResultDetail> {
        let marks = Marks::find()
            .filter(MarkColumn::ResultId.eq(result.id))
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询分数失败: {e}")))?;

        let extra_marks = ExtraMarks::find()
            .filter(ExtraMarkColumn::ResultId.eq(result.id))
            .order_by_asc(ExtraMarkColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradingError::database_operation(format!("查询附加分失败: {e}")))?;

        Ok(ResultDetail {
            result: result.into_result(),
            marks: marks.into_iter().map(|m| m.into_mark()).collect(),
            extra_marks: extra_marks.into_iter().map(|m| m.into_extra_mark()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::assignments::entities::MarkingScheme;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::criteria::{entities::CriterionKind, requests::CreateCriterionRequest};
    use crate::models::results::entities::MarkingState;
    use crate::models::submission_rules::requests::SubmissionRuleRequest;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::memory_storage};
    use chrono::{TimeZone, Utc};

    async fn seed(storage: &SeaOrmStorage, marking_scheme: MarkingScheme) -> i64 {
        storage
            .create_assignment_impl(CreateAssignmentRequest {
                short_identifier: "A5".to_string(),
                description: "Hash tables".to_string(),
                due_date: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
                section_due_dates_enabled: false,
                marking_scheme,
                group_min: 1,
                group_max: 1,
                submission_rule: SubmissionRuleRequest::no_late(),
            })
            .await
            .unwrap()
            .id
    }

    fn criterion(name: &str, kind: CriterionKind) -> CreateCriterionRequest {
        CreateCriterionRequest {
            name: name.to_string(),
            kind,
        }
    }

    async fn submission(storage: &SeaOrmStorage, assignment_id: i64) -> i64 {
        let grouping = storage
            .create_grouping_impl(assignment_id, "group_1")
            .await
            .unwrap();
        storage
            .create_submission_impl(
                grouping.id,
                Utc.with_ymd_and_hms(2025, 5, 1, 11, 0, 0).unwrap(),
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_criterion_must_match_marking_scheme() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage, MarkingScheme::Flexible).await;

        storage
            .create_criterion_impl(
                assignment_id,
                criterion("Tests", CriterionKind::Flexible { max: 10.0 }),
            )
            .await
            .unwrap();
        let err = storage
            .create_criterion_impl(
                assignment_id,
                criterion("Style", CriterionKind::Rubric { weight: 1.0 }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");

        let criteria = storage.list_criteria_impl(assignment_id).await.unwrap();
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria[0].kind, CriterionKind::Flexible { max: 10.0 });
    }

    #[tokio::test]
    async fn test_rubric_mark_limited_to_four_levels() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage, MarkingScheme::Rubric).await;
        let design = storage
            .create_criterion_impl(
                assignment_id,
                criterion("Design", CriterionKind::Rubric { weight: 1.0 }),
            )
            .await
            .unwrap();
        let submission_id = submission(&storage, assignment_id).await;
        let result = storage
            .create_result_impl(submission_id, MarkingState::Partial, false)
            .await
            .unwrap();

        let err = storage
            .set_mark_impl(result.id, design.id, Some(40.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");

        let mark = storage
            .set_mark_impl(result.id, design.id, Some(4.0))
            .await
            .unwrap();
        assert_eq!(mark.mark, Some(4.0));
        // 清空分数不需要上限检查
        let cleared = storage.set_mark_impl(result.id, design.id, None).await.unwrap();
        assert_eq!(cleared.id, mark.id);
        assert_eq!(cleared.mark, None);
    }

    #[tokio::test]
    async fn test_flexible_mark_limited_to_max() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage, MarkingScheme::Flexible).await;
        let tests = storage
            .create_criterion_impl(
                assignment_id,
                criterion("Tests", CriterionKind::Flexible { max: 10.0 }),
            )
            .await
            .unwrap();
        let submission_id = submission(&storage, assignment_id).await;
        let result = storage
            .create_result_impl(submission_id, MarkingState::Partial, false)
            .await
            .unwrap();

        let err = storage
            .set_mark_impl(result.id, tests.id, Some(10.5))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(
            storage
                .set_mark_impl(result.id, tests.id, Some(10.0))
                .await
                .is_ok()
        );

        let err = storage
            .set_mark_impl(result.id, tests.id + 100, Some(1.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");
    }

    #[tokio::test]
    async fn test_latest_completed_result_survives_newer_remark() {
        let storage = memory_storage().await;
        let assignment_id = seed(&storage, MarkingScheme::Flexible).await;
        let submission_id = submission(&storage, assignment_id).await;

        let first = storage
            .create_result_impl(submission_id, MarkingState::Partial, false)
            .await
            .unwrap();
        assert!(
            storage
                .get_latest_completed_result_impl(submission_id)
                .await
                .unwrap()
                .is_none()
        );

        let completed = storage
            .update_result_state_impl(first.id, MarkingState::Complete, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(completed.marking_state, MarkingState::Complete);
        assert!(completed.released_to_students);

        let remark = storage
            .create_result_impl(submission_id, MarkingState::Partial, false)
            .await
            .unwrap();

        let latest = storage
            .get_latest_result_impl(submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.result.id, remark.id);
        let latest_completed = storage
            .get_latest_completed_result_impl(submission_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest_completed.result.id, first.id);

        assert!(
            storage
                .update_result_state_impl(remark.id + 100, MarkingState::Complete, true)
                .await
                .unwrap()
                .is_none()
        );
    }
}
