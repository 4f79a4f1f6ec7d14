//! 成绩报表
//!
//! 每个未隐藏的学生一行，没有小组或没有可用批改结果时分数列留空。

use tracing::debug;

use super::GradeService;
use super::total::{percentage, result_total, total_mark};
use crate::errors::Result;
use crate::models::criteria::entities::Criterion;
use crate::models::reports::responses::{
    CriterionCell, GraceCredits, SimpleReportRow, StudentReportRow,
};
use crate::models::results::entities::ResultDetail;
use crate::models::students::entities::Student;
use crate::services::grace_credits::remaining_for_student;
use crate::storage::Storage;

/// 学生在该作业下当前提交的最新批改结果
async fn student_result(
    storage: &dyn Storage,
    assignment_id: i64,
    student: &Student,
) -> Result<Option<ResultDetail>> {
    let Some(grouping) = storage
        .get_student_grouping(assignment_id, student.id)
        .await?
    else {
        return Ok(None);
    };
    let Some(submission_id) = grouping.current_submission_id else {
        return Ok(None);
    };
    storage.get_latest_result(submission_id).await
}

fn criterion_cells(criteria: &[Criterion], detail: Option<&ResultDetail>) -> Vec<CriterionCell> {
    criteria
        .iter()
        .map(|c| CriterionCell {
            mark: detail.and_then(|d| d.mark_for(c.id)).and_then(|m| m.mark),
            weight_or_max: c.weight_or_max(),
        })
        .collect()
}

pub async fn student_report_rows(
    service: &GradeService,
    assignment_id: i64,
) -> Result<Vec<StudentReportRow>> {
    let assignment = service.load_assignment(assignment_id).await?;
    let scheme = assignment.marking_scheme;
    let storage = service.get_storage();

    let criteria = service.scheme_criteria(&assignment).await?;
    let out_of = total_mark(scheme, &criteria);

    let mut rows = Vec::new();
    for student in storage.list_students().await? {
        if student.hidden {
            continue;
        }
        let detail = student_result(storage.as_ref(), assignment_id, &student).await?;
        let remaining = remaining_for_student(storage.as_ref(), &student).await?;

        rows.push(StudentReportRow {
            username: student.username.clone(),
            percentage: detail
                .as_ref()
                .and_then(|d| percentage(result_total(d, scheme, &criteria), out_of)),
            criteria: criterion_cells(&criteria, detail.as_ref()),
            extra_points: detail.as_ref().map(ResultDetail::total_extra_points),
            extra_percentage: detail.as_ref().map(ResultDetail::total_extra_percentage),
            grace_credits: GraceCredits {
                remaining,
                total: i64::from(student.grace_credits),
            },
        });
    }

    debug!("作业 {} 详细报表 {} 行", assignment_id, rows.len());
    Ok(rows)
}

pub async fn simple_report_rows(
    service: &GradeService,
    assignment_id: i64,
) -> Result<Vec<SimpleReportRow>> {
    let assignment = service.load_assignment(assignment_id).await?;
    let scheme = assignment.marking_scheme;
    let storage = service.get_storage();

    let criteria = service.scheme_criteria(&assignment).await?;
    let out_of = total_mark(scheme, &criteria);

    let mut rows = Vec::new();
    for student in storage.list_students().await? {
        if student.hidden {
            continue;
        }
        let detail = student_result(storage.as_ref(), assignment_id, &student).await?;
        rows.push(SimpleReportRow {
            username: student.username,
            percentage: detail
                .and_then(|d| percentage(result_total(&d, scheme, &criteria), out_of)),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use crate::models::results::entities::{ExtraMarkUnit, MarkingState};
    use crate::models::students::requests::CreateStudentRequest;
    use crate::services::grades::test_support::{due, graded_student, rubric_assignment};
    use crate::services::{GradeService, GradingSettings};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::FixedClock;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_report_rows() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let (assignment, criteria) = rubric_assignment(&storage).await;
        let graded = graded_student(
            &storage,
            assignment.id,
            "amy",
            &[Some(4.0), Some(2.0), None],
            &criteria,
            MarkingState::Complete,
            true,
        )
        .await;

        let grouping = storage
            .get_student_grouping(assignment.id, graded)
            .await
            .unwrap()
            .unwrap();
        let detail = storage
            .get_latest_result(grouping.current_submission_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        storage
            .add_extra_mark(detail.result.id, 4.0, ExtraMarkUnit::Points)
            .await
            .unwrap();

        storage
            .create_student(CreateStudentRequest {
                username: "bob".to_string(),
                section_id: None,
                grace_credits: Some(3),
                hidden: false,
            })
            .await
            .unwrap();
        storage
            .create_student(CreateStudentRequest {
                username: "hidden_carl".to_string(),
                section_id: None,
                grace_credits: Some(3),
                hidden: true,
            })
            .await
            .unwrap();

        let service = GradeService::new(
            storage,
            Arc::new(FixedClock::new(due())),
            GradingSettings::default(),
        );

        let rows = service.student_report_rows(assignment.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        // 4×1 + 2×2 + 4 附加分 = 12，占 24 的 50%
        assert_eq!(
            rows[0].to_record(),
            vec!["amy", "50", "4", "1", "2", "2", "", "3", "4", "0", "2/2"]
        );
        assert_eq!(
            rows[1].to_record(),
            vec!["bob", "", "", "1", "", "2", "", "3", "", "", "3/3"]
        );

        let simple = service.simple_report_rows(assignment.id).await.unwrap();
        assert_eq!(simple[0].to_record(), vec!["amy", "50"]);
        assert_eq!(simple[1].to_record(), vec!["bob", ""]);
    }
}
