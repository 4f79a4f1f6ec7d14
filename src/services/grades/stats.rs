use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::GradeService;
use super::total::{result_total, total_mark};
use crate::errors::Result;
use crate::models::assignments::entities::Assignment;
use crate::models::stats::entities::AssignmentStats;
use crate::utils::round2;

/// 统计结果中除作业 ID 与时间外的部分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsSummary {
    pub average: f64,
    pub median: f64,
    pub fails: i64,
    pub zeros: i64,
}

fn average(marks: &[f64]) -> f64 {
    if marks.is_empty() {
        0.0
    } else {
        marks.iter().sum::<f64>() / marks.len() as f64
    }
}

/// 已排序分数的中位数
fn median(sorted: &[f64]) -> f64 {
    let count = sorted.len();
    if count == 0 {
        return 0.0;
    }
    if count % 2 == 0 {
        average(&[sorted[count / 2 - 1], sorted[count / 2]])
    } else {
        sorted[count / 2]
    }
}

/// 根据已发布总分计算统计，没有分数时为 None
///
/// 平均分与中位数为满分的百分比；满分为 0 时两者都为 0。
pub fn compute_results_stats(marks: &[f64], out_of: f64) -> Option<ResultsSummary> {
    if marks.is_empty() {
        return None;
    }

    let mut sorted = marks.to_vec();
    sorted.sort_by(f64::total_cmp);

    let fails = sorted.iter().filter(|&&m| m < out_of / 2.0).count() as i64;
    let zeros = sorted.iter().filter(|&&m| m == 0.0).count() as i64;

    let (average, median) = if out_of == 0.0 {
        (0.0, 0.0)
    } else {
        (
            round2(average(&sorted) * 100.0 / out_of),
            round2(median(&sorted) * 100.0 / out_of),
        )
    };

    Some(ResultsSummary {
        average,
        median,
        fails,
        zeros,
    })
}

/// 当前提交最新批改结果中已发布的总分
pub(crate) async fn released_totals(
    service: &GradeService,
    assignment: &Assignment,
) -> Result<Vec<f64>> {
    let storage = service.get_storage();
    let criteria = service.scheme_criteria(assignment).await?;

    let mut totals = Vec::new();
    for grouping in storage.list_groupings(assignment.id).await? {
        let Some(submission_id) = grouping.current_submission_id else {
            continue;
        };
        let Some(detail) = storage.get_latest_result(submission_id).await? else {
            continue;
        };
        if detail.result.released_to_students {
            totals.push(result_total(&detail, assignment.marking_scheme, &criteria));
        }
    }
    Ok(totals)
}

pub async fn update_results_stats(
    service: &GradeService,
    assignment_id: i64,
) -> Result<Option<AssignmentStats>> {
    let assignment = service.load_assignment(assignment_id).await?;
    let storage = service.get_storage();

    let out_of = total_mark(
        assignment.marking_scheme,
        &service.scheme_criteria(&assignment).await?,
    );
    let marks = released_totals(service, &assignment).await?;
    debug!(
        "作业 {} 已发布成绩 {} 份，满分 {}",
        assignment_id,
        marks.len(),
        out_of
    );

    let Some(summary) = compute_results_stats(&marks, out_of) else {
        return Ok(None);
    };

    let updated_at: DateTime<Utc> = service.now();
    let stats = storage
        .save_assignment_stats(AssignmentStats {
            assignment_id,
            results_average: summary.average,
            results_median: summary.median,
            results_fails: summary.fails,
            results_zeros: summary.zeros,
            updated_at,
        })
        .await?;

    info!(
        "作业 {} 统计已更新: 平均 {}%，中位数 {}%，不及格 {}，零分 {}",
        assignment_id,
        stats.results_average,
        stats.results_median,
        stats.results_fails,
        stats.results_zeros
    );

    Ok(Some(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::results::entities::MarkingState;
    use crate::services::GradingSettings;
    use crate::services::grades::test_support::{due, graded_student, rubric_assignment};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::FixedClock;
    use std::sync::Arc;

    #[test]
    fn test_zero_total_gives_zero_average_and_median() {
        let summary = compute_results_stats(&[0.0, 0.0], 0.0).unwrap();
        assert_eq!(summary.average, 0.0);
        assert_eq!(summary.median, 0.0);
        assert_eq!(summary.zeros, 2);
        // 0 < 0/2 不成立，不计为不及格
        assert_eq!(summary.fails, 0);
    }

    #[test]
    fn test_no_marks_gives_none() {
        assert_eq!(compute_results_stats(&[], 24.0), None);
    }

    #[test]
    fn test_stats_percentages() {
        // 排序后 [0, 6, 18, 24]，中位数 12
        let summary = compute_results_stats(&[18.0, 0.0, 24.0, 6.0], 24.0).unwrap();
        assert_eq!(summary.average, 50.0);
        assert_eq!(summary.median, 50.0);
        assert_eq!(summary.fails, 2);
        assert_eq!(summary.zeros, 1);
    }

    #[tokio::test]
    async fn test_update_results_stats_persists_released_only() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let (assignment, criteria) = rubric_assignment(&storage).await;
        // 4×1 + 4×2 + 4×3 = 24
        graded_student(
            &storage,
            assignment.id,
            "full",
            &[Some(4.0), Some(4.0), Some(4.0)],
            &criteria,
            MarkingState::Complete,
            true,
        )
        .await;
        // 2×1 + 2×2 + 2×3 = 12
        graded_student(
            &storage,
            assignment.id,
            "half",
            &[Some(2.0), Some(2.0), Some(2.0)],
            &criteria,
            MarkingState::Complete,
            true,
        )
        .await;
        graded_student(
            &storage,
            assignment.id,
            "unreleased",
            &[Some(0.0), Some(0.0), Some(0.0)],
            &criteria,
            MarkingState::Complete,
            false,
        )
        .await;

        let service = GradeService::new(
            storage.clone(),
            Arc::new(FixedClock::new(due())),
            GradingSettings::default(),
        );
        let stats = service
            .update_results_stats(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stats.results_average, 75.0);
        assert_eq!(stats.results_median, 75.0);
        assert_eq!(stats.results_fails, 0);
        assert_eq!(stats.results_zeros, 0);

        let saved = storage
            .get_assignment_stats(assignment.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved, stats);
    }
}
