use tracing::debug;

use super::GradeService;
use super::total::{result_total, total_mark};
use crate::errors::{GradingError, Result};

/// 百分比所在的区间
///
/// 每个区间覆盖 `100 / intervals` 个百分点：0 落入第一个区间，
/// 恰好落在边界上的百分比归入较低的区间，100 及以上归入最后一个区间。
pub fn bucket_index(percentage: i64, intervals: usize) -> usize {
    let last = intervals.saturating_sub(1);
    if percentage <= 0 {
        return 0;
    }
    if percentage >= 100 {
        return last;
    }
    let steps = (100 / intervals.max(1)) as i64;
    let index = if percentage % steps == 0 {
        percentage / steps - 1
    } else {
        percentage / steps
    };
    (index as usize).min(last)
}

/// 把总分分布到各区间，满分为 0 时全部为 0
pub fn distribute(totals: &[f64], out_of: f64, intervals: usize) -> Vec<u32> {
    let mut distribution = vec![0u32; intervals];
    if out_of == 0.0 || intervals == 0 {
        return distribution;
    }
    for total in totals {
        let percentage = (total / out_of * 100.0).ceil() as i64;
        distribution[bucket_index(percentage, intervals)] += 1;
    }
    distribution
}

pub async fn grade_distribution(
    service: &GradeService,
    assignment_id: i64,
    intervals: usize,
) -> Result<Vec<u32>> {
    if intervals == 0 || intervals > 100 {
        return Err(GradingError::validation(format!(
            "Distribution intervals must be within 1..=100, got {intervals}"
        )));
    }
    let assignment = service.load_assignment(assignment_id).await?;
    let storage = service.get_storage();

    let criteria = service.scheme_criteria(&assignment).await?;
    let out_of = total_mark(assignment.marking_scheme, &criteria);

    let mut totals = Vec::new();
    if out_of != 0.0 {
        for grouping in storage.list_groupings(assignment_id).await? {
            let Some(submission_id) = grouping.current_submission_id else {
                continue;
            };
            if let Some(detail) = storage.get_latest_completed_result(submission_id).await? {
                totals.push(result_total(&detail, assignment.marking_scheme, &criteria));
            }
        }
    }

    let distribution = distribute(&totals, out_of, intervals);
    debug!("作业 {} 成绩分布: {:?}", assignment_id, distribution);
    Ok(distribution)
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
    fn test_bucket_boundaries() {
        assert_eq!(bucket_index(0, 20), 0);
        assert_eq!(bucket_index(5, 20), 0);
        assert_eq!(bucket_index(6, 20), 1);
        assert_eq!(bucket_index(10, 20), 1);
        assert_eq!(bucket_index(99, 20), 19);
        assert_eq!(bucket_index(100, 20), 19);
        assert_eq!(bucket_index(130, 20), 19);
    }

    #[test]
    fn test_bucket_index_clamped_when_steps_do_not_divide() {
        // 30 个区间每个 3 个百分点，99 会算出 33
        assert_eq!(bucket_index(99, 30), 29);
    }

    #[test]
    fn test_zero_out_of_gives_empty_buckets() {
        assert_eq!(distribute(&[3.0, 4.0], 0.0, 4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_distribute_rounds_percentage_up() {
        // 5.01% 向上取整为 6%，进入第二个区间
        let distribution = distribute(&[5.01, 0.0, 100.0], 100.0, 20);
        assert_eq!(distribution[0], 1);
        assert_eq!(distribution[1], 1);
        assert_eq!(distribution[19], 1);
        assert_eq!(distribution.iter().sum::<u32>(), 3);
    }

    #[tokio::test]
    async fn test_newer_remark_keeps_completed_result_counted() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let (assignment, criteria) = rubric_assignment(&storage).await;
        // 2×1 + 2×2 + 2×3 = 12，50%
        let student_id = graded_student(
            &storage,
            assignment.id,
            "remarked",
            &[Some(2.0), Some(2.0), Some(2.0)],
            &criteria,
            MarkingState::Complete,
            true,
        )
        .await;
        let grouping = storage
            .get_student_grouping(assignment.id, student_id)
            .await
            .unwrap()
            .unwrap();
        storage
            .create_result(
                grouping.current_submission_id.unwrap(),
                MarkingState::Partial,
                false,
            )
            .await
            .unwrap();

        let service = GradeService::new(
            storage,
            Arc::new(FixedClock::new(due())),
            GradingSettings {
                distribution_intervals: 4,
                default_grace_credits: 0,
            },
        );
        let distribution = service.grade_distribution(assignment.id).await.unwrap();
        assert_eq!(distribution, vec![0, 1, 0, 0]);
    }

    #[tokio::test]
    async fn test_only_completed_results_counted() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let (assignment, criteria) = rubric_assignment(&storage).await;
        graded_student(
            &storage,
            assignment.id,
            "done",
            &[Some(4.0), Some(4.0), Some(4.0)],
            &criteria,
            MarkingState::Complete,
            false,
        )
        .await;
        graded_student(
            &storage,
            assignment.id,
            "partial",
            &[Some(1.0), None, None],
            &criteria,
            MarkingState::Partial,
            false,
        )
        .await;

        let service = GradeService::new(
            storage,
            Arc::new(FixedClock::new(due())),
            GradingSettings {
                distribution_intervals: 10,
                default_grace_credits: 0,
            },
        );
        let distribution = service.grade_distribution(assignment.id).await.unwrap();
        assert_eq!(distribution.len(), 10);
        assert_eq!(distribution[9], 1);
        assert_eq!(distribution.iter().sum::<u32>(), 1);

        assert!(
            service
                .grade_distribution_with_intervals(assignment.id, 0)
                .await
                .is_err()
        );
    }
}
