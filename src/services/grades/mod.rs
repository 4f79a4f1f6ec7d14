pub mod distribution;
pub mod reports;
pub mod stats;
pub mod total;

use std::sync::Arc;

use super::GradingSettings;
use crate::errors::{GradingError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::criteria::entities::Criterion;
use crate::models::reports::responses::{SimpleReportRow, StudentReportRow};
use crate::models::stats::entities::AssignmentStats;
use crate::storage::Storage;
use crate::utils::Clock;

pub struct GradeService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    settings: GradingSettings,
}

impl GradeService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, settings: GradingSettings) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub(crate) fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    pub(crate) async fn load_assignment(&self, assignment_id: i64) -> Result<Assignment> {
        self.storage
            .get_assignment_by_id(assignment_id)
            .await?
            .ok_or_else(|| GradingError::not_found(format!("Assignment {assignment_id} not found")))
    }

    /// 作业评分方案下的评分项，按 position 排序
    pub(crate) async fn scheme_criteria(&self, assignment: &Assignment) -> Result<Vec<Criterion>> {
        let criteria = self.storage.list_criteria(assignment.id).await?;
        Ok(total::scheme_criteria(assignment.marking_scheme, criteria))
    }

    /// 作业满分
    pub async fn total_mark(&self, assignment_id: i64) -> Result<f64> {
        let assignment = self.load_assignment(assignment_id).await?;
        let criteria = self.scheme_criteria(&assignment).await?;
        Ok(total::total_mark(assignment.marking_scheme, &criteria))
    }

    /// 重新计算并保存已发布成绩的统计，没有已发布成绩时返回 None
    pub async fn update_results_stats(&self, assignment_id: i64) -> Result<Option<AssignmentStats>> {
        stats::update_results_stats(self, assignment_id).await
    }

    /// 使用配置的区间数计算成绩分布
    pub async fn grade_distribution(&self, assignment_id: i64) -> Result<Vec<u32>> {
        distribution::grade_distribution(self, assignment_id, self.settings.distribution_intervals)
            .await
    }

    pub async fn grade_distribution_with_intervals(
        &self,
        assignment_id: i64,
        intervals: usize,
    ) -> Result<Vec<u32>> {
        distribution::grade_distribution(self, assignment_id, intervals).await
    }

    pub async fn student_report_rows(&self, assignment_id: i64) -> Result<Vec<StudentReportRow>> {
        reports::student_report_rows(self, assignment_id).await
    }

    pub async fn simple_report_rows(&self, assignment_id: i64) -> Result<Vec<SimpleReportRow>> {
        reports::simple_report_rows(self, assignment_id).await
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{due, rubric_assignment};
    use super::*;
    use crate::models::assignments::entities::MarkingScheme;
    use crate::models::assignments::requests::CreateAssignmentRequest;
    use crate::models::criteria::{entities::CriterionKind, requests::CreateCriterionRequest};
    use crate::models::submission_rules::requests::SubmissionRuleRequest;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::FixedClock;

    #[tokio::test]
    async fn test_total_mark_follows_marking_scheme() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let flexible = storage
            .create_assignment(CreateAssignmentRequest {
                short_identifier: "A6".to_string(),
                description: "Sorting".to_string(),
                due_date: due(),
                section_due_dates_enabled: false,
                marking_scheme: MarkingScheme::Flexible,
                group_min: 1,
                group_max: 1,
                submission_rule: SubmissionRuleRequest::no_late(),
            })
            .await
            .unwrap();
        storage
            .create_criterion(
                flexible.id,
                CreateCriterionRequest {
                    name: "Tests".to_string(),
                    kind: CriterionKind::Flexible { max: 10.0 },
                },
            )
            .await
            .unwrap();
        assert!(
            storage
                .create_criterion(
                    flexible.id,
                    CreateCriterionRequest {
                        name: "Style".to_string(),
                        kind: CriterionKind::Rubric { weight: 1.0 },
                    },
                )
                .await
                .is_err()
        );
        let (rubric, _) = rubric_assignment(&storage).await;

        let service = GradeService::new(
            storage,
            Arc::new(FixedClock::new(due())),
            GradingSettings::default(),
        );
        assert_eq!(service.total_mark(flexible.id).await.unwrap(), 10.0);
        assert_eq!(service.total_mark(rubric.id).await.unwrap(), 24.0);
        assert_eq!(service.total_mark(rubric.id + 100).await.unwrap_err().code(), "E005");
    }
}
