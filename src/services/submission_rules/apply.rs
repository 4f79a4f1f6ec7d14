use tracing::{debug, info};

use super::SubmissionRuleService;
use super::engine::SubmissionRuleBehavior;
use crate::errors::{GradingError, Result};
use crate::models::submissions::entities::Submission;
use crate::services::due_dates::{GroupingDueDate, load_grouping};

pub async fn apply_submission_rule(
    service: &SubmissionRuleService,
    submission_id: i64,
) -> Result<Submission> {
    let storage = service.get_storage();

    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Submission {submission_id} not found")))?;
    let grouping = load_grouping(storage.as_ref(), submission.grouping_id).await?;
    let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
    let rule = service.load_rule(grouping.assignment_id).await?;
    if !rule.is_valid_for_assignment(&context.assignment) {
        return Err(GradingError::contract_violation(format!(
            "Submission rule {} cannot be applied to assignment {}",
            rule.id(),
            context.assignment.short_identifier
        )));
    }

    let Some(penalty) = rule.apply_to_submission(context.due_date, &submission) else {
        debug!("提交 {} 按时提交，无需扣除", submission_id);
        return Ok(submission);
    };

    if penalty.deduction == 0 {
        debug!(
            "提交 {} 超时 {} 小时，但规则不产生扣除",
            submission_id, penalty.overtime_hours
        );
        return Ok(submission);
    }

    let membership_ids: Vec<i64> = storage
        .list_memberships(grouping.id)
        .await?
        .into_iter()
        .filter(|m| m.status.is_accepted())
        .map(|m| m.id)
        .collect();

    let recorded = storage
        .record_grace_period_deductions(submission_id, &membership_ids, penalty.deduction)
        .await?;

    info!(
        "提交 {} 超时 {} 小时，为 {} 名成员各扣除 {} 宽限额度",
        submission_id,
        penalty.overtime_hours,
        recorded.len(),
        penalty.deduction
    );

    Ok(submission)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seed_grouping;
    use crate::models::assignments::entities::MarkingScheme;
    use crate::models::assignments::requests::{CreateAssignmentRequest, SectionDueDateRequest};
    use crate::models::groupings::entities::MembershipStatus;
    use crate::models::students::requests::CreateStudentRequest;
    use crate::models::submission_rules::requests::{PeriodRequest, SubmissionRuleRequest};
    use crate::services::SubmissionRuleService;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::memory_storage;
    use crate::utils::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn two_periods() -> SubmissionRuleRequest {
        SubmissionRuleRequest::grace_period(vec![
            PeriodRequest {
                hours: 24,
                deduction: 5,
            },
            PeriodRequest {
                hours: 24,
                deduction: 10,
            },
        ])
    }

    async fn deductions_after(offset: Duration) -> Vec<i32> {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let seeded = seed_grouping(&storage, due(), two_periods()).await;
        let submission = storage
            .create_submission(seeded.grouping.id, due() + offset)
            .await
            .unwrap();

        let service =
            SubmissionRuleService::new(storage.clone(), Arc::new(FixedClock::new(due() + offset)));
        let applied = service.apply_submission_rule(submission.id).await.unwrap();
        assert_eq!(applied, submission);

        storage
            .list_deductions_for_submission(submission.id)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.deduction)
            .collect()
    }

    #[tokio::test]
    async fn test_ten_hours_late_deducts_first_period() {
        // 只有发起人与已接受成员被扣除
        assert_eq!(deductions_after(Duration::hours(10)).await, vec![5, 5]);
    }

    #[tokio::test]
    async fn test_thirty_hours_late_deducts_both_periods() {
        assert_eq!(deductions_after(Duration::hours(30)).await, vec![15, 15]);
    }

    #[tokio::test]
    async fn test_on_time_submission_records_nothing() {
        assert!(deductions_after(Duration::zero()).await.is_empty());
    }

    #[tokio::test]
    async fn test_reapplying_is_idempotent() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let seeded = seed_grouping(&storage, due(), two_periods()).await;
        let submission = storage
            .create_submission(seeded.grouping.id, due() + Duration::hours(10))
            .await
            .unwrap();
        let service = SubmissionRuleService::new(storage.clone(), Arc::new(FixedClock::new(due())));

        service.apply_submission_rule(submission.id).await.unwrap();
        service.apply_submission_rule(submission.id).await.unwrap();

        let deductions = storage
            .list_deductions_for_submission(submission.id)
            .await
            .unwrap();
        assert_eq!(deductions.len(), 2);

        let inviter = &seeded.members[0];
        assert_eq!(
            storage.sum_deductions_for_student(inviter.id).await.unwrap(),
            5
        );
        let pending = &seeded.members[2];
        assert_eq!(
            storage.sum_deductions_for_student(pending.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_no_late_rule_never_deducts() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let seeded = seed_grouping(&storage, due(), SubmissionRuleRequest::no_late()).await;
        let submission = storage
            .create_submission(seeded.grouping.id, due() + Duration::hours(3))
            .await
            .unwrap();
        let service = SubmissionRuleService::new(storage.clone(), Arc::new(FixedClock::new(due())));

        service.apply_submission_rule(submission.id).await.unwrap();
        assert!(
            storage
                .list_deductions_for_submission(submission.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_overtime_measured_from_inviter_section_due_date() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);
        let section = storage.create_section("LEC0101").await.unwrap();
        let assignment = storage
            .create_assignment(CreateAssignmentRequest {
                short_identifier: "A7".to_string(),
                description: "Heaps".to_string(),
                due_date: due(),
                section_due_dates_enabled: true,
                marking_scheme: MarkingScheme::Rubric,
                group_min: 1,
                group_max: 1,
                submission_rule: two_periods(),
            })
            .await
            .unwrap();
        storage
            .set_section_due_date(
                assignment.id,
                SectionDueDateRequest {
                    section_id: section.id,
                    due_date: Some(due() + Duration::hours(24)),
                },
            )
            .await
            .unwrap();

        let student = storage
            .create_student(CreateStudentRequest {
                username: "c7evening".to_string(),
                section_id: Some(section.id),
                grace_credits: Some(20),
                hidden: false,
            })
            .await
            .unwrap();
        let grouping = storage
            .create_grouping(assignment.id, "group_0002")
            .await
            .unwrap();
        storage
            .add_membership(grouping.id, student.id, MembershipStatus::Inviter)
            .await
            .unwrap();

        // 距作业截止 30 小时，距分班截止只有 6 小时，只落入第一阶段
        let submission = storage
            .create_submission(grouping.id, due() + Duration::hours(30))
            .await
            .unwrap();
        let service = SubmissionRuleService::new(
            storage.clone(),
            Arc::new(FixedClock::new(due() + Duration::hours(30))),
        );
        service.apply_submission_rule(submission.id).await.unwrap();

        let deductions: Vec<i32> = storage
            .list_deductions_for_submission(submission.id)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.deduction)
            .collect();
        assert_eq!(deductions, vec![5]);
    }
}
