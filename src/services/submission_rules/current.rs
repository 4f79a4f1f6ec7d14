use tracing::warn;

use super::SubmissionRuleService;
use super::engine::SubmissionRuleBehavior;
use crate::errors::{GradingError, Result};
use crate::models::groupings::entities::Grouping;
use crate::services::due_dates::{GroupingDueDate, load_grouping};

/// 设置小组的当前提交，收取时间之后的版本不能成为当前提交
pub async fn set_current_submission(
    service: &SubmissionRuleService,
    grouping_id: i64,
    submission_id: i64,
) -> Result<Grouping> {
    let storage = service.get_storage();

    let grouping = load_grouping(storage.as_ref(), grouping_id).await?;
    let submission = storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Submission {submission_id} not found")))?;

    let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
    let rule = service.load_rule(grouping.assignment_id).await?;
    let collection_time = rule.calculate_collection_time(context.due_date);

    if submission.revision_timestamp > collection_time {
        warn!(
            "拒绝将提交 {} 设为小组 {} 的当前提交：提交时间 {} 晚于收取时间 {}",
            submission_id, grouping_id, submission.revision_timestamp, collection_time
        );
        return Err(GradingError::validation(format!(
            "Revision {} was submitted after the collection time {}",
            submission.revision_number, collection_time
        )));
    }

    storage.set_current_submission(grouping_id, submission_id).await
}
