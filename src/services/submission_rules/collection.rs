use chrono::{DateTime, Utc};
use tracing::debug;

use super::SubmissionRuleService;
use super::engine::SubmissionRuleBehavior;
use crate::errors::{GradingError, Result};
use crate::services::due_dates::{GroupingDueDate, load_grouping};

pub async fn calculate_collection_time(
    service: &SubmissionRuleService,
    assignment_id: i64,
) -> Result<DateTime<Utc>> {
    let storage = service.get_storage();
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Assignment {assignment_id} not found")))?;
    let rule = service.load_rule(assignment_id).await?;

    let collection_time = rule.calculate_collection_time(assignment.due_date);
    debug!("作业 {} 收取时间: {}", assignment_id, collection_time);
    Ok(collection_time)
}

pub async fn collection_time_for_grouping(
    service: &SubmissionRuleService,
    grouping_id: i64,
) -> Result<DateTime<Utc>> {
    let storage = service.get_storage();
    let grouping = load_grouping(storage.as_ref(), grouping_id).await?;
    let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
    let rule = service.load_rule(grouping.assignment_id).await?;

    Ok(rule.calculate_collection_time(context.due_date))
}
