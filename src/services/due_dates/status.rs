use tracing::debug;

use super::{DueDateService, GroupingDueDate, load_assignment, load_grouping, resolver};
use crate::errors::{GradingError, Result};
use crate::services::submission_rules::engine::SubmissionRuleBehavior;

pub async fn is_past_due_date(
    service: &DueDateService,
    assignment_id: i64,
    grouping_id: Option<i64>,
) -> Result<bool> {
    let storage = service.get_storage();
    let now = service.now();

    let past = match grouping_id {
        Some(grouping_id) => {
            let grouping = load_grouping(storage.as_ref(), grouping_id).await?;
            if grouping.assignment_id != assignment_id {
                return Err(GradingError::validation(format!(
                    "Grouping {grouping_id} does not belong to assignment {assignment_id}"
                )));
            }
            let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
            resolver::is_past_due_date(
                &context.assignment,
                &context.section_due_dates,
                context.inviter_section_id,
                now,
            )
        }
        None => {
            let (assignment, section_due_dates) =
                load_assignment(storage.as_ref(), assignment_id).await?;
            resolver::is_past_due_date(&assignment, &section_due_dates, None, now)
        }
    };

    debug!(
        "作业 {} 小组 {:?} 是否已过截止时间: {}",
        assignment_id, grouping_id, past
    );
    Ok(past)
}

pub async fn past_all_due_dates(service: &DueDateService, assignment_id: i64) -> Result<bool> {
    let storage = service.get_storage();
    let (assignment, section_due_dates) = load_assignment(storage.as_ref(), assignment_id).await?;
    Ok(resolver::past_all_due_dates(
        &assignment,
        &section_due_dates,
        service.now(),
    ))
}

pub async fn section_names_past_due_date(
    service: &DueDateService,
    assignment_id: i64,
) -> Result<Vec<String>> {
    let storage = service.get_storage();
    let (assignment, section_due_dates) = load_assignment(storage.as_ref(), assignment_id).await?;

    let mut names = std::collections::HashMap::new();
    if assignment.section_due_dates_enabled {
        for due in &section_due_dates {
            if let Some(section) = storage.get_section_by_id(due.section_id).await? {
                names.insert(section.id, section.name);
            }
        }
    }

    Ok(resolver::section_names_past_due_date(
        &assignment,
        &section_due_dates,
        service.now(),
        |id| names.get(&id).cloned(),
    ))
}

/// 当前时间是否已过作业的收取时间（以作业截止时间为基准）
pub async fn past_collection_date(service: &DueDateService, assignment_id: i64) -> Result<bool> {
    let storage = service.get_storage();
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Assignment {assignment_id} not found")))?;
    let rule = storage.get_submission_rule(assignment_id).await?.ok_or_else(|| {
        GradingError::contract_violation(format!(
            "Assignment {assignment_id} has no submission rule"
        ))
    })?;

    Ok(service.now() > rule.calculate_collection_time(assignment.due_date))
}
