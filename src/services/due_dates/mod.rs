pub mod resolver;
pub mod status;

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::errors::{GradingError, Result};
use crate::models::assignments::entities::{Assignment, SectionDueDate};
use crate::models::groupings::entities::{Grouping, MembershipStatus};
use crate::storage::Storage;
use crate::utils::Clock;

pub struct DueDateService {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl DueDateService {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    pub(crate) fn get_storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// 某教学班适用的截止时间
    pub async fn effective_due_date(
        &self,
        assignment_id: i64,
        section_id: Option<i64>,
    ) -> Result<DateTime<Utc>> {
        let (assignment, section_due_dates) =
            load_assignment(self.storage.as_ref(), assignment_id).await?;
        Ok(resolver::effective_due_date(
            &assignment,
            &section_due_dates,
            section_id,
        ))
    }

    /// 小组适用的截止时间，以发起人的教学班为准
    pub async fn grouping_due_date(&self, grouping_id: i64) -> Result<DateTime<Utc>> {
        let grouping = load_grouping(self.storage.as_ref(), grouping_id).await?;
        let context = GroupingDueDate::load(self.storage.as_ref(), &grouping).await?;
        Ok(context.due_date)
    }

    pub async fn latest_due_date(&self, assignment_id: i64) -> Result<DateTime<Utc>> {
        let (assignment, section_due_dates) =
            load_assignment(self.storage.as_ref(), assignment_id).await?;
        Ok(resolver::latest_due_date(&assignment, &section_due_dates))
    }

    pub async fn is_past_due_date(
        &self,
        assignment_id: i64,
        grouping_id: Option<i64>,
    ) -> Result<bool> {
        status::is_past_due_date(self, assignment_id, grouping_id).await
    }

    pub async fn past_all_due_dates(&self, assignment_id: i64) -> Result<bool> {
        status::past_all_due_dates(self, assignment_id).await
    }

    pub async fn section_names_past_due_date(&self, assignment_id: i64) -> Result<Vec<String>> {
        status::section_names_past_due_date(self, assignment_id).await
    }

    pub async fn past_collection_date(&self, assignment_id: i64) -> Result<bool> {
        status::past_collection_date(self, assignment_id).await
    }
}

/// 读取作业及其分班截止时间
pub(crate) async fn load_assignment(
    storage: &dyn Storage,
    assignment_id: i64,
) -> Result<(Assignment, Vec<SectionDueDate>)> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Assignment {assignment_id} not found")))?;
    let section_due_dates = storage.list_section_due_dates(assignment_id).await?;
    Ok((assignment, section_due_dates))
}

pub(crate) async fn load_grouping(storage: &dyn Storage, grouping_id: i64) -> Result<Grouping> {
    storage
        .get_grouping_by_id(grouping_id)
        .await?
        .ok_or_else(|| GradingError::not_found(format!("Grouping {grouping_id} not found")))
}

/// 小组发起人所在的教学班
pub(crate) async fn inviter_section_id(
    storage: &dyn Storage,
    grouping_id: i64,
) -> Result<Option<i64>> {
    let memberships = storage.list_memberships(grouping_id).await?;
    let Some(inviter) = memberships
        .iter()
        .find(|m| m.status == MembershipStatus::Inviter)
    else {
        return Ok(None);
    };
    let student = storage.get_student_by_id(inviter.user_id).await?;
    Ok(student.and_then(|s| s.section_id))
}

/// 小组、作业与小组适用截止时间的组合
pub(crate) struct GroupingDueDate {
    pub assignment: Assignment,
    pub section_due_dates: Vec<SectionDueDate>,
    pub inviter_section_id: Option<i64>,
    pub due_date: DateTime<Utc>,
}

impl GroupingDueDate {
    pub async fn load(storage: &dyn Storage, grouping: &Grouping) -> Result<Self> {
        let (assignment, section_due_dates) =
            load_assignment(storage, grouping.assignment_id).await?;
        let inviter_section_id = inviter_section_id(storage, grouping.id).await?;
        let due_date =
            resolver::effective_due_date(&assignment, &section_due_dates, inviter_section_id);
        Ok(Self {
            assignment,
            section_due_dates,
            inviter_section_id,
            due_date,
        })
    }
}
