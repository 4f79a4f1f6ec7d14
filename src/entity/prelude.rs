//! 预导入模块，方便使用

pub use super::assignment_stats::{
    ActiveModel as AssignmentStatsActiveModel, Entity as AssignmentStatsEntity,
    Model as AssignmentStatsModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::criteria::{
    ActiveModel as CriterionActiveModel, Entity as Criteria, Model as CriterionModel,
};
pub use super::extra_marks::{
    ActiveModel as ExtraMarkActiveModel, Entity as ExtraMarks, Model as ExtraMarkModel,
};
pub use super::grace_period_deductions::{
    ActiveModel as DeductionActiveModel, Entity as GracePeriodDeductions,
    Model as DeductionModel,
};
pub use super::groupings::{
    ActiveModel as GroupingActiveModel, Entity as Groupings, Model as GroupingModel,
};
pub use super::marks::{ActiveModel as MarkActiveModel, Entity as Marks, Model as MarkModel};
pub use super::memberships::{
    ActiveModel as MembershipActiveModel, Entity as Memberships, Model as MembershipModel,
};
pub use super::periods::{ActiveModel as PeriodActiveModel, Entity as Periods, Model as PeriodModel};
pub use super::results::{ActiveModel as ResultActiveModel, Entity as Results, Model as ResultModel};
pub use super::section_due_dates::{
    ActiveModel as SectionDueDateActiveModel, Entity as SectionDueDates,
    Model as SectionDueDateModel,
};
pub use super::sections::{ActiveModel as SectionActiveModel, Entity as Sections, Model as SectionModel};
pub use super::students::{ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel};
pub use super::submission_rules::{
    ActiveModel as SubmissionRuleActiveModel, Entity as SubmissionRules,
    Model as SubmissionRuleModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
