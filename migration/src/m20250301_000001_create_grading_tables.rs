use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建教学班表
        manager
            .create_table(
                Table::create()
                    .table(Sections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sections::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Sections::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::SectionId).big_integer().null())
                    .col(ColumnDef::new(Students::GraceCredits).integer().not_null())
                    .col(ColumnDef::new(Students::Hidden).boolean().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::ShortIdentifier)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Assignments::Description).text().not_null())
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::SectionDueDatesEnabled).boolean().not_null())
                    .col(ColumnDef::new(Assignments::MarkingScheme).string().not_null())
                    .col(ColumnDef::new(Assignments::GroupMin).integer().not_null())
                    .col(ColumnDef::new(Assignments::GroupMax).integer().not_null())
                    .col(ColumnDef::new(Assignments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建分班截止时间表
        manager
            .create_table(
                Table::create()
                    .table(SectionDueDates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SectionDueDates::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SectionDueDates::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(SectionDueDates::SectionId).big_integer().not_null())
                    .col(ColumnDef::new(SectionDueDates::DueDate).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SectionDueDates::Table, SectionDueDates::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SectionDueDates::Table, SectionDueDates::SectionId)
                            .to(Sections::Table, Sections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_section_due_dates_assignment_section")
                    .table(SectionDueDates::Table)
                    .col(SectionDueDates::AssignmentId)
                    .col(SectionDueDates::SectionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建提交规则表（每个作业一条）
        manager
            .create_table(
                Table::create()
                    .table(SubmissionRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionRules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionRules::AssignmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SubmissionRules::RuleType).string().not_null())
                    .col(ColumnDef::new(SubmissionRules::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubmissionRules::Table, SubmissionRules::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建罚分阶段表
        manager
            .create_table(
                Table::create()
                    .table(Periods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Periods::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Periods::SubmissionRuleId).big_integer().not_null())
                    .col(ColumnDef::new(Periods::Hours).integer().not_null())
                    .col(ColumnDef::new(Periods::Deduction).integer().not_null())
                    .col(ColumnDef::new(Periods::Position).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Periods::Table, Periods::SubmissionRuleId)
                            .to(SubmissionRules::Table, SubmissionRules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_periods_rule_position")
                    .table(Periods::Table)
                    .col(Periods::SubmissionRuleId)
                    .col(Periods::Position)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建评分项表
        manager
            .create_table(
                Table::create()
                    .table(Criteria::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Criteria::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Criteria::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Criteria::Name).string().not_null())
                    .col(ColumnDef::new(Criteria::Position).integer().not_null())
                    .col(ColumnDef::new(Criteria::CriterionType).string().not_null())
                    .col(ColumnDef::new(Criteria::Weight).double().not_null())
                    .col(ColumnDef::new(Criteria::MaxMark).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Criteria::Table, Criteria::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_criteria_assignment_id")
                    .table(Criteria::Table)
                    .col(Criteria::AssignmentId)
                    .to_owned(),
            )
            .await?;

        // 创建小组表
        manager
            .create_table(
                Table::create()
                    .table(Groupings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Groupings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Groupings::AssignmentId).big_integer().not_null())
                    .col(ColumnDef::new(Groupings::GroupName).string().not_null())
                    .col(ColumnDef::new(Groupings::CurrentSubmissionId).big_integer().null())
                    .col(ColumnDef::new(Groupings::GraderId).big_integer().null())
                    .col(ColumnDef::new(Groupings::AdminApproved).boolean().not_null())
                    .col(ColumnDef::new(Groupings::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Groupings::Table, Groupings::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_groupings_assignment_group_name")
                    .table(Groupings::Table)
                    .col(Groupings::AssignmentId)
                    .col(Groupings::GroupName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建小组成员表
        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Memberships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Memberships::GroupingId).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Memberships::Status).string().not_null())
                    .col(ColumnDef::new(Memberships::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Memberships::Table, Memberships::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Memberships::Table, Memberships::UserId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memberships_grouping_user")
                    .table(Memberships::Table)
                    .col(Memberships::GroupingId)
                    .col(Memberships::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建提交表
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::GroupingId).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::RevisionNumber).integer().not_null())
                    .col(ColumnDef::new(Submissions::RevisionTimestamp).big_integer().not_null())
                    .col(ColumnDef::new(Submissions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::GroupingId)
                            .to(Groupings::Table, Groupings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_grouping_revision")
                    .table(Submissions::Table)
                    .col(Submissions::GroupingId)
                    .col(Submissions::RevisionNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建批改结果表
        manager
            .create_table(
                Table::create()
                    .table(Results::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Results::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Results::SubmissionId).big_integer().not_null())
                    .col(ColumnDef::new(Results::MarkingState).string().not_null())
                    .col(ColumnDef::new(Results::ReleasedToStudents).boolean().not_null())
                    .col(ColumnDef::new(Results::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Results::Table, Results::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_results_submission_id")
                    .table(Results::Table)
                    .col(Results::SubmissionId)
                    .to_owned(),
            )
            .await?;

        // 创建评分项分数表
        manager
            .create_table(
                Table::create()
                    .table(Marks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Marks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Marks::ResultId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::CriterionId).big_integer().not_null())
                    .col(ColumnDef::new(Marks::Mark).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Marks::Table, Marks::CriterionId)
                            .to(Criteria::Table, Criteria::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_marks_result_criterion")
                    .table(Marks::Table)
                    .col(Marks::ResultId)
                    .col(Marks::CriterionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建附加分表
        manager
            .create_table(
                Table::create()
                    .table(ExtraMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExtraMarks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExtraMarks::ResultId).big_integer().not_null())
                    .col(ColumnDef::new(ExtraMarks::ExtraMark).double().not_null())
                    .col(ColumnDef::new(ExtraMarks::Unit).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(ExtraMarks::Table, ExtraMarks::ResultId)
                            .to(Results::Table, Results::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建宽限期扣除表
        manager
            .create_table(
                Table::create()
                    .table(GracePeriodDeductions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GracePeriodDeductions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GracePeriodDeductions::MembershipId).big_integer().not_null())
                    .col(ColumnDef::new(GracePeriodDeductions::SubmissionId).big_integer().not_null())
                    .col(ColumnDef::new(GracePeriodDeductions::Deduction).integer().not_null())
                    .col(ColumnDef::new(GracePeriodDeductions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(GracePeriodDeductions::Table, GracePeriodDeductions::MembershipId)
                            .to(Memberships::Table, Memberships::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GracePeriodDeductions::Table, GracePeriodDeductions::SubmissionId)
                            .to(Submissions::Table, Submissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deductions_membership_submission")
                    .table(GracePeriodDeductions::Table)
                    .col(GracePeriodDeductions::MembershipId)
                    .col(GracePeriodDeductions::SubmissionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建作业统计表
        manager
            .create_table(
                Table::create()
                    .table(AssignmentStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentStats::AssignmentId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssignmentStats::ResultsAverage).double().not_null())
                    .col(ColumnDef::new(AssignmentStats::ResultsMedian).double().not_null())
                    .col(ColumnDef::new(AssignmentStats::ResultsFails).big_integer().not_null())
                    .col(ColumnDef::new(AssignmentStats::ResultsZeros).big_integer().not_null())
                    .col(ColumnDef::new(AssignmentStats::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentStats::Table, AssignmentStats::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(AssignmentStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GracePeriodDeductions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExtraMarks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Marks::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Results::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Groupings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Criteria::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Periods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubmissionRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SectionDueDates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sections::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sections {
    #[sea_orm(iden = "sections")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Username,
    SectionId,
    GraceCredits,
    Hidden,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    ShortIdentifier,
    Description,
    DueDate,
    SectionDueDatesEnabled,
    MarkingScheme,
    GroupMin,
    GroupMax,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SectionDueDates {
    #[sea_orm(iden = "section_due_dates")]
    Table,
    Id,
    AssignmentId,
    SectionId,
    DueDate,
}

#[derive(DeriveIden)]
enum SubmissionRules {
    #[sea_orm(iden = "submission_rules")]
    Table,
    Id,
    AssignmentId,
    RuleType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Periods {
    #[sea_orm(iden = "periods")]
    Table,
    Id,
    SubmissionRuleId,
    Hours,
    Deduction,
    Position,
}

#[derive(DeriveIden)]
enum Criteria {
    #[sea_orm(iden = "criteria")]
    Table,
    Id,
    AssignmentId,
    Name,
    Position,
    CriterionType,
    Weight,
    MaxMark,
}

#[derive(DeriveIden)]
enum Groupings {
    #[sea_orm(iden = "groupings")]
    Table,
    Id,
    AssignmentId,
    GroupName,
    CurrentSubmissionId,
    GraderId,
    AdminApproved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Memberships {
    #[sea_orm(iden = "memberships")]
    Table,
    Id,
    GroupingId,
    UserId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    GroupingId,
    RevisionNumber,
    RevisionTimestamp,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Results {
    #[sea_orm(iden = "results")]
    Table,
    Id,
    SubmissionId,
    MarkingState,
    ReleasedToStudents,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Marks {
    #[sea_orm(iden = "marks")]
    Table,
    Id,
    ResultId,
    CriterionId,
    Mark,
}

#[derive(DeriveIden)]
enum ExtraMarks {
    #[sea_orm(iden = "extra_marks")]
    Table,
    Id,
    ResultId,
    ExtraMark,
    Unit,
}

#[derive(DeriveIden)]
enum GracePeriodDeductions {
    #[sea_orm(iden = "grace_period_deductions")]
    Table,
    Id,
    MembershipId,
    SubmissionId,
    Deduction,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AssignmentStats {
    #[sea_orm(iden = "assignment_stats")]
    Table,
    AssignmentId,
    ResultsAverage,
    ResultsMedian,
    ResultsFails,
    ResultsZeros,
    UpdatedAt,
}
