//! Initial schema migration.
//!
//! Creates the complete PackVote schema:
//!
//! - `trips`: the planning container, with its currency
//! - `participants`: trip roster, one row per `(trip_id, email)`
//! - `survey_responses`: one preference survey per participant
//! - `itinerary_days`: one row per `(trip_id, date)`
//! - `activities`: scheduled items of a day
//! - `expenses`: money fronted by a participant
//! - `expense_splits`: what each participant owes for an expense
//! - `polls`, `poll_options`, `votes`: group decisions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    Name,
    CreatedBy,
    Status,
    StartDate,
    EndDate,
    FinalDestination,
    Currency,
    CreatedAt,
}

#[derive(Iden)]
enum Participants {
    Table,
    Id,
    TripId,
    Name,
    Email,
}

#[derive(Iden)]
enum SurveyResponses {
    Table,
    ParticipantId,
    BudgetMinor,
    Vibe,
    Dealbreakers,
    AvailableDates,
}

#[derive(Iden)]
enum ItineraryDays {
    Table,
    Id,
    TripId,
    Date,
    Title,
}

#[derive(Iden)]
enum Activities {
    Table,
    Id,
    DayId,
    Title,
    Notes,
    StartTime,
    EndTime,
    Location,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    TripId,
    Description,
    AmountMinor,
    Currency,
    Date,
    PaidById,
    ActivityId,
}

#[derive(Iden)]
enum ExpenseSplits {
    Table,
    Id,
    ExpenseId,
    ParticipantId,
    OwedAmountMinor,
    IsSettled,
}

#[derive(Iden)]
enum Polls {
    Table,
    Id,
    TripId,
    Question,
    IsActive,
    AllowMultipleVotes,
}

#[derive(Iden)]
enum PollOptions {
    Table,
    Id,
    PollId,
    Content,
    Position,
    Recommendation,
}

#[derive(Iden)]
enum Votes {
    Table,
    Id,
    OptionId,
    ParticipantId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::Name).string().not_null())
                    .col(ColumnDef::new(Trips::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Trips::Status)
                            .string()
                            .not_null()
                            .default("planning"),
                    )
                    .col(ColumnDef::new(Trips::StartDate).date())
                    .col(ColumnDef::new(Trips::EndDate).date())
                    .col(ColumnDef::new(Trips::FinalDestination).string())
                    .col(
                        ColumnDef::new(Trips::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Participants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Participants::TripId).string().not_null())
                    .col(ColumnDef::new(Participants::Name).string().not_null())
                    .col(ColumnDef::new(Participants::Email).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-participants-trip_id")
                            .from(Participants::Table, Participants::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-participants-trip_id-email-unique")
                    .table(Participants::Table)
                    .col(Participants::TripId)
                    .col(Participants::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Survey responses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SurveyResponses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyResponses::ParticipantId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SurveyResponses::BudgetMinor).big_integer())
                    .col(ColumnDef::new(SurveyResponses::Vibe).text())
                    .col(ColumnDef::new(SurveyResponses::Dealbreakers).text())
                    .col(ColumnDef::new(SurveyResponses::AvailableDates).json())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-survey_responses-participant_id")
                            .from(SurveyResponses::Table, SurveyResponses::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Itinerary
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ItineraryDays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ItineraryDays::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ItineraryDays::TripId).string().not_null())
                    .col(ColumnDef::new(ItineraryDays::Date).date().not_null())
                    .col(ColumnDef::new(ItineraryDays::Title).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-itinerary_days-trip_id")
                            .from(ItineraryDays::Table, ItineraryDays::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-itinerary_days-trip_id-date-unique")
                    .table(ItineraryDays::Table)
                    .col(ItineraryDays::TripId)
                    .col(ItineraryDays::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::DayId).string().not_null())
                    .col(ColumnDef::new(Activities::Title).string().not_null())
                    .col(ColumnDef::new(Activities::Notes).text())
                    .col(ColumnDef::new(Activities::StartTime).time())
                    .col(ColumnDef::new(Activities::EndTime).time())
                    .col(ColumnDef::new(Activities::Location).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-activities-day_id")
                            .from(Activities::Table, Activities::DayId)
                            .to(ItineraryDays::Table, ItineraryDays::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Expenses
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::TripId).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(
                        ColumnDef::new(Expenses::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(Expenses::Date).date().not_null())
                    .col(ColumnDef::new(Expenses::PaidById).string().not_null())
                    .col(ColumnDef::new(Expenses::ActivityId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-trip_id")
                            .from(Expenses::Table, Expenses::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-paid_by_id")
                            .from(Expenses::Table, Expenses::PaidById)
                            .to(Participants::Table, Participants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-activity_id")
                            .from(Expenses::Table, Expenses::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-trip_id-date")
                    .table(Expenses::Table)
                    .col(Expenses::TripId)
                    .col(Expenses::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExpenseSplits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExpenseSplits::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ExpenseSplits::ExpenseId).string().not_null())
                    .col(
                        ColumnDef::new(ExpenseSplits::ParticipantId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseSplits::OwedAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExpenseSplits::IsSettled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_splits-expense_id")
                            .from(ExpenseSplits::Table, ExpenseSplits::ExpenseId)
                            .to(Expenses::Table, Expenses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expense_splits-participant_id")
                            .from(ExpenseSplits::Table, ExpenseSplits::ParticipantId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expense_splits-expense_id-participant_id-unique")
                    .table(ExpenseSplits::Table)
                    .col(ExpenseSplits::ExpenseId)
                    .col(ExpenseSplits::ParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Polls
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Polls::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Polls::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Polls::TripId).string().not_null())
                    .col(ColumnDef::new(Polls::Question).string().not_null())
                    .col(
                        ColumnDef::new(Polls::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Polls::AllowMultipleVotes)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-polls-trip_id")
                            .from(Polls::Table, Polls::TripId)
                            .to(Trips::Table, Trips::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PollOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PollOptions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PollOptions::PollId).string().not_null())
                    .col(ColumnDef::new(PollOptions::Content).string().not_null())
                    .col(ColumnDef::new(PollOptions::Position).integer().not_null())
                    .col(ColumnDef::new(PollOptions::Recommendation).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-poll_options-poll_id")
                            .from(PollOptions::Table, PollOptions::PollId)
                            .to(Polls::Table, Polls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Votes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Votes::OptionId).string().not_null())
                    .col(ColumnDef::new(Votes::ParticipantId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-votes-option_id")
                            .from(Votes::Table, Votes::OptionId)
                            .to(PollOptions::Table, PollOptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-votes-participant_id")
                            .from(Votes::Table, Votes::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-votes-option_id-participant_id-unique")
                    .table(Votes::Table)
                    .col(Votes::OptionId)
                    .col(Votes::ParticipantId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PollOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Polls::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExpenseSplits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ItineraryDays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SurveyResponses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        Ok(())
    }
}
