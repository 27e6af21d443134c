use std::error::Error;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::{
    ActivityCmd, Currency, DateRange, Engine, ExpenseCmd, MoneyCents, NewTrip, SurveyResponse,
    TripStatus, TripUpdate,
};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use uuid::Uuid;

mod settings;

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "packvote")]
#[command(about = "Plan group trips: roster, surveys, shared expenses, proposals and polls")]
struct Cli {
    /// Settings file name, without the `.toml` extension.
    #[arg(long, default_value = "settings")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, show and update trips.
    #[command(subcommand)]
    Trip(TripCommand),
    /// Manage the trip roster.
    #[command(subcommand)]
    Participant(ParticipantCommand),
    /// Submit preference surveys.
    #[command(subcommand)]
    Survey(SurveyCommand),
    /// Shared expenses and balances.
    #[command(subcommand)]
    Expense(ExpenseCommand),
    /// Rank itinerary proposals against the group's surveys.
    Proposals { trip_id: Uuid },
    /// Group polls.
    #[command(subcommand)]
    Poll(PollCommand),
    /// Day-by-day itinerary.
    #[command(subcommand)]
    Itinerary(ItineraryCommand),
}

#[derive(Subcommand, Debug)]
enum TripCommand {
    Create(TripCreateArgs),
    Show { trip_id: Uuid },
    Update(TripUpdateArgs),
}

#[derive(Args, Debug)]
struct TripCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    created_by: String,
    #[arg(long, default_value = "USD", value_parser = parse_currency)]
    currency: Currency,
    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,
    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,
    /// Initial participant as `name=email`; repeatable.
    #[arg(long = "participant", value_parser = parse_participant)]
    participants: Vec<(String, String)>,
}

#[derive(Args, Debug)]
struct TripUpdateArgs {
    trip_id: Uuid,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<TripStatus>,
    #[arg(long)]
    destination: Option<String>,
    #[arg(long)]
    start: Option<NaiveDate>,
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
enum ParticipantCommand {
    Add {
        trip_id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum SurveyCommand {
    Submit(SurveySubmitArgs),
}

#[derive(Args, Debug)]
struct SurveySubmitArgs {
    participant_id: Uuid,
    /// Budget in major units, e.g. `1200` or `1200.50`.
    #[arg(long)]
    budget: Option<MoneyCents>,
    #[arg(long)]
    vibe: Option<String>,
    #[arg(long)]
    dealbreakers: Option<String>,
    /// Availability as `YYYY-MM-DD..YYYY-MM-DD`; repeatable.
    #[arg(long = "available", value_parser = parse_date_range)]
    available_dates: Vec<DateRange>,
}

#[derive(Subcommand, Debug)]
enum ExpenseCommand {
    Add(ExpenseAddArgs),
    List { trip_id: Uuid },
    Balances { trip_id: Uuid },
    Settle { trip_id: Uuid, split_id: Uuid },
    Delete { trip_id: Uuid, expense_id: Uuid },
}

#[derive(Args, Debug)]
struct ExpenseAddArgs {
    trip_id: Uuid,
    #[arg(long)]
    description: String,
    #[arg(long)]
    amount: MoneyCents,
    #[arg(long)]
    paid_by: Uuid,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long, default_value = "USD", value_parser = parse_currency)]
    currency: Currency,
    #[arg(long)]
    activity: Option<Uuid>,
    /// Share owed as `participant_id=amount`; repeatable.
    #[arg(long = "split", required = true, value_parser = parse_split)]
    splits: Vec<(Uuid, MoneyCents)>,
}

#[derive(Subcommand, Debug)]
enum PollCommand {
    Create {
        trip_id: Uuid,
        #[arg(long)]
        question: String,
        /// Repeatable; at least two.
        #[arg(long = "option", required = true)]
        options: Vec<String>,
        #[arg(long)]
        multiple: bool,
    },
    Vote { option_id: Uuid, participant_id: Uuid },
    Close { poll_id: Uuid },
    Show { poll_id: Uuid },
}

#[derive(Subcommand, Debug)]
enum ItineraryCommand {
    Day {
        trip_id: Uuid,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        title: Option<String>,
    },
    Activity(ActivityArgs),
    Show { trip_id: Uuid },
}

#[derive(Args, Debug)]
struct ActivityArgs {
    day_id: Uuid,
    #[arg(long)]
    title: String,
    #[arg(long)]
    notes: Option<String>,
    #[arg(long)]
    start: Option<NaiveTime>,
    #[arg(long)]
    end: Option<NaiveTime>,
    #[arg(long)]
    location: Option<String>,
}

fn parse_currency(raw: &str) -> Result<Currency, String> {
    Currency::try_from(raw).map_err(|err| err.to_string())
}

fn parse_status(raw: &str) -> Result<TripStatus, String> {
    TripStatus::try_from(raw).map_err(|err| err.to_string())
}

fn parse_participant(raw: &str) -> Result<(String, String), String> {
    let (name, email) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected name=email, got {raw}"))?;
    Ok((name.to_string(), email.to_string()))
}

fn parse_split(raw: &str) -> Result<(Uuid, MoneyCents), String> {
    let (participant, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected participant_id=amount, got {raw}"))?;
    let participant = Uuid::parse_str(participant.trim()).map_err(|err| err.to_string())?;
    let amount = amount
        .trim()
        .parse::<MoneyCents>()
        .map_err(|err| err.to_string())?;
    Ok((participant, amount))
}

fn parse_date_range(raw: &str) -> Result<DateRange, String> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected start..end, got {raw}"))?;
    let start = start.trim().parse().map_err(|err: chrono::ParseError| err.to_string())?;
    let end = end.trim().parse().map_err(|err: chrono::ParseError| err.to_string())?;
    Ok(DateRange { start, end })
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect_db(config: &settings::Database) -> CliResult<sea_orm::DatabaseConnection> {
    let database = sea_orm::Database::connect(config.url()).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

async fn run(engine: &Engine, command: Command) -> CliResult<()> {
    match command {
        Command::Trip(TripCommand::Create(args)) => {
            let mut cmd = NewTrip::new(args.name, args.created_by, Utc::now()).currency(args.currency);
            if let (Some(start), Some(end)) = (args.start, args.end) {
                cmd = cmd.dates(start, end);
            }
            for (name, email) in args.participants {
                cmd = cmd.participant(name, email);
            }
            print_json(&engine.create_trip(cmd).await?)
        }
        Command::Trip(TripCommand::Show { trip_id }) => print_json(&engine.trip(trip_id).await?),
        Command::Trip(TripCommand::Update(args)) => {
            let update = TripUpdate {
                name: args.name,
                status: args.status,
                final_destination: args.destination,
                start_date: args.start,
                end_date: args.end,
            };
            print_json(&engine.update_trip(args.trip_id, update).await?)
        }
        Command::Participant(ParticipantCommand::Add {
            trip_id,
            name,
            email,
        }) => print_json(&engine.add_participant(trip_id, &name, &email).await?),
        Command::Survey(SurveyCommand::Submit(args)) => {
            let response = SurveyResponse {
                participant_id: args.participant_id,
                budget: args.budget,
                vibe: args.vibe,
                dealbreakers: args.dealbreakers,
                available_dates: args.available_dates,
            };
            print_json(&engine.submit_survey(args.participant_id, response).await?)
        }
        Command::Expense(ExpenseCommand::Add(args)) => {
            let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
            let mut cmd = ExpenseCmd::new(
                args.trip_id,
                args.description,
                args.amount,
                date,
                args.paid_by,
            )
            .currency(args.currency)
            .splits(args.splits);
            if let Some(activity_id) = args.activity {
                cmd = cmd.activity_id(activity_id);
            }
            print_json(&engine.create_expense(cmd).await?)
        }
        Command::Expense(ExpenseCommand::List { trip_id }) => {
            print_json(&engine.trip_ledger(trip_id).await?)
        }
        Command::Expense(ExpenseCommand::Balances { trip_id }) => {
            print_json(&engine.trip_balances(trip_id).await?)
        }
        Command::Expense(ExpenseCommand::Settle { trip_id, split_id }) => {
            print_json(&engine.settle_split(trip_id, split_id).await?)
        }
        Command::Expense(ExpenseCommand::Delete {
            trip_id,
            expense_id,
        }) => {
            engine.delete_expense(trip_id, expense_id).await?;
            println!("deleted expense: {expense_id}");
            Ok(())
        }
        Command::Proposals { trip_id } => print_json(&engine.consensus_proposals(trip_id).await?),
        Command::Poll(PollCommand::Create {
            trip_id,
            question,
            options,
            multiple,
        }) => print_json(
            &engine
                .create_poll(trip_id, &question, &options, multiple)
                .await?,
        ),
        Command::Poll(PollCommand::Vote {
            option_id,
            participant_id,
        }) => print_json(&engine.cast_vote(option_id, participant_id).await?),
        Command::Poll(PollCommand::Close { poll_id }) => {
            print_json(&engine.close_poll(poll_id).await?)
        }
        Command::Poll(PollCommand::Show { poll_id }) => print_json(&engine.poll(poll_id).await?),
        Command::Itinerary(ItineraryCommand::Day {
            trip_id,
            date,
            title,
        }) => print_json(
            &engine
                .add_itinerary_day(trip_id, date, title.as_deref())
                .await?,
        ),
        Command::Itinerary(ItineraryCommand::Activity(args)) => {
            let mut cmd = ActivityCmd::new(args.title);
            cmd.notes = args.notes;
            cmd.start_time = args.start;
            cmd.end_time = args.end;
            cmd.location = args.location;
            print_json(&engine.add_activity(args.day_id, cmd).await?)
        }
        Command::Itinerary(ItineraryCommand::Show { trip_id }) => {
            print_json(&engine.itinerary(trip_id).await?)
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "packvote={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&settings.database).await?;
    let engine = Engine::builder().database(db).build().await?;
    tracing::debug!("engine ready on {:?}", settings.database);

    run(&engine, cli.command).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_split_argument() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_split(&format!("{id}=12.50")).unwrap(),
            (id, MoneyCents::new(1250))
        );
        assert!(parse_split("12.50").is_err());
        assert!(parse_split("not-a-uuid=1").is_err());
    }

    #[test]
    fn parses_participant_and_range() {
        assert_eq!(
            parse_participant("Ada Lovelace=ada@example.com").unwrap(),
            ("Ada Lovelace".to_string(), "ada@example.com".to_string())
        );
        let range = parse_date_range("2025-06-01..2025-06-10").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        assert!(parse_date_range("2025-06-01").is_err());
    }

    #[test]
    fn parses_expense_command() {
        let payer = Uuid::new_v4();
        let trip = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "packvote".to_string(),
            "expense".to_string(),
            "add".to_string(),
            trip.to_string(),
            "--description".to_string(),
            "Groceries".to_string(),
            "--amount".to_string(),
            "30".to_string(),
            "--paid-by".to_string(),
            payer.to_string(),
            "--split".to_string(),
            format!("{payer}=30"),
            "--currency".to_string(),
            "eur".to_string(),
        ])
        .unwrap();
        let Command::Expense(ExpenseCommand::Add(args)) = cli.command else {
            panic!("expected expense add");
        };
        assert_eq!(args.trip_id, trip);
        assert_eq!(args.amount, MoneyCents::new(3000));
        assert_eq!(args.currency, Currency::Eur);
        assert_eq!(args.splits, vec![(payer, MoneyCents::new(3000))]);
    }
}
