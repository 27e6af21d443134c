#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, NewTrip, Participant, Trip};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A USD trip with Alice, Bob and Carol on the roster.
pub async fn trip_with_roster(engine: &Engine) -> Trip {
    let created_at = Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap();
    engine
        .create_trip(
            NewTrip::new("Lisbon weekend", "alice", created_at)
                .dates(date(2025, 6, 1), date(2025, 6, 4))
                .participant("Alice", "alice@example.com")
                .participant("Bob", "bob@example.com")
                .participant("Carol", "carol@example.com"),
        )
        .await
        .unwrap()
}

pub fn member<'a>(trip: &'a Trip, name: &str) -> &'a Participant {
    trip.participants.iter().find(|p| p.name == name).unwrap()
}
