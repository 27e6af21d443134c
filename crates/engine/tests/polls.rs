mod common;

use chrono::NaiveTime;

use common::{date, engine_with_db, member, trip_with_roster};
use engine::{ActivityCmd, EngineError};
use uuid::Uuid;

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[tokio::test]
async fn single_choice_poll_accepts_one_vote_per_participant() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;
    let (alice, bob) = (member(&trip, "Alice").id, member(&trip, "Bob").id);

    let poll = engine
        .create_poll(trip.id, "Where do we eat?", &["Tapas", " ", "Seafood"], false)
        .await
        .unwrap();
    assert!(poll.is_active);
    let contents: Vec<&str> = poll.options.iter().map(|o| o.content.as_str()).collect();
    assert_eq!(contents, vec!["Tapas", "Seafood"]);
    let (tapas, seafood) = (poll.options[0].id, poll.options[1].id);

    engine.cast_vote(seafood, alice).await.unwrap();
    engine.cast_vote(seafood, bob).await.unwrap();

    let err = engine.cast_vote(tapas, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    let poll = engine.poll(poll.id).await.unwrap();
    assert_eq!(poll.options[1].votes.len(), 2);
    assert_eq!(poll.leading_options()[0].content, "Seafood");
}

#[tokio::test]
async fn multiple_choice_poll_rejects_repeated_option() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;
    let carol = member(&trip, "Carol").id;

    let poll = engine
        .create_poll(trip.id, "Which museums?", &["Tiles", "Modern art", "Coaches"], true)
        .await
        .unwrap();
    engine.cast_vote(poll.options[0].id, carol).await.unwrap();
    engine.cast_vote(poll.options[2].id, carol).await.unwrap();

    let err = engine.cast_vote(poll.options[0].id, carol).await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn closed_poll_and_outsiders_cannot_vote() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;
    let alice = member(&trip, "Alice").id;

    let poll = engine
        .create_poll(trip.id, "Day trip to Sintra?", &["Yes", "No"], false)
        .await
        .unwrap();

    let err = engine
        .cast_vote(poll.options[0].id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("participant not exists".to_string())
    );

    let closed = engine.close_poll(poll.id).await.unwrap();
    assert!(!closed.is_active);
    let err = engine.cast_vote(poll.options[0].id, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn poll_needs_a_question_and_two_options() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;

    let err = engine
        .create_poll(trip.id, "Eat?", &["Yes", "No"], false)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_poll(trip.id, "Where do we eat?", &["Tapas", ""], false)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .create_poll(Uuid::new_v4(), "Where do we eat?", &["Tapas", "Pizza"], false)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("trip not exists".to_string()));
}

#[tokio::test]
async fn itinerary_orders_days_and_activities() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;

    let second = engine
        .add_itinerary_day(trip.id, date(2025, 6, 2), Some("Sintra"))
        .await
        .unwrap();
    let first = engine
        .add_itinerary_day(trip.id, date(2025, 6, 1), None)
        .await
        .unwrap();

    let err = engine
        .add_itinerary_day(trip.id, date(2025, 6, 1), Some("Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    engine
        .add_activity(first.id, ActivityCmd::new("Free evening"))
        .await
        .unwrap();
    engine
        .add_activity(
            first.id,
            ActivityCmd::new("Dinner in Alfama")
                .start_time(at(20, 0))
                .end_time(at(22, 30))
                .location("Alfama"),
        )
        .await
        .unwrap();
    engine
        .add_activity(
            first.id,
            ActivityCmd::new("Tram 28").start_time(at(10, 0)),
        )
        .await
        .unwrap();

    let days = engine.itinerary(trip.id).await.unwrap();
    assert_eq!(
        days.iter().map(|d| d.id).collect::<Vec<_>>(),
        vec![first.id, second.id]
    );
    let titles: Vec<&str> = days[0]
        .activities
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Tram 28", "Dinner in Alfama", "Free evening"]);
    assert!(days[1].activities.is_empty());
}

#[tokio::test]
async fn activity_validation() {
    let (engine, _db) = engine_with_db().await;
    let trip = trip_with_roster(&engine).await;
    let day = engine
        .add_itinerary_day(trip.id, date(2025, 6, 1), None)
        .await
        .unwrap();

    let err = engine
        .add_activity(
            day.id,
            ActivityCmd::new("Sunset")
                .start_time(at(21, 0))
                .end_time(at(20, 0)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .add_activity(day.id, ActivityCmd::new("Go"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .add_activity(Uuid::new_v4(), ActivityCmd::new("Sunset"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("itinerary day not exists".to_string())
    );
}
