use chrono::NaiveDate;
use flag_practice::card_store::{CardStore, InMemoryCardStore};
use flag_practice::catalog::Catalog;
use flag_practice::config::QuizConfig;
use flag_practice::database::Database;
use flag_practice::date_provider::OverrideDateProvider;
use flag_practice::error::QuizError;
use flag_practice::session::{AnswerLog, SessionController, SessionPhase};
use flag_practice::session_queue::QuizMode;
use flag_practice::session_record::SessionStatus;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Arc;

const SMALL_CATALOG: &str = r#"[
    {"code": "fr", "name": "France", "category": "Europe", "colors": ["blue", "white", "red"], "layout": "vertical"},
    {"code": "it", "name": "Italy", "category": "Europe", "colors": ["green", "white", "red"], "layout": "vertical"},
    {"code": "jp", "name": "Japan", "category": "Asia", "colors": ["white", "red"], "layout": "disc"},
    {"code": "ng", "name": "Nigeria", "category": "Africa", "colors": ["green", "white"], "layout": "vertical"},
    {"code": "ne", "name": "Niger", "category": "Africa", "colors": ["orange", "white", "green"], "layout": "horizontal"}
]"#;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn start(
    catalog: &Arc<Catalog>,
    store: Arc<dyn CardStore>,
    on: NaiveDate,
    mode: QuizMode,
    seed: u64,
) -> SessionController<StdRng> {
    SessionController::start_with_rng(
        catalog.clone(),
        store,
        Arc::new(OverrideDateProvider::new(on)),
        QuizConfig::default(),
        mode,
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

/// Answers everything correctly except the items in `miss`
fn play(session: &mut SessionController<StdRng>, miss: &[&str]) -> Vec<String> {
    let mut asked = Vec::new();
    while let Some(question) = session.advance().unwrap() {
        let code = question.item.code.clone();
        let answer = if miss.contains(&code.as_str()) {
            "no idea".to_string()
        } else {
            question.item.name.clone()
        };
        session.submit_answer(&answer, Some(2.0)).unwrap();
        asked.push(code);
    }
    asked
}

#[test]
fn test_missed_item_retry_ticks_in_a_live_session() {
    let catalog = Arc::new(Catalog::load(Path::new("data/flags.json")).unwrap());
    let mut session = start(&catalog, Arc::new(InMemoryCardStore::new()), day(1), QuizMode::Endless, 11);

    let mut target: Option<String> = None;
    let mut retry_ticks = Vec::new();

    for _ in 0..40 {
        let question = session.advance().unwrap().unwrap().clone();
        let is_target = target.as_deref() == Some(question.item.code.as_str());
        if question.is_retry {
            assert!(is_target);
            retry_ticks.push(question.tick);
        }

        let miss = question.tick == 10 || (question.is_retry && question.tick == 12);
        if question.tick == 10 {
            target = Some(question.item.code.clone());
        }
        let answer = if miss { "wrong answer" } else { question.item.name.as_str() };
        let outcome = session.submit_answer(answer, Some(1.5)).unwrap();
        assert_eq!(outcome.was_correct, !miss);
    }

    assert_eq!(retry_ticks, vec![12, 17, 26]);
    assert!(session.retry_queue().is_empty());
}

#[test]
fn test_second_day_reviews_yesterdays_items() {
    let catalog = Arc::new(Catalog::from_json_str(SMALL_CATALOG).unwrap());
    let store = Arc::new(InMemoryCardStore::new());

    let mut first = start(&catalog, store.clone(), day(1), QuizMode::Practice, 1);
    let asked = play(&mut first, &["jp"]);
    first.end_session();
    assert_eq!(asked.iter().filter(|c| c.as_str() != "jp").count(), 4);

    // One first miss plus three missed retries; zero repetitions makes it new again
    let cards = store.snapshot();
    assert_eq!(cards["jp"].lapses, 4);
    assert_eq!(cards["jp"].repetitions, 0);
    assert_eq!(cards["fr"].next_review_date, Some(day(2)));

    let mut second = start(&catalog, store.clone(), day(2), QuizMode::Practice, 2);
    let asked = play(&mut second, &[]);
    let mut sorted = asked.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["fr", "it", "jp", "ne", "ng"]);
    // Due reviews come before new material
    assert_eq!(asked.last().map(String::as_str), Some("jp"));
    assert_eq!(store.snapshot()["fr"].interval, 6);
}

#[test]
fn test_nothing_due_the_same_day() {
    let catalog = Arc::new(Catalog::from_json_str(SMALL_CATALOG).unwrap());
    let store = Arc::new(InMemoryCardStore::new());

    let mut first = start(&catalog, store.clone(), day(5), QuizMode::Practice, 1);
    play(&mut first, &[]);
    first.end_session();

    let mut again = start(&catalog, store, day(5), QuizMode::Practice, 2);
    assert!(again.advance().unwrap().is_none());
    assert_eq!(again.phase(), SessionPhase::Complete);
}

#[test]
fn test_category_session_only_asks_that_category() {
    let catalog = Arc::new(Catalog::load(Path::new("data/flags.json")).unwrap());
    let mut session = start(
        &catalog,
        Arc::new(InMemoryCardStore::new()),
        day(1),
        QuizMode::Category("Africa".into()),
        4,
    );

    let asked = play(&mut session, &[]);

    assert!(!asked.is_empty());
    assert!(asked.len() <= QuizConfig::default().new_per_category_session);
    assert!(asked.iter().all(|code| catalog.get(code).unwrap().category == "Africa"));
}

#[test]
fn test_similar_names_are_not_confused() {
    let catalog = Arc::new(Catalog::from_json_str(SMALL_CATALOG).unwrap());
    let mut session = start(
        &catalog,
        Arc::new(InMemoryCardStore::new()),
        day(1),
        QuizMode::Category("Africa".into()),
        8,
    );

    let mut answered = 0;
    while let Some(question) = session.advance().unwrap() {
        let (code, wrong_twin) = match question.item.code.as_str() {
            "ng" => ("ng", "Niger"),
            _ => ("ne", "Nigeria"),
        };
        let outcome = session.submit_answer(wrong_twin, None).unwrap();
        assert_eq!(outcome.item_code, code);
        assert!(!outcome.was_correct);
        answered += 1;
    }

    // Each twin: one first attempt and three retries
    assert_eq!(answered, 8);
}

#[test]
fn test_empty_catalog_is_rejected() {
    assert!(matches!(
        Catalog::from_json_str("[]"),
        Err(QuizError::NoItemsAvailable(_))
    ));
}

#[test]
fn test_database_backed_session_logs_everything() {
    let catalog = Arc::new(Catalog::from_json_str(SMALL_CATALOG).unwrap());
    let db = Arc::new(
        Database::with_date_provider(":memory:", Arc::new(OverrideDateProvider::new(day(3)))).unwrap(),
    );

    let session_id = db.create_session("hard").unwrap();
    let mut session = start(&catalog, db.clone(), day(3), QuizMode::Hard, 5);
    session.add_listener(Box::new(AnswerLog::new(db.clone(), Some(session_id))));

    let asked = play(&mut session, &["it"]);
    let summary = session.end_session();
    db.update_session_summary(session_id, &summary).unwrap();
    db.complete_session(session_id).unwrap();

    // Five first attempts plus three retries of the miss
    assert_eq!(asked.len(), 8);
    assert_eq!(db.count_answers().unwrap(), 8);
    assert_eq!(db.count_review_cards().unwrap(), 5);

    let record = db.get_session(session_id).unwrap().unwrap();
    assert_eq!(record.status, SessionStatus::Completed);
    assert_eq!(record.total_questions, 8);
    assert_eq!(record.correct_answers, 4);

    let accuracy = db.accuracy_per_category().unwrap();
    assert_eq!(accuracy["Europe"].0, 1);
    assert_eq!(accuracy["Europe"].1, 5);
    assert_eq!(accuracy["Asia"], (1, 1, 100.0));

    let reloaded = db.load_cards();
    assert_eq!(reloaded["it"].lapses, 1);
    assert_eq!(reloaded["fr"].repetitions, 1);
}
