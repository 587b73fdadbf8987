use dayplan_core::db::open_db_in_memory;
use dayplan_core::{
    build_default, DayStore, DayUpdates, MealField, PlannerSession, ReviewField, SessionError,
    SqliteKvRepository,
};

#[test]
fn every_accepted_edit_is_persisted_immediately() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::new(&conn);
    let mut session = PlannerSession::open(DayStore::new(&repo), "2025-07-01").unwrap();

    session.set_schedule_task(8, "standup").unwrap();
    session.set_priority_text("1", "finish report").unwrap();
    session.toggle_priority("1").unwrap();
    session.set_todo_text("todo-3", "buy milk").unwrap();
    session.set_meal(MealField::Lunch, "noodles");
    session.set_review_text(ReviewField::Improve, "sleep earlier");
    session.set_notes("quiet day");
    session.set_tomorrow("call plumber");

    let reloaded = DayStore::new(&repo).load("2025-07-01");
    assert_eq!(&reloaded, session.record());
    assert_eq!(reloaded.schedule[8].time, "09:00");
    assert_eq!(reloaded.schedule[8].task, "standup");
    assert!(reloaded.top_priorities[0].completed);
    assert_eq!(reloaded.todos[3].text, "buy milk");
    assert_eq!(reloaded.meals.lunch, "noodles");
    assert_eq!(reloaded.review.improve, "sleep earlier");
}

#[test]
fn rejected_edits_do_not_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::new(&conn);
    let mut session = PlannerSession::open(DayStore::new(&repo), "2025-07-02").unwrap();

    let slot_err = session.set_schedule_task(37, "late").unwrap_err();
    assert_eq!(slot_err, SessionError::SlotOutOfRange { index: 37, len: 37 });
    assert!(matches!(
        session.toggle_todo("todo-99"),
        Err(SessionError::ItemNotFound { section: "todo", .. })
    ));
    assert_eq!(session.add_habit("   "), Err(SessionError::EmptyHabitName));
    assert!(session.remove_habit("missing").is_err());

    assert!(session.stored_dates().is_empty());
    assert_eq!(session.record(), &build_default("2025-07-02"));
}

#[test]
fn habits_can_be_added_toggled_and_removed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::new(&conn);
    let mut session = PlannerSession::open(DayStore::new(&repo), "2025-07-03").unwrap();

    let id = session.add_habit("  Stretch ").unwrap();
    session.toggle_habit(&id).unwrap();
    session.remove_habit("h1").unwrap();

    let reloaded = DayStore::new(&repo).load("2025-07-03");
    let habits = &reloaded.habits;
    assert_eq!(habits.len(), 5);
    assert!(habits.iter().all(|habit| habit.id != "h1"));
    let added = habits.iter().find(|habit| habit.id == id).unwrap();
    assert_eq!(added.name, "Stretch");
    assert!(added.completed);
}

#[test]
fn water_taps_toggle_and_stay_in_range() {
    let conn = open_db_in_memory().unwrap();
    let mut session =
        PlannerSession::open(DayStore::new(SqliteKvRepository::new(&conn)), "2025-07-04").unwrap();

    assert_eq!(session.tap_water(5), 5);
    assert_eq!(session.tap_water(5), 4);
    assert_eq!(session.tap_water(8), 8);
    assert_eq!(session.tap_water(8), 7);
    assert_eq!(session.tap_water(200), 8);
    assert_eq!(session.tap_water(1), 1);
    assert_eq!(session.tap_water(1), 0);
}

#[test]
fn rate_is_clamped() {
    let conn = open_db_in_memory().unwrap();
    let mut session =
        PlannerSession::open(DayStore::new(SqliteKvRepository::new(&conn)), "2025-07-05").unwrap();

    assert_eq!(session.set_rate(7), 7);
    assert_eq!(session.set_rate(15), 10);
    assert_eq!(session.set_rate(-2), 0);
}

#[test]
fn switching_dates_loads_each_day_separately() {
    let conn = open_db_in_memory().unwrap();
    let mut session =
        PlannerSession::open(DayStore::new(SqliteKvRepository::new(&conn)), "2025-07-06").unwrap();
    session.set_notes("sunday");

    session.switch_date("2025-07-07").unwrap();
    assert_eq!(session.date(), "2025-07-07");
    assert!(session.record().notes.is_empty());
    session.set_notes("monday");

    session.switch_date("2025-07-06").unwrap();
    assert_eq!(session.record().notes, "sunday");
    assert_eq!(
        session.stored_dates(),
        vec!["2025-07-06".to_string(), "2025-07-07".to_string()]
    );
    assert!(matches!(
        session.switch_date("07/06/2025"),
        Err(SessionError::InvalidDate(_))
    ));
}

#[test]
fn applied_updates_are_merged_and_saved() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKvRepository::new(&conn);
    let mut session = PlannerSession::open(DayStore::new(&repo), "2025-07-08").unwrap();
    session.set_notes("keep me");

    let mut todos = session.record().todos.clone();
    todos[0].text = "drafted".to_string();
    session.apply_updates(DayUpdates {
        todos: Some(todos),
        ..DayUpdates::default()
    });

    let reloaded = DayStore::new(&repo).load("2025-07-08");
    assert_eq!(reloaded.todos[0].text, "drafted");
    assert_eq!(reloaded.notes, "keep me");
}

#[test]
fn open_rejects_malformed_date() {
    let conn = open_db_in_memory().unwrap();
    let result = PlannerSession::open(DayStore::new(SqliteKvRepository::new(&conn)), "2025-7-8");
    assert!(matches!(result, Err(SessionError::InvalidDate(_))));
}
