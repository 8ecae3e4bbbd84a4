use chrono::NaiveDate;
use lucky_draw::{
    clear_store, export, load_session, open_store_at, save_session, DrawError, Session,
    DEFAULT_EVENT_TITLE,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

/// End-to-end test of a complete raffle session: seed the pool, draw twice,
/// persist and reload, export, reset, and clear.
#[test]
fn test_full_raffle_flow() {
    let dir = tempdir().unwrap();
    let mut conn = open_store_at(&dir.path().join("session.sqlite")).unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    // 1. A fresh store loads an empty default session.
    let mut session = load_session(&conn).unwrap();
    assert_eq!(session.event_title(), DEFAULT_EVENT_TITLE);
    assert!(session.registry().is_empty());

    // 2. Seed the pool through all three add paths. The duplicate and blank
    //    bulk lines are dropped silently.
    session.set_event_title("Demo".to_string());
    assert_eq!(session.add_bulk("Alice\nBob\nAlice\n\n  Carol  "), 3);
    assert_eq!(session.add_single("Dave"), 1);
    assert_eq!(session.add_generated("Guest", 2), 2);
    assert_eq!(session.registry().len(), 6);

    // 3. First draw takes two winners; a second request while it is pending
    //    is rejected without side effects.
    session.begin_draw(2).unwrap();
    assert!(session.is_drawing());
    assert_eq!(session.begin_draw(1), Err(DrawError::DrawInProgress));
    let first = session.resolve_draw(&mut rng).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(session.registry().len(), 4);
    assert_eq!(session.ledger().len(), 2);

    // 4. An oversized request drains the rest of the pool, and the newest
    //    batch lands at the front of the ledger.
    session.begin_draw(100).unwrap();
    let second = session.resolve_draw(&mut rng).unwrap();
    assert_eq!(second.len(), 4);
    assert!(session.registry().is_empty());
    assert_eq!(session.ledger().len(), 6);
    assert_eq!(session.ledger()[..4], second[..]);

    // 5. The snapshot round-trips exactly, ids included.
    save_session(&mut conn, &session).unwrap();
    let reloaded = load_session(&conn).unwrap();
    assert_eq!(reloaded.event_title(), "Demo");
    assert_eq!(reloaded.registry(), session.registry());
    assert_eq!(reloaded.ledger(), session.ledger());

    // 6. The export ranks winners from newest (highest) to oldest.
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let path =
        export::export_winners(session.ledger(), session.event_title(), dir.path(), date).unwrap();
    assert_eq!(path, dir.path().join("demo_winners_2024-06-01.csv"));
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with('\u{feff}'));
    let mut lines = csv.trim_start_matches('\u{feff}').split("\r\n");
    assert_eq!(lines.next(), Some("名次,姓名"));
    let first_row = lines.next().unwrap();
    assert_eq!(first_row, format!("6,{}", session.ledger()[0].name));

    // 7. Reset returns everyone to the pool, sorted, with nothing lost.
    session.reset();
    assert!(session.ledger().is_empty());
    assert_eq!(session.registry().len(), 6);
    let lowered: Vec<String> = session
        .registry()
        .iter()
        .map(|p| p.name.to_lowercase())
        .collect();
    let mut sorted = lowered.clone();
    sorted.sort();
    assert_eq!(lowered, sorted);

    // 8. Clear wipes the session and the store.
    session.clear();
    clear_store(&conn).unwrap();
    let after_clear = load_session(&conn).unwrap();
    assert_eq!(after_clear.event_title(), DEFAULT_EVENT_TITLE);
    assert!(after_clear.registry().is_empty());
    assert!(after_clear.ledger().is_empty());
}

/// Ids allocated after a reload never collide with persisted ones.
#[test]
fn test_ids_stay_unique_across_reload() {
    let dir = tempdir().unwrap();
    let mut conn = open_store_at(&dir.path().join("session.sqlite")).unwrap();

    let mut session = Session::default();
    session.add_bulk("Alice\nBob");
    save_session(&mut conn, &session).unwrap();

    let mut reloaded = load_session(&conn).unwrap();
    reloaded.add_single("Carol");

    let mut ids: Vec<i64> = reloaded.registry().iter().map(|p| p.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), reloaded.registry().len());
}
