//! Snapshot load/save for the whole session. The store holds exactly three
//! string values keyed `eventTitle`, `participants`, and `winners`; every
//! save fully overwrites all three inside one transaction, and a load
//! tolerates any of them being absent or unparseable by falling back to that
//! value's default.

use anyhow::{Context, Result};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::Participant;
use crate::session::{Session, DEFAULT_EVENT_TITLE};

const TITLE_KEY: &str = "eventTitle";
const PARTICIPANTS_KEY: &str = "participants";
const WINNERS_KEY: &str = "winners";

/// Load the persisted session, substituting defaults for any value that is
/// missing or fails to parse. Only an unreadable store itself is an error;
/// bad data never prevents startup.
pub fn load_session(conn: &Connection) -> Result<Session> {
    let title = load_value::<String>(conn, TITLE_KEY)?
        .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string());
    let registry = load_value::<Vec<Participant>>(conn, PARTICIPANTS_KEY)?.unwrap_or_default();
    let ledger = load_value::<Vec<Participant>>(conn, WINNERS_KEY)?.unwrap_or_default();

    Ok(Session::from_parts(title, registry, ledger))
}

/// Write the full session snapshot, replacing the previous values of all
/// three keys. Grouping the writes in one transaction keeps a crash from
/// leaving the keys inconsistent with each other.
pub fn save_session(conn: &mut Connection, session: &Session) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to start snapshot transaction")?;

    store_value(&tx, TITLE_KEY, session.event_title())?;
    store_value(&tx, PARTICIPANTS_KEY, session.registry())?;
    store_value(&tx, WINNERS_KEY, session.ledger())?;

    tx.commit().context("failed to commit session snapshot")
}

/// Erase every persisted value. Used by the clear-all flow; the next save
/// recreates the rows.
pub fn clear_store(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM session_state", [])
        .context("failed to erase persisted session")?;
    Ok(())
}

/// Fetch and decode one snapshot value. A missing row and a row that no
/// longer parses both come back as `None`; the latter is logged since it
/// means stored data is being discarded.
fn load_value<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM session_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("failed to read stored value for {key}"))?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!("falling back to default for stored key {key}: {err}");
            Ok(None)
        }
    }
}

/// Encode and upsert one snapshot value.
fn store_value<T: Serialize + ?Sized>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    let encoded =
        serde_json::to_string(value).with_context(|| format!("failed to encode value for {key}"))?;

    conn.execute(
        "INSERT OR REPLACE INTO session_state (key, value) VALUES (?1, ?2)",
        params![key, encoded],
    )
    .with_context(|| format!("failed to store value for {key}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_store_at;
    use rand::SeedableRng;
    use tempfile::tempdir;

    fn test_store() -> (tempfile::TempDir, Connection) {
        let dir = tempdir().unwrap();
        let conn = open_store_at(&dir.path().join("session.sqlite")).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_fresh_store_loads_defaults() {
        let (_dir, conn) = test_store();
        let session = load_session(&conn).unwrap();

        assert_eq!(session.event_title(), DEFAULT_EVENT_TITLE);
        assert!(session.registry().is_empty());
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips_exactly() {
        let (_dir, mut conn) = test_store();

        let mut session = Session::default();
        session.set_event_title("Demo".to_string());
        session.add_bulk("Alice\nBob\nCarol");
        session.begin_draw(1).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        session.resolve_draw(&mut rng).unwrap();

        save_session(&mut conn, &session).unwrap();
        let reloaded = load_session(&conn).unwrap();

        assert_eq!(reloaded.event_title(), "Demo");
        assert_eq!(reloaded.registry(), session.registry());
        assert_eq!(reloaded.ledger(), session.ledger());
    }

    #[test]
    fn test_corrupt_value_falls_back_to_default() {
        let (_dir, mut conn) = test_store();

        let mut session = Session::default();
        session.set_event_title("Demo".to_string());
        session.add_single("Alice");
        save_session(&mut conn, &session).unwrap();

        conn.execute(
            "UPDATE session_state SET value = ?1 WHERE key = ?2",
            params!["not json", PARTICIPANTS_KEY],
        )
        .unwrap();

        let reloaded = load_session(&conn).unwrap();
        assert!(reloaded.registry().is_empty());
        // The keys fall back independently; the title survives.
        assert_eq!(reloaded.event_title(), "Demo");
    }

    #[test]
    fn test_clear_store_erases_everything() {
        let (_dir, mut conn) = test_store();

        let mut session = Session::default();
        session.add_single("Alice");
        save_session(&mut conn, &session).unwrap();

        clear_store(&conn).unwrap();

        let reloaded = load_session(&conn).unwrap();
        assert_eq!(reloaded.event_title(), DEFAULT_EVENT_TITLE);
        assert!(reloaded.registry().is_empty());
    }
}
