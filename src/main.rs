//! Binary entry point that glues the SQLite-backed session snapshot to the
//! TUI: open the store, hydrate the session, and drive the Ratatui event loop
//! until the operator exits.
use lucky_draw::{load_session, open_store, run_app, App};

/// Initialize persistence, load the saved session, and launch the Ratatui
/// event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unwritable home directory) to the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let conn = open_store()?;
    let session = load_session(&conn)?;

    let mut app = App::new(conn, session);
    run_app(&mut app)
}
