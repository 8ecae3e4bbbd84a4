use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".lucky-draw";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "session.sqlite";

/// Open (or create) the session store in the user's home directory and make
/// sure the snapshot table exists.
pub fn open_store() -> Result<Connection> {
    open_store_at(&store_path()?)
}

/// Open the store at an explicit path. The regular entry point is
/// `open_store`; tests hand in a temporary location instead.
pub fn open_store_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open session store")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS session_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create session_state table")?;

    Ok(conn)
}

/// Resolve the absolute path to the SQLite store inside the user's home.
fn store_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
