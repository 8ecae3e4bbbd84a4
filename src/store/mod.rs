//! Persistence module split across logical submodules.

mod connection;
mod state;

pub use connection::{open_store, open_store_at};
pub use state::{clear_store, load_session, save_session};
