//! Core library surface for the lucky-draw TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the integration tests can reuse the same pieces:
//! the session state machine, the snapshot store, and the CSV export live
//! behind this facade while the Ratatui front-end only consumes them.
pub mod export;
pub mod models;
pub mod session;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer. These functions are
/// typically used by `main.rs` to open the snapshot store and preload the
/// session.
pub use store::{clear_store, load_session, open_store, open_store_at, save_session};

/// The primary domain type other layers manipulate, and the session that
/// owns it.
pub use models::Participant;
pub use session::{DrawError, Session, DEFAULT_EVENT_TITLE};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
