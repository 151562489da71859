pub mod app;
pub mod csv_store;
pub mod errors;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod sheets_store;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod user_agent;

pub use app::router;
pub use state::AppState;
pub use storage::{resolve_store, VisitorStore};
