//! Web server module
//!
//! Hosts search bar sessions over HTTP: clients push input, read snapshots
//! or follow them as server-sent events.

mod handlers;
mod routes;
mod state;

pub use handlers::SessionCreated;
pub use routes::create_router;
pub use state::AppState;
