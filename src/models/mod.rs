//! Data models shared by the backend and the orchestrator

mod entity;
mod requests;

pub use entity::*;
pub use requests::*;
