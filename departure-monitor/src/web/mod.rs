//! Read-only HTTP view of published stop state.
//!
//! Serves whatever the pollers last published; requests never trigger a
//! fetch.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
