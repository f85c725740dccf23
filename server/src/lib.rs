//! HTTP surface for MentionLens: mention metrics and context-bound Q&A.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
