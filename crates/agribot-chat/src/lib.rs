//! agribot-chat
//!
//! Per-turn pipeline used by front ends: explicit session state, candidate
//! selection, matching, fallback texts and optional history saving.

pub mod engine;
pub mod session;

pub use engine::{ChatEngine, Reply};
pub use session::Session;
