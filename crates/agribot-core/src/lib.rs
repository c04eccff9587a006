//! agribot-core
//!
//! Domain types, error taxonomy, configuration and the read-only knowledge
//! store shared by the matching, history and chat crates.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod knowledge;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use knowledge::KnowledgeStore;
