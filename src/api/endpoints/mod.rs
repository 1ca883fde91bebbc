//! API endpoint handlers.
//!
//! Handlers are thin: they read shared state from `ApiContext` and delegate
//! to the roster, cohort and pipeline modules.

pub mod chat;
pub mod discharges;
pub mod health;
pub mod insights;
