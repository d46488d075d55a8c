//! HTTP handlers.

pub mod ai;
pub mod notes;
pub mod search;
pub mod views;
