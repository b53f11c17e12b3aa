//! Command implementations.
//!
//! - [`show`] - classify, filter and render audit events from the selected
//!   source

pub mod show;
