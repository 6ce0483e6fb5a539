//! Parse periodic `mysqladmin extended-status` dumps, turn them into
//! per-variable delta series and chart them.
//!
//! The [`data`] layer is pure and usable without a window; [`app`] and
//! [`ui`] only consume the [`context::DashboardContext`] built from it.

pub mod app;
pub mod color;
pub mod context;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
