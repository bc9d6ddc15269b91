//! Terminal rendering with ratatui.

pub mod chart;
pub mod common;
pub mod detail;
pub mod overview;
pub mod theme;
pub mod traces;

pub use theme::Theme;
