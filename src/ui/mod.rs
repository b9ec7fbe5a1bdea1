//! Terminal rendering using ratatui.
//!
//! One module per tab plus the shared chrome (header, tabs, status bar,
//! help overlay) and the color theme.

pub mod advisories;
pub mod common;
pub mod overview;
pub mod theme;
pub mod trends;

pub use theme::Theme;
