// ABOUTME: TUI module — ratatui full-screen interface for codedeck.
// ABOUTME: Screen state, key handling, the update model, and rendering.

pub mod input;
pub mod model;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
