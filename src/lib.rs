// ABOUTME: Library root for codedeck — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod session;
pub mod tui;
