// ABOUTME: API module — the HTTP backend client and its wire types.
// ABOUTME: All real computation (judging, AI replies) lives behind this boundary.

pub mod client;
pub mod types;

pub use client::{ApiClient, Backend};
pub use types::*;
