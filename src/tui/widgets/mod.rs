// ABOUTME: Widget modules — reusable rendering pieces for the codedeck screens.

pub mod chat;
pub mod editor;
pub mod forms;
pub mod status;
