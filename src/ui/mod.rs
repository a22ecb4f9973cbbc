//! Ratatui front-end: the main menu, the generic form engine with its four
//! front-desk configurations, and the read-only patient list.

mod app;
pub mod features;
pub mod forms;
mod helpers;
pub mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
