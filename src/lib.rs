pub mod actions;
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod recent;
pub mod selection;
pub mod shell;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
