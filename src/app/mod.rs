pub mod cli;
pub mod config;
pub mod events;
pub mod input_handler;
pub mod keys;
pub mod renderer;
pub mod session;
pub mod state;
pub mod timers;

pub use config::AppConfig;
pub use events::{AppEvent, UiEvent};
pub use session::Session;
