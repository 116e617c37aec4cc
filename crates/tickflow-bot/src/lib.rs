//! Application crate for the tickflow bot.
//!
//! Wires the REST client, the streaming subscriber, and the trading
//! loop together, and owns configuration and logging setup.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
