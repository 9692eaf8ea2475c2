pub mod config;
pub mod duration;
pub mod error;
pub mod jira;
pub mod models;
pub mod prompt;
pub mod week;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, WeeklogError};
pub use jira::JiraClient;
pub use models::{Context, Issue};
pub use week::WeeklySummary;
