use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeeklogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Jira API error: {0}")]
    Jira(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid issue key: {0}")]
    InvalidIssueKey(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("No assigned issues found")]
    NoIssuesFound,

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WeeklogError>;
