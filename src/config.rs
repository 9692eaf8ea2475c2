use crate::error::{Result, WeeklogError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_TEMPLATE: &str = r#"# Weeklog Configuration File
# See: https://developer.atlassian.com/cloud/jira/platform/rest/v3/ for Jira API docs

[jira]
# Create a Personal Access Token: https://id.atlassian.com/manage-profile/security/api-tokens
access_token = "your_jira_personal_access_token_here"
base_url = "https://your-company.atlassian.net"

[settings]
# Automatically select the issue when only one is assigned to you
auto_select_single = true
"#;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub jira: JiraConfig,
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct JiraConfig {
    pub access_token: String,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub auto_select_single: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_select_single: true,
        }
    }
}

impl Config {
    /// Load configuration from file, with environment overrides applied
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Err(WeeklogError::Config(format!(
                "Configuration file not found at {}. Run 'weeklog config init' to create one.",
                config_path.display()
            )));
        }

        let mut config = Self::from_file(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parse a configuration file as-is, without overrides or validation
    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            WeeklogError::Config("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("weeklog").join("config.toml"))
    }

    /// Create a template configuration file
    pub fn create_template() -> Result<()> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            return Err(WeeklogError::Config(format!(
                "Configuration file already exists at {}",
                config_path.display()
            )));
        }

        // Create directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, CONFIG_TEMPLATE)?;

        // Set file permissions to 600 (owner read/write only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&config_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&config_path, perms)?;
        }

        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = env::var("JIRA_ACCESS_TOKEN") {
            self.jira.access_token = token;
        }
        if let Ok(base_url) = env::var("JIRA_BASE_URL") {
            self.jira.base_url = base_url;
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.jira.access_token.is_empty() || self.jira.access_token.contains("your_jira") {
            return Err(WeeklogError::Config(
                "Jira access token not configured. Please update your config file.".to_string(),
            ));
        }

        if self.jira.base_url.is_empty() || self.jira.base_url.contains("your-company") {
            return Err(WeeklogError::Config(
                "Jira base URL not configured. Please update your config file.".to_string(),
            ));
        }

        if !self.jira.base_url.starts_with("http") {
            return Err(WeeklogError::Config(
                "Jira base URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// Display current configuration (masking sensitive data)
    pub fn display(&self) {
        println!("Jira Configuration:");
        println!("  Base URL: {}", self.jira.base_url);
        println!(
            "  Access Token: {}***",
            &self.jira.access_token.chars().take(8).collect::<String>()
        );

        println!("\nSettings:");
        println!(
            "  Auto-select single issue: {}",
            self.settings.auto_select_single
        );
    }
}
