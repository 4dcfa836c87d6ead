//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};

use super::Category;
use crate::error::{AppError, Result};

/// Environment variable overriding the SMTP host.
pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
/// Environment variable holding the SMTP account (also the sender address).
pub const ENV_SMTP_USER: &str = "SMTP_USER";
/// Environment variable holding the SMTP password.
pub const ENV_SMTP_PASSWORD: &str = "SMTP_PASSWORD";
/// Environment variable holding the digest recipient.
pub const ENV_EMAIL_RECEIVER: &str = "EMAIL_RECEIVER";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listing page and extraction settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Seen-set persistence settings
    #[serde(default)]
    pub state: StateConfig,

    /// Outgoing mail settings
    #[serde(default)]
    pub mail: MailConfig,

    /// Categories worth reporting
    #[serde(default = "defaults::watch")]
    pub watch: Vec<Category>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides taken from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(server) = lookup(ENV_SMTP_SERVER).filter(|s| !s.trim().is_empty()) {
            self.mail.smtp_server = server;
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.source.heading_tags.is_empty() {
            return Err(AppError::validation("source.heading_tags is empty"));
        }
        url::Url::parse(&self.source.listing_url)?;
        url::Url::parse(&self.source.origin)?;

        let link_pattern = Regex::new(&self.source.link_pattern)?;
        if !link_pattern.capture_names().flatten().any(|name| name == "id") {
            return Err(AppError::validation(
                "source.link_pattern needs a named `id` capture group",
            ));
        }
        Regex::new(&self.source.heading_class_pattern)?;
        parse_selector(&self.source.details_selector)?;
        parse_selector(&self.source.field_selector)?;

        if self.state.capacity == 0 {
            return Err(AppError::validation("state.capacity must be > 0"));
        }
        if self.mail.smtp_server.trim().is_empty() {
            return Err(AppError::validation("mail.smtp_server is empty"));
        }
        if self.mail.smtp_port == 0 {
            return Err(AppError::validation("mail.smtp_port must be > 0"));
        }
        if self.watch.iter().all(|c| !c.is_known()) {
            return Err(AppError::validation("No known categories in watch list"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            state: StateConfig::default(),
            mail: MailConfig::default(),
            watch: defaults::watch(),
        }
    }
}

/// Listing page location and the markers used to pick notices out of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Page listing the day's first-section notices
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Origin prepended to relative detail links
    #[serde(default = "defaults::origin")]
    pub origin: String,

    /// User-Agent header for the listing request
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Regex a detail link's href must match; `id` names the notice id capture
    #[serde(default = "defaults::link_pattern")]
    pub link_pattern: String,

    /// Element names that may carry a section heading
    #[serde(default = "defaults::heading_tags")]
    pub heading_tags: Vec<String>,

    /// Regex matched against a heading candidate's class attribute
    #[serde(default = "defaults::heading_class_pattern")]
    pub heading_class_pattern: String,

    /// CSS selector for the details block inside a link
    #[serde(default = "defaults::details_selector")]
    pub details_selector: String,

    /// CSS selector for the number/summary fields inside the details block
    #[serde(default = "defaults::field_selector")]
    pub field_selector: String,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            origin: defaults::origin(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            link_pattern: defaults::link_pattern(),
            heading_tags: defaults::heading_tags(),
            heading_class_pattern: defaults::heading_class_pattern(),
            details_selector: defaults::details_selector(),
            field_selector: defaults::field_selector(),
        }
    }
}

/// Seen-set persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// JSON file holding the seen ids
    #[serde(default = "defaults::seen_file")]
    pub seen_file: PathBuf,

    /// Number of ids retained between runs
    #[serde(default = "defaults::capacity")]
    pub capacity: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            seen_file: defaults::seen_file(),
            capacity: defaults::capacity(),
        }
    }
}

/// Outgoing mail settings (credentials come from the environment).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "defaults::smtp_server")]
    pub smtp_server: String,

    #[serde(default = "defaults::smtp_port")]
    pub smtp_port: u16,

    /// Subject line of the digest email
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// SMTP session timeout in seconds
    #[serde(default = "defaults::mail_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_server: defaults::smtp_server(),
            smtp_port: defaults::smtp_port(),
            subject: defaults::subject(),
            timeout_secs: defaults::mail_timeout(),
        }
    }
}

/// SMTP login and recipient, read from the environment only.
#[derive(Clone)]
pub struct MailCredentials {
    pub user: String,
    pub password: String,
    pub recipient: String,
}

impl MailCredentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials from an arbitrary variable lookup.
    ///
    /// Fails with a configuration error naming every missing variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let user = read(ENV_SMTP_USER);
        let password = read(ENV_SMTP_PASSWORD);
        let recipient = read(ENV_EMAIL_RECEIVER);

        match (user, password, recipient) {
            (Some(user), Some(password), Some(recipient)) => Ok(Self {
                user,
                password,
                recipient,
            }),
            (user, password, recipient) => {
                let missing: Vec<&str> = [
                    (ENV_SMTP_USER, user.is_none()),
                    (ENV_SMTP_PASSWORD, password.is_none()),
                    (ENV_EMAIL_RECEIVER, recipient.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(AppError::config(format!(
                    "Mail credentials not configured (missing {})",
                    missing.join(", ")
                )))
            }
        }
    }
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    use std::path::PathBuf;

    use super::Category;

    // Source defaults
    pub fn listing_url() -> String {
        "https://www.boletinoficial.gob.ar/seccion/primera".into()
    }
    pub fn origin() -> String {
        "https://www.boletinoficial.gob.ar".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn link_pattern() -> String {
        r"/detalleAviso/primera/\d+/(?P<id>\d+)".into()
    }
    pub fn heading_tags() -> Vec<String> {
        vec!["div".into(), "h4".into()]
    }
    pub fn heading_class_pattern() -> String {
        "titulo-seccion|bg-blue".into()
    }
    pub fn details_selector() -> String {
        "div.item-detalle".into()
    }
    pub fn field_selector() -> String {
        "small".into()
    }

    // State defaults
    pub fn seen_file() -> PathBuf {
        PathBuf::from("data/estado.json")
    }
    pub fn capacity() -> usize {
        crate::models::seen::DEFAULT_CAPACITY
    }

    // Mail defaults
    pub fn smtp_server() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }
    pub fn subject() -> String {
        "🔔 Alerta BORA: Nuevas normas detectadas".into()
    }
    pub fn mail_timeout() -> u64 {
        30
    }

    pub fn watch() -> Vec<Category> {
        Category::PRIORITY.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.source.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_link_pattern_without_id_group() {
        let mut config = Config::default();
        config.source.link_pattern = r"/detalleAviso/primera/\d+/\d+".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_watch_list_of_only_otros() {
        let mut config = Config::default();
        config.watch = vec![Category::Otros];
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            watch = ["LEYES", "DECRETOS"]

            [state]
            capacity = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.watch, vec![Category::Leyes, Category::Decretos]);
        assert_eq!(config.state.capacity, 50);
        assert_eq!(config.state.seen_file, PathBuf::from("data/estado.json"));
        assert_eq!(config.source.timeout_secs, 20);
        assert_eq!(config.mail.smtp_port, 587);
    }

    #[test]
    fn smtp_server_override() {
        let vars = env(&[(ENV_SMTP_SERVER, "smtp.example.org")]);
        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).cloned());
        assert_eq!(config.mail.smtp_server, "smtp.example.org");

        let mut config = Config::default();
        config.apply_overrides(|_| None);
        assert_eq!(config.mail.smtp_server, "smtp.gmail.com");
    }

    #[test]
    fn credentials_from_lookup() {
        let vars = env(&[
            (ENV_SMTP_USER, "bot@example.org"),
            (ENV_SMTP_PASSWORD, "secret"),
            (ENV_EMAIL_RECEIVER, "me@example.org"),
        ]);
        let creds = MailCredentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.user, "bot@example.org");
        assert_eq!(creds.recipient, "me@example.org");
        assert!(!format!("{creds:?}").contains("secret"));
    }

    #[test]
    fn credentials_missing_is_config_error() {
        let vars = env(&[(ENV_SMTP_USER, "bot@example.org"), (ENV_SMTP_PASSWORD, "")]);
        let err = MailCredentials::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(err.is_config());

        let message = err.to_string();
        assert!(message.contains(ENV_SMTP_PASSWORD));
        assert!(message.contains(ENV_EMAIL_RECEIVER));
        assert!(!message.contains(ENV_SMTP_USER));
    }
}
