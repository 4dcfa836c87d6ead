// src/models/mod.rs

//! Domain models for the alert application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod category;
mod config;
mod notice;
pub mod seen;

// Re-export all public types
pub use category::Category;
pub use config::{
    Config, ENV_EMAIL_RECEIVER, ENV_SMTP_PASSWORD, ENV_SMTP_USER, MailConfig, MailCredentials,
    SourceConfig, StateConfig, parse_selector,
};
pub use notice::{NO_NUMBER, Notice};
pub use seen::SeenSet;

/// Outcome of a single check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Notices extracted from the listing page
    pub scraped: usize,
    /// Notices not present in the seen-set
    pub novel: usize,
    /// Whether a digest was handed to the notifier successfully
    pub delivered: bool,
    /// Whether the seen-set was written back
    pub state_saved: bool,
}
