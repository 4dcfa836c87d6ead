//! Notice data structure.

use serde::{Deserialize, Serialize};

use super::Category;

/// Placeholder used when a notice carries no number.
pub const NO_NUMBER: &str = "S/N";

/// A classified notice scraped from the listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    /// Numeric identifier from the detail-page path
    pub id: String,

    /// Section the notice was listed under
    pub category: Category,

    /// Short label such as a decree number
    pub number: String,

    /// Free-text description
    pub summary: String,

    /// Absolute URL to the detail page
    pub url: String,
}
