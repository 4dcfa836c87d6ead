//! Pipeline stages for an alert run.
//!
//! - `filter_novel`: drop notices already reported
//! - `Digest`: group and render new notices
//! - `run_check`: scrape → filter → notify → remember
//! - `run_configured`: `run_check` gated on mail credentials

pub mod check;
pub mod digest;
pub mod novelty;

pub use check::{compose_email, run_check, run_configured, scrape};
pub use digest::{Digest, DigestGroup};
pub use novelty::filter_novel;
