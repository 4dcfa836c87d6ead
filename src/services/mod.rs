//! Services talking to the page and the mail relay.
//!
//! - `NoticeExtractor`: listing HTML → classified notices
//! - `ListingSource`: where the listing HTML comes from
//! - `Notifier`: where the digest goes

pub mod extractor;
pub mod listing;
pub mod notifier;

pub use extractor::NoticeExtractor;
pub use listing::{FileListing, HttpListing, ListingSource};
pub use notifier::{Email, LogNotifier, Notifier, SmtpNotifier};
