// src/pipeline/check.rs

//! One alert run: scrape, filter, notify, remember.

use crate::error::Result;
use crate::models::{Config, MailCredentials, Notice, RunReport};
use crate::pipeline::{Digest, filter_novel};
use crate::services::{Email, ListingSource, Notifier, NoticeExtractor};
use crate::storage::SeenStore;

/// Fetch the listing page and extract its notices.
pub async fn scrape(
    source: &dyn ListingSource,
    extractor: &NoticeExtractor,
) -> Result<Vec<Notice>> {
    let html = source.fetch().await?;
    Ok(extractor.extract(&html))
}

/// Assemble the digest email for the configured recipient.
pub fn compose_email(config: &Config, credentials: &MailCredentials, digest: &Digest) -> Email {
    Email {
        from: credentials.user.clone(),
        to: credentials.recipient.clone(),
        subject: config.mail.subject.clone(),
        html: digest.render_html(),
        text: digest.render_text(),
    }
}

/// Run a single check.
///
/// A failed scrape is logged and treated as "nothing new". A failed delivery
/// is returned as an error before the seen-set is touched, so the same
/// notices are reported again on the next run.
pub async fn run_check(
    config: &Config,
    credentials: &MailCredentials,
    source: &dyn ListingSource,
    store: &dyn SeenStore,
    notifier: &dyn Notifier,
) -> Result<RunReport> {
    let extractor = NoticeExtractor::new(config)?;
    let mut seen = store.load().await?;
    log::debug!("{} ids already reported", seen.len());

    log::info!("Fetching {}", source.location());
    let notices = scrape(source, &extractor).await.unwrap_or_else(|e| {
        log::error!("Scrape of {} failed: {}", source.location(), e);
        Vec::new()
    });

    let novel = filter_novel(&notices, &seen);
    let digest = Digest::new(&novel);
    let mut report = RunReport {
        scraped: notices.len(),
        novel: digest.len(),
        ..RunReport::default()
    };

    if digest.is_empty() {
        log::info!("No new notices ({} scraped)", notices.len());
        return Ok(report);
    }

    log::info!(
        "Detected {} new notices in {} categories",
        digest.len(),
        digest.groups.len()
    );
    for notice in &novel {
        log::debug!("  [{}] {} {}", notice.category, notice.number, notice.url);
    }

    let email = compose_email(config, credentials, &digest);
    if let Err(e) = notifier.send(&email).await {
        log::error!("Failed to deliver digest to {}: {}", email.to, e);
        return Err(e);
    }
    report.delivered = true;
    log::info!("Digest sent to {}", email.to);

    seen.record(novel.iter().map(|n| n.id.clone()), config.state.capacity);
    store.save(&seen).await?;
    report.state_saved = true;

    Ok(report)
}

/// Run a check only when mail credentials are configured.
///
/// Credentials are read through `lookup` before anything else. When a
/// required variable is missing the run stops with `Ok(None)`: the listing is
/// never fetched and the store is never opened. `notifier` is built from the
/// credentials once they are known.
pub async fn run_configured<F>(
    config: &Config,
    lookup: impl Fn(&str) -> Option<String>,
    source: &dyn ListingSource,
    store: &dyn SeenStore,
    notifier: F,
) -> Result<Option<RunReport>>
where
    F: FnOnce(&MailCredentials) -> Result<Box<dyn Notifier>>,
{
    let credentials = match MailCredentials::from_lookup(lookup) {
        Ok(credentials) => credentials,
        Err(e) if e.is_config() => {
            log::warn!("{}. Nothing to do.", e);
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let notifier = notifier(&credentials)?;
    run_check(config, &credentials, source, store, notifier.as_ref())
        .await
        .map(Some)
}
