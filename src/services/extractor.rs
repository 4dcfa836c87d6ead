// src/services/extractor.rs

//! Notice extraction from the gazette listing page.
//!
//! The listing is a flat run of section headings, each followed by the detail
//! links published under it. A link is classified by the nearest heading that
//! opens before it in document order, which is tracked during a single
//! pre-order walk of the parsed tree.

use std::collections::HashSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::Result;
use crate::models::{Category, Config, NO_NUMBER, Notice, parse_selector};
use crate::utils::{join_origin, normalize_whitespace};

/// Turns listing HTML into classified notices.
#[derive(Debug, Clone)]
pub struct NoticeExtractor {
    link_pattern: Regex,
    heading_tags: Vec<String>,
    heading_class: Regex,
    details: Selector,
    field: Selector,
    origin: String,
    watch: Vec<Category>,
}

impl NoticeExtractor {
    /// Compile the extraction rules from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let source = &config.source;
        Ok(Self {
            link_pattern: Regex::new(&source.link_pattern)?,
            heading_tags: source
                .heading_tags
                .iter()
                .map(|tag| tag.to_ascii_lowercase())
                .collect(),
            heading_class: Regex::new(&source.heading_class_pattern)?,
            details: parse_selector(&source.details_selector)?,
            field: parse_selector(&source.field_selector)?,
            origin: source.origin.clone(),
            watch: config.watch.clone(),
        })
    }

    /// Extract notices from a listing page, in document order.
    ///
    /// Links without an id, links under an unknown heading and links outside
    /// the watch list are skipped. A repeated id keeps its first occurrence.
    pub fn extract(&self, html: &str) -> Vec<Notice> {
        let document = Html::parse_document(html);

        let mut notices = Vec::new();
        let mut seen = HashSet::new();
        let mut heading = Category::Otros;
        let mut candidates = 0usize;

        for node in document.root_element().descendants() {
            let Some(element) = ElementRef::wrap(node) else {
                continue;
            };

            if let Some(href) = self.candidate_href(&element) {
                candidates += 1;
                if let Some(notice) = self.build_notice(&element, href, heading) {
                    if seen.insert(notice.id.clone()) {
                        notices.push(notice);
                    }
                }
            }

            if self.is_heading(&element) {
                heading = Category::from_heading(&element.text().collect::<String>());
            }
        }

        log::debug!(
            "Extracted {} notices from {} candidate links",
            notices.len(),
            candidates
        );
        notices
    }

    /// The href of a detail link, if this element is one.
    fn candidate_href<'a>(&self, element: &ElementRef<'a>) -> Option<&'a str> {
        if element.value().name() != "a" {
            return None;
        }
        element
            .value()
            .attr("href")
            .filter(|href| self.link_pattern.is_match(href))
    }

    fn is_heading(&self, element: &ElementRef) -> bool {
        let name = element.value().name();
        if !self.heading_tags.iter().any(|tag| tag == name) {
            return false;
        }
        element
            .value()
            .attr("class")
            .is_some_and(|class| self.heading_class.is_match(class))
    }

    fn build_notice(&self, link: &ElementRef, href: &str, category: Category) -> Option<Notice> {
        let Some(id) = self
            .link_pattern
            .captures(href)
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str().to_string())
        else {
            log::debug!("Skipping link without notice id: {href}");
            return None;
        };

        if !category.is_known() || !self.watch.contains(&category) {
            log::debug!("Skipping notice {id} under {category}");
            return None;
        }

        let (number, summary) = self.details(link);

        Some(Notice {
            id,
            category,
            number,
            summary,
            url: join_origin(&self.origin, href),
        })
    }

    /// Number and summary from the link's details block.
    fn details(&self, link: &ElementRef) -> (String, String) {
        let mut fields = link
            .select(&self.details)
            .next()
            .into_iter()
            .flat_map(|details| details.select(&self.field))
            .map(|field| normalize_whitespace(&field.text().collect::<String>()));

        let number = fields.next().unwrap_or_else(|| NO_NUMBER.to_string());
        let summary = fields.next().unwrap_or_default();
        (number, summary)
    }
}
