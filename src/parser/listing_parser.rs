// aaaauto.cz-specific HTML parsing
use crate::model::RawListing;
use reqwest::Url;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracts raw listing fields from detail pages and car links from
/// category pages.
pub struct ListingParser;

impl ListingParser {
    pub fn new() -> Self {
        Self
    }

    /// Collects all car detail links from a category page: anchors whose
    /// href points at /car.html and carries an id= parameter. Relative
    /// hrefs are joined against the page URL, duplicates removed.
    pub fn listing_links(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let anchor_selector = Selector::parse(r#"a[href*="/car.html"]"#).unwrap();

        let base = match Url::parse(page_url) {
            Ok(base) => base,
            Err(_) => return Vec::new(),
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in document.select(&anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !href.contains("id=") {
                continue;
            }
            if let Ok(url) = base.join(href) {
                let url = url.to_string();
                if seen.insert(url.clone()) {
                    links.push(url);
                }
            }
        }
        links
    }

    /// Parses one detail page into a RawListing, or None when the page
    /// yielded no field at all.
    ///
    /// Field values live in short <li> blocks with the value in a nested
    /// <strong>. A block is attributed to a field by literal substring
    /// match against its label text, first label in the chain wins.
    /// Labels sharing a substring would misattribute the value; the site
    /// does not currently have such labels and this is left unguarded.
    pub fn parse_listing(&self, html: &str) -> Option<RawListing> {
        let document = Html::parse_document(html);
        let li_selector = Selector::parse("li").unwrap();
        let strong_selector = Selector::parse("strong").unwrap();

        let mut listing = RawListing::default();
        for block in document.select(&li_selector) {
            let Some(label) = clean_text(&block.text().collect::<String>()) else {
                continue;
            };
            let value = block
                .select(&strong_selector)
                .next()
                .and_then(|strong| clean_text(&strong.text().collect::<String>()));

            if label.contains("Kombinovaná") {
                listing.consumption = value;
            } else if label.contains("Rok uvedení do provozu") {
                listing.year = value;
            } else if label.contains("Karoserie") {
                listing.body_type = value;
            } else if label.contains("Palivo") {
                listing.fuel_type = value;
            } else if label.contains("Motor") {
                listing.engine = value;
            } else if label.contains("Výkon") {
                // Keep only the whitespace token carrying the kW unit.
                if let Some(value) = value {
                    if let Some(token) = value
                        .split_whitespace()
                        .find(|token| token.to_lowercase().contains("kw"))
                    {
                        listing.power = Some(token.to_lowercase());
                    }
                }
            }
        }

        if listing.consumption.is_none() {
            listing.consumption = consumption_fallback(&document);
        }

        if listing.is_empty() {
            None
        } else {
            Some(listing)
        }
    }
}

/// Secondary rendering of the consumption value: a nested span inside
/// span.countbarValue, accepted only when it actually carries the unit.
fn consumption_fallback(document: &Html) -> Option<String> {
    let outer_selector = Selector::parse("span.countbarValue").unwrap();
    let inner_selector = Selector::parse("span").unwrap();

    let outer = document.select(&outer_selector).next()?;
    let nested = outer.select(&inner_selector).next()?;
    let value = clean_text(&nested.text().collect::<String>())?;
    if value.contains("l/100km") {
        Some(value)
    } else {
        None
    }
}

/// Collapses runs of whitespace to single spaces; None for empty text.
fn clean_text(text: &str) -> Option<String> {
    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
