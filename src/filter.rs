use crate::utils::netloc;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Configuration for subpage link discovery
#[derive(Debug, Clone)]
pub struct LinkFilterConfig {
    /// Maximum number of subpages to return
    pub max_links: usize,

    /// Regex patterns matched against the lower-cased URL path; a match excludes the link
    pub exclude_patterns: Vec<String>,
}

/// Binary files and web assets are never worth sending to the model
const DEFAULT_EXCLUDE_PATTERN: &str = r"\.(pdf|jpg|png|gif|css|js|zip|doc|docx)$";

impl LinkFilterConfig {
    /// Default exclusions with the given link cap
    pub fn with_max_links(max_links: usize) -> Self {
        Self {
            max_links,
            exclude_patterns: vec![DEFAULT_EXCLUDE_PATTERN.to_string()],
        }
    }
}

/// Decides which anchors of the main page are followed as subpages
#[derive(Debug)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: LinkFilterConfig) -> Result<Self, regex::Error> {
        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            exclude_regexes,
        })
    }

    /// Determine if a resolved link should be fetched as a subpage of `base_url`
    pub fn should_follow(&self, url: &Url, base_url: &Url) -> bool {
        if netloc(url) != netloc(base_url) {
            return false;
        }

        if url.path() == base_url.path() {
            return false;
        }

        // A bare trailing `#` carries no anchor
        if url.fragment().is_some_and(|fragment| !fragment.is_empty()) {
            return false;
        }

        let path = url.path().to_lowercase();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(&path))
    }

    /// Extract subpage candidates from the main page, preserving first-seen order.
    ///
    /// Collection stops as soon as `max_links` candidates are found (duplicates
    /// included), the list is then deduplicated and truncated again.
    pub fn find_links(&self, html: &str, base_url: &str) -> Vec<String> {
        let max_links = self.config.max_links;
        if html.is_empty() || base_url.is_empty() || max_links == 0 {
            return Vec::new();
        }

        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(e) => {
                ::log::error!("Cannot search for subpages of {}: {}", base_url, e);
                return Vec::new();
            }
        };

        let doc = Html::parse_document(html);
        let link_selector = Selector::parse("a[href]").expect("anchor selector");

        let mut candidates = Vec::new();
        for href in doc
            .select(&link_selector)
            .filter_map(|e| e.value().attr("href"))
        {
            if href.is_empty() {
                continue;
            }

            let resolved = match base.join(href) {
                Ok(resolved) => resolved,
                Err(e) => {
                    ::log::debug!("Skipping unresolvable link {:?}: {}", href, e);
                    continue;
                }
            };

            if self.should_follow(&resolved, &base) {
                ::log::debug!("Accepting subpage link: {}", resolved);
                candidates.push(resolved.to_string());
                if candidates.len() >= max_links {
                    break;
                }
            } else {
                ::log::debug!("Rejecting link: {}", resolved);
            }
        }

        let mut seen = HashSet::new();
        candidates.retain(|link| seen.insert(link.clone()));
        candidates.truncate(max_links);
        candidates
    }
}

/// Find up to `max_links` same-domain subpages linked from the main page
pub fn find_subpage_links(html: &str, base_url: &str, max_links: usize) -> Vec<String> {
    match LinkFilter::new(LinkFilterConfig::with_max_links(max_links)) {
        Ok(filter) => filter.find_links(html, base_url),
        Err(e) => {
            ::log::error!("Invalid link filter pattern: {}", e);
            Vec::new()
        }
    }
}
