use crate::parsers::text::normalize_whitespace;
use crate::utils::netloc;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Tags whose whole subtree never carries readable page content
const BOILERPLATE_TAGS: [&str; 10] = [
    "script", "style", "nav", "footer", "header", "aside", "noscript", "iframe", "object",
    "embed",
];

/// Class values marking advertising and overlay elements
static AD_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(ad|advertisement|banner|popup|modal)").expect("AD_CLASS regex")
});

/// Id values marking advertising elements
static AD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(ad|advertisement|banner)").expect("AD_ID regex"));

/// An HTML document with all non-content elements removed
pub struct CleanedPage {
    doc: Html,
}

impl CleanedPage {
    /// Visible text of the remaining document, whitespace collapsed to single spaces
    pub fn text(&self) -> String {
        let runs = self
            .doc
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect::<Vec<_>>()
            .join(" ");
        normalize_whitespace(&runs)
    }

    /// Serialized form of the cleaned document
    pub fn html(&self) -> String {
        self.doc.html()
    }
}

/// Strip scripts, boilerplate, ads, off-domain links and empty elements from `html`.
///
/// Off-domain links are only removed when `base_url` is given and parses.
pub fn clean(html: &str, base_url: Option<&str>) -> CleanedPage {
    let mut doc = Html::parse_document(html);

    let base = base_url
        .filter(|b| !b.is_empty())
        .and_then(|b| match Url::parse(b) {
            Ok(url) => Some(url),
            Err(e) => {
                ::log::warn!("Ignoring invalid base URL {:?}: {}", b, e);
                None
            }
        });

    let pruned = doc
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| is_noise(element, base.as_ref()))
        .map(|element| element.id())
        .collect::<Vec<_>>();
    ::log::debug!("Removing {} non-content elements", pruned.len());
    for id in pruned {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    // Children come before their parent in reverse document order, so one
    // pass decides every element, including those emptied by their children
    let nodes = doc.tree.root().descendants().collect::<Vec<_>>();
    let mut filled = HashSet::new();
    let mut empty = Vec::new();
    for node in nodes.iter().rev() {
        let has_content = node.children().any(|child| match child.value() {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => filled.contains(&child.id()),
            _ => false,
        });
        if has_content {
            filled.insert(node.id());
        } else if node.value().is_element() {
            empty.push(node.id());
        }
    }
    ::log::debug!("Removing {} empty elements", empty.len());
    for id in empty {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    CleanedPage { doc }
}

/// Clean `html` and return its normalized visible text
pub fn extract_text(html: &str, base_url: Option<&str>) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    clean(html, base_url).text()
}

/// True if the element is boilerplate, an ad, or a link leaving the base domain
fn is_noise(element: &ElementRef, base: Option<&Url>) -> bool {
    let value = element.value();

    if BOILERPLATE_TAGS.contains(&value.name()) {
        return true;
    }

    if value.attr("class").is_some_and(|class| AD_CLASS.is_match(class)) {
        return true;
    }

    if value.attr("id").is_some_and(|id| AD_ID.is_match(id)) {
        return true;
    }

    if let Some(base) = base {
        if value.name() == "a" {
            if let Some(href) = value.attr("href").filter(|h| !h.is_empty()) {
                return is_external_link(href, base);
            }
        }
    }

    false
}

/// True if `href` resolves to a non-empty domain other than the base domain
fn is_external_link(href: &str, base: &Url) -> bool {
    match base.join(href) {
        Ok(resolved) => {
            let location = netloc(&resolved);
            !location.is_empty() && location != netloc(base)
        }
        Err(_) => false,
    }
}
