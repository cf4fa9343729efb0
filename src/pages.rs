use crate::PipelineError;
use crate::crawlers::{PageKind, PageSource};
use crate::filter::find_subpage_links;
use crate::parsers::extract_text;

/// Text gathered from the main page and its subpages
#[derive(Debug, Clone, Default)]
pub struct CollectedPages {
    /// Extracted text of the main page, never empty
    pub main_text: String,
    /// Extracted text per discovered subpage in discovery order; empty where
    /// fetching or extraction failed
    pub subpage_texts: Vec<String>,
}

/// Builder for collecting the text of a page and a few of its subpages
pub struct Pages {
    url: String,
    max_subpages: usize,
}

impl Pages {
    /// Create a new Pages builder for the given main page
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            max_subpages: 5,
        }
    }

    /// Set the maximum number of subpages to follow
    pub fn with_max_subpages(mut self, max_subpages: usize) -> Self {
        self.max_subpages = max_subpages;
        self
    }

    /// Fetch the main page, discover subpages and extract the text of each.
    ///
    /// Only main page failures are returned as errors. A subpage that cannot
    /// be fetched or yields no text is kept as an empty entry.
    pub async fn collect<S>(&self, source: &S) -> Result<CollectedPages, PipelineError>
    where
        S: PageSource + Sync + ?Sized,
    {
        println!("Fetching page content...");
        let html = source.fetch(&self.url, PageKind::Main).await?;

        println!("Searching for subpage links...");
        let subpage_links = find_subpage_links(&html, &self.url, self.max_subpages);
        if subpage_links.is_empty() {
            println!("No subpages found.");
        } else {
            println!("Found {} subpages to analyse:", subpage_links.len());
            for (i, link) in subpage_links.iter().enumerate() {
                println!("  {}. {}", i + 1, link);
            }
        }

        println!("Cleaning and extracting text from the main page...");
        let main_text = extract_text(&html, Some(self.url.as_str()));
        if main_text.is_empty() {
            return Err(PipelineError::NoMainContent(self.url.clone()));
        }

        let mut subpage_texts = Vec::with_capacity(subpage_links.len());
        if !subpage_links.is_empty() {
            println!("Fetching subpage content...");
        }
        for (i, link) in subpage_links.iter().enumerate() {
            println!(
                "Fetching subpage {}/{}: {}",
                i + 1,
                subpage_links.len(),
                link
            );
            subpage_texts.push(fetch_subpage_text(source, link).await);
        }

        Ok(CollectedPages {
            main_text,
            subpage_texts,
        })
    }
}

/// Fetch and extract one subpage, degrading every failure to an empty string
async fn fetch_subpage_text<S>(source: &S, url: &str) -> String
where
    S: PageSource + Sync + ?Sized,
{
    let html = match source.fetch(url, PageKind::Subpage).await {
        Ok(html) => html,
        Err(e) => {
            ::log::warn!("Skipping subpage: {}", e);
            println!("  ✗ Could not fetch content");
            return String::new();
        }
    };

    let text = extract_text(&html, Some(url));
    if text.is_empty() {
        ::log::warn!("Skipping subpage {}: no text extracted", url);
        println!("  ✗ Could not extract text");
    } else {
        println!("  ✓ Fetched {} characters", text.chars().count());
    }
    text
}
