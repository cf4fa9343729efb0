//! Turns a company web page into a Polish investment brochure.
//!
//! The pipeline fetches the page and a few same-domain subpages, strips the
//! HTML down to text, asks a chat-completion model for a markdown brochure
//! and writes it to `wyniki/<date>/`.

pub mod config;
pub mod corpus;
pub mod crawlers;
pub mod filter;
pub mod generator;
pub mod output;
pub mod pages;
pub mod parsers;
pub mod utils;
pub mod validate;

#[cfg(test)]
mod tests;

// Re-export commonly used types for convenience
pub use config::Settings;
pub use crawlers::{FetchError, HttpFetcher, PageKind, PageSource};
pub use generator::{BrochureGenerator, CompletionClient, GenerationError, OpenAiClient};
pub use output::{OutputError, OutputWriter};
pub use pages::{CollectedPages, Pages};

use crate::parsers::text::preview;
use std::path::PathBuf;
use thiserror::Error;

/// Number of corpus characters shown in verbose mode
const PREVIEW_CHARS: usize = 200;

/// Everything that aborts a run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("the given URL is not valid: {0}")]
    InvalidUrl(String),
    #[error("{} not found in the environment or the .env file", config::API_KEY_VAR)]
    MissingCredential,
    #[error("could not fetch the page: {0}")]
    MainPage(#[from] FetchError),
    #[error("could not extract any text from {0}")]
    NoMainContent(String),
    #[error("could not generate the brochure: {0}")]
    Generation(#[from] GenerationError),
    #[error("could not save the brochure: {0}")]
    Output(#[from] OutputError),
}

/// One brochure run for a single target URL
pub struct Brochure {
    url: String,
    output: Option<String>,
    verbose: bool,
    settings: Settings,
}

impl Brochure {
    /// Create a new run for `url` with the given settings
    pub fn new(url: &str, settings: Settings) -> Self {
        Self {
            url: url.to_string(),
            output: None,
            verbose: false,
            settings,
        }
    }

    /// Set the output file name (`.md` is added when missing)
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output.filter(|name| !name.is_empty());
        self
    }

    /// Print a preview of the collected text before generation
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// File name the brochure is written to, without the date directory
    pub fn output_name(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| utils::default_output_name(&self.url))
    }

    /// Run the whole pipeline and return the path of the written brochure
    pub async fn run<S, C>(&self, source: &S, client: &C) -> Result<PathBuf, PipelineError>
    where
        S: PageSource + Sync + ?Sized,
        C: CompletionClient + Sync + ?Sized,
    {
        if !validate::is_valid_url(&self.url) {
            return Err(PipelineError::InvalidUrl(self.url.clone()));
        }

        println!("Inwestor Pro v{}", env!("CARGO_PKG_VERSION"));
        println!("Analysing page: {}", self.url);

        println!("Loading API key...");
        let api_key = self
            .settings
            .api_key()
            .ok_or(PipelineError::MissingCredential)?;

        let pages = Pages::new(&self.url)
            .with_max_subpages(self.settings.max_subpages)
            .collect(source)
            .await?;

        println!("Combining content from all pages...");
        let corpus = corpus::combine_content(&pages.main_text, &pages.subpage_texts, &self.url);
        println!(
            "Fetched and cleaned {} characters of text (main page + {} subpages).",
            corpus.chars().count(),
            pages.subpage_texts.len()
        );
        if self.verbose {
            println!("Sample text: {}...", preview(&corpus, PREVIEW_CHARS));
        }

        println!("Generating investment brochure...");
        let generator = BrochureGenerator::new(
            &self.settings.model,
            self.settings.max_tokens,
            self.settings.temperature,
        );
        let brochure = generator.generate(client, &corpus, api_key).await?;

        let writer = OutputWriter::new(&self.settings.results_dir);
        let path = writer.save(&self.output_name(), &brochure)?;
        println!("Brochure saved to: {}", path.display());
        println!("Investment brochure generated successfully!");

        Ok(path)
    }
}
