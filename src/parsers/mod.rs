//! HTML cleaning and text extraction.
//!
//! Pages are parsed with `scraper`, stripped of everything that is not
//! readable content and flattened into a single line of text.

pub mod html;
pub mod text;


pub use html::{CleanedPage, clean, extract_text};
