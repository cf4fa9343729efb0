use crate::generator::ChatRequest;
use crate::{
    Brochure, CompletionClient, FetchError, GenerationError, PageKind, PageSource, PipelineError,
    Settings,
};
use async_trait::async_trait;
use chrono::Local;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

const MAIN_URL: &str = "https://example.com";

const MAIN_PAGE: &str = r#"<html><head><title>Example Corp</title></head><body>
<nav><a href="/">Start</a></nav>
<h1>Example Corp</h1>
<p>Budujemy przyszłość energii.</p>
<a href="/o-nas">O nas</a>
<a href="https://external.org/partner">Partner</a>
</body></html>"#;

const ABOUT_PAGE: &str = r#"<html><body><h2>Zespół</h2><p>Doświadczeni inżynierowie.</p></body></html>"#;

const BROCHURE: &str = "# Example Corp\n\n## Podsumowanie Inwestycyjne\n\nWarto zainwestować.\n";

/// Serves pages from memory and records every request
#[derive(Default)]
struct StaticSource {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<(String, PageKind)>>,
}

impl StaticSource {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn requests(&self) -> Vec<(String, PageKind)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StaticSource {
    async fn fetch(&self, url: &str, kind: PageKind) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push((url.to_string(), kind));
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
    }
}

/// Returns a fixed brochure (or fails) and records what it was sent
struct FixedModel {
    reply: Option<String>,
    corpora: Mutex<Vec<String>>,
}

impl FixedModel {
    fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            corpora: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            corpora: Mutex::new(Vec::new()),
        }
    }

    fn corpora(&self) -> Vec<String> {
        self.corpora.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FixedModel {
    async fn complete(
        &self,
        _api_key: &str,
        request: &ChatRequest,
    ) -> Result<String, GenerationError> {
        let user = request
            .messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.corpora.lock().unwrap().push(user);
        self.reply.clone().ok_or(GenerationError::Authentication)
    }
}

fn settings(root: &Path) -> Settings {
    Settings {
        api_key: Some("sk-test".to_string()),
        results_dir: root.join("wyniki"),
        ..Settings::default()
    }
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn example_site() -> StaticSource {
    StaticSource::default()
        .with_page(MAIN_URL, MAIN_PAGE)
        .with_page("https://example.com/o-nas", ABOUT_PAGE)
}

#[tokio::test]
async fn test_end_to_end_writes_brochure() {
    let tmp = tempfile::tempdir().unwrap();
    let source = example_site();
    let model = FixedModel::replying(BROCHURE);

    let path = Brochure::new(MAIN_URL, settings(tmp.path()))
        .run(&source, &model)
        .await
        .unwrap();

    let expected = tmp
        .path()
        .join("wyniki")
        .join(today())
        .join("broszura_example_com.md");
    assert_eq!(path, expected);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), BROCHURE);

    assert_eq!(
        source.requests(),
        vec![
            (MAIN_URL.to_string(), PageKind::Main),
            ("https://example.com/o-nas".to_string(), PageKind::Subpage),
        ]
    );

    let corpora = model.corpora();
    assert_eq!(corpora.len(), 1);
    let corpus = &corpora[0];
    assert!(corpus.contains("=== TREŚĆ GŁÓWNEJ STRONY (https://example.com) ==="));
    assert!(corpus.contains("Budujemy przyszłość energii."));
    assert!(corpus.contains("=== TREŚĆ PODSTRONY 1 ===\n\nZespół Doświadczeni inżynierowie."));
    assert!(!corpus.contains("Partner"));
    assert!(!corpus.contains("Start"));
}

#[tokio::test]
async fn test_custom_output_name() {
    let tmp = tempfile::tempdir().unwrap();
    let path = Brochure::new(MAIN_URL, settings(tmp.path()))
        .with_output(Some("raport.md".to_string()))
        .with_verbose(true)
        .run(&example_site(), &FixedModel::replying(BROCHURE))
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "raport.md");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), BROCHURE);
}

#[tokio::test]
async fn test_invalid_url_aborts_before_fetching() {
    let tmp = tempfile::tempdir().unwrap();
    let source = example_site();
    let model = FixedModel::replying(BROCHURE);

    let err = Brochure::new("invalid-url", settings(tmp.path()))
        .run(&source, &model)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidUrl(_)), "{:?}", err);
    assert!(source.requests().is_empty());
    assert!(model.corpora().is_empty());
}

#[tokio::test]
async fn test_missing_credential_aborts_before_fetching() {
    let tmp = tempfile::tempdir().unwrap();
    let source = example_site();
    let settings = Settings {
        api_key: None,
        ..settings(tmp.path())
    };

    let err = Brochure::new(MAIN_URL, settings)
        .run(&source, &FixedModel::replying(BROCHURE))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::MissingCredential), "{:?}", err);
    assert!(source.requests().is_empty());
}

#[tokio::test]
async fn test_main_page_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let model = FixedModel::replying(BROCHURE);

    let err = Brochure::new(MAIN_URL, settings(tmp.path()))
        .run(&StaticSource::default(), &model)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::MainPage(_)), "{:?}", err);
    assert!(model.corpora().is_empty());
    assert!(!tmp.path().join("wyniki").exists());
}

#[tokio::test]
async fn test_main_page_without_text_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let source = StaticSource::default().with_page(
        MAIN_URL,
        "<html><body><script>alert('x')</script><div class=\"banner\">Promo</div></body></html>",
    );

    let err = Brochure::new(MAIN_URL, settings(tmp.path()))
        .run(&source, &FixedModel::replying(BROCHURE))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::NoMainContent(_)), "{:?}", err);
}

#[tokio::test]
async fn test_failed_subpage_is_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let source = StaticSource::default().with_page(MAIN_URL, MAIN_PAGE);
    let model = FixedModel::replying(BROCHURE);

    let path = Brochure::new(MAIN_URL, settings(tmp.path()))
        .run(&source, &model)
        .await
        .unwrap();

    assert!(path.exists());
    assert_eq!(source.requests().len(), 2);
    let corpus = &model.corpora()[0];
    assert!(corpus.contains("Budujemy przyszłość energii."));
    assert!(!corpus.contains("PODSTRONY"));
}

#[tokio::test]
async fn test_no_subpages_when_cap_is_zero() {
    let tmp = tempfile::tempdir().unwrap();
    let source = example_site();
    let settings = Settings {
        max_subpages: 0,
        ..settings(tmp.path())
    };

    Brochure::new(MAIN_URL, settings)
        .run(&source, &FixedModel::replying(BROCHURE))
        .await
        .unwrap();

    assert_eq!(source.requests(), vec![(MAIN_URL.to_string(), PageKind::Main)]);
}

#[tokio::test]
async fn test_generation_failure_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();

    let err = Brochure::new(MAIN_URL, settings(tmp.path()))
        .run(&example_site(), &FixedModel::failing())
        .await
        .unwrap_err();

    assert!(
        matches!(err, PipelineError::Generation(GenerationError::Authentication)),
        "{:?}",
        err
    );
    assert!(!tmp.path().join("wyniki").exists());
}
