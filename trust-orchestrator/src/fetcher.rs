use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::FetchError;

/// Retrieves a URL and returns its readable text.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        let body = resp.text().await?;
        let text = match content_type.as_deref() {
            None => extract_text(&body),
            Some(ct) if ct.contains("html") || ct.contains("xml") => extract_text(&body),
            Some(ct) if ct.starts_with("text/") => collapse_whitespace(&body),
            Some(ct) => return Err(FetchError::NotText(ct.to_string())),
        };

        debug!(url, chars = text.len(), "Extracted page text");
        if text.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(text)
    }
}

static MAIN_CONTENT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"main, article, [role="main"], .main-content, #main-content, .content, #content"#)
        .expect("main content selector")
});

static TEXT_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre, table, dl").expect("text element selector")
});

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").expect("body selector"));

const STRUCTURAL_TAGS: [&str; 7] = ["nav", "footer", "header", "aside", "script", "style", "noscript"];
const AD_CLASSES: [&str; 2] = ["ads", "advertisement"];
const CHROME_MARKERS: [&str; 3] = ["banner", "menu", "nav"];

/// Navigation, ads, scripts and similar page chrome.
fn is_chrome(el: ElementRef<'_>) -> bool {
    let value = el.value();
    if STRUCTURAL_TAGS.contains(&value.name()) {
        return true;
    }
    if value.classes().any(|c| AD_CLASSES.contains(&c)) {
        return true;
    }
    let class_attr = value.attr("class").unwrap_or_default();
    if CHROME_MARKERS.iter().any(|m| class_attr.contains(m)) {
        return true;
    }
    let id_attr = value.attr("id").unwrap_or_default();
    id_attr.contains("menu") || id_attr.contains("nav")
}

fn inside_chrome(el: ElementRef<'_>) -> bool {
    is_chrome(el) || el.ancestors().filter_map(ElementRef::wrap).any(is_chrome)
}

fn push_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if !is_chrome(child_el) {
                push_text(child_el, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts readable text from an HTML page.
///
/// Page chrome is ignored. Text comes from paragraphs, headings, lists,
/// quotes, preformatted blocks, tables and definition lists, preferring the
/// page's main content containers and falling back to `<body>`.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut roots: Vec<ElementRef<'_>> = document
        .select(&MAIN_CONTENT)
        .filter(|el| !inside_chrome(*el))
        .collect();
    if roots.is_empty() {
        roots = document.select(&BODY).collect();
    }
    if roots.is_empty() {
        roots.push(document.root_element());
    }

    let mut seen = HashSet::new();
    let mut pieces = Vec::new();
    for root in roots {
        for el in root.select(&TEXT_ELEMENTS) {
            if !seen.insert(el.id()) || inside_chrome(el) {
                continue;
            }
            let mut raw = String::new();
            push_text(el, &mut raw);
            let text = collapse_whitespace(&raw);
            if !text.is_empty() {
                pieces.push(text);
            }
        }
    }

    collapse_whitespace(&pieces.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_page_chrome_and_keeps_body_text() {
        let html = r#"
            <html><head><style>p { color: red; }</style><script>var x = 1;</script></head>
            <body>
              <nav><ul><li>Home</li><li>About</li></ul></nav>
              <header><h1>Site title</h1></header>
              <h1>Real   heading</h1>
              <p>First paragraph.</p>
              <div class="ads"><p>Buy now</p></div>
              <div class="top-banner"><p>Sale</p></div>
              <ul><li>One</li><li>Two</li></ul>
              <footer><p>Copyright</p></footer>
            </body></html>"#;

        let text = extract_text(html);
        assert_eq!(text, "Real heading First paragraph. One Two");
    }

    #[test]
    fn prefers_main_content_containers() {
        let html = r#"
            <body>
              <p>Sidebar blurb</p>
              <article><h2>Story</h2><p>The   body
              text.</p></article>
            </body>"#;

        assert_eq!(extract_text(html), "Story The body text.");
    }

    #[test]
    fn ignores_chrome_nested_inside_text_elements() {
        let html = r#"<body><p>Keep <script>drop()</script>this</p></body>"#;
        assert_eq!(extract_text(html), "Keep this");
    }

    #[test]
    fn page_without_text_elements_extracts_nothing() {
        assert_eq!(extract_text("<body><div>loose text</div></body>"), "");
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\t c "), "a b c");
    }
}
