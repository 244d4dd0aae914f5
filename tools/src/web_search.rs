use crate::args::ToolArgs;
use crate::descriptor::{InputKind, InputSpec, OutputType, ToolDescriptor};
use crate::error::ToolError;
use crate::Tool;
use async_trait::async_trait;
use reqwest::{header, Client};
use scraper::{Html, Selector};
use url::Url;

pub const DEFAULT_MAX_RESULTS: i64 = 5;
const DUCKDUCKGO_HTML: &str = "https://html.duckduckgo.com/html/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError>;
}

/// Scrapes DuckDuckGo's HTML results page.
pub struct DuckDuckGoClient {
    client: Client,
    endpoint: String,
}

impl DuckDuckGoClient {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, DUCKDUCKGO_HTML)
    }

    pub fn with_endpoint(client: Client, endpoint: impl Into<String>) -> Self {
        Self { client, endpoint: endpoint.into() }
    }
}

#[async_trait]
impl SearchClient for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
        let resp = self.client.get(&self.endpoint).query(&[("q", query)]).send().await?;
        if !resp.status().is_success() {
            return Err(ToolError::Upstream(format!("search returned HTTP {}", resp.status())));
        }
        if let Some(ct) = resp.headers().get(header::CONTENT_TYPE) {
            if let Ok(v) = ct.to_str() {
                if !v.starts_with("text/html") {
                    return Err(ToolError::Upstream(format!("unexpected content type {v}")));
                }
            }
        }
        let body = resp.text().await?;
        Ok(parse_results(&body, max_results))
    }
}

/// Extract organic results from a DuckDuckGo HTML page, skipping ads.
pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    let sel_result = Selector::parse("div.result").expect("valid selector");
    let sel_link = Selector::parse("a.result__a").expect("valid selector");
    let sel_snippet = Selector::parse(".result__snippet").expect("valid selector");

    let doc = Html::parse_document(html);
    let mut hits = Vec::new();
    for result in doc.select(&sel_result) {
        if hits.len() >= max_results { break; }
        if result.value().classes().any(|c| c == "result--ad") { continue; }
        let Some(link) = result.select(&sel_link).next() else { continue };
        let title = collapse_whitespace(&link.text().collect::<String>());
        let url = link.value().attr("href").map(resolve_href).unwrap_or_default();
        let snippet = result
            .select(&sel_snippet)
            .next()
            .map(|n| collapse_whitespace(&n.text().collect::<String>()))
            .unwrap_or_default();
        hits.push(SearchHit { title, url, snippet });
    }
    hits
}

/// Result links go through a `/l/?uddg=<target>` redirect; return the target.
fn resolve_href(href: &str) -> String {
    let absolute = if href.starts_with("//") { format!("https:{href}") } else { href.to_string() };
    match Url::parse(&absolute) {
        Ok(u) if u.path().starts_with("/l/") => u
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or(absolute),
        _ => absolute,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn format_hits(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }
    hits.iter()
        .enumerate()
        .map(|(i, h)| {
            let title = if h.title.is_empty() { "No title" } else { h.title.as_str() };
            format!("{}. {}\n   {}\n   {}", i + 1, title, h.url, h.snippet)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct WebSearchTool<C> {
    client: C,
    descriptor: ToolDescriptor,
}

impl<C: SearchClient> WebSearchTool<C> {
    pub fn new(client: C) -> Self {
        let descriptor = ToolDescriptor {
            name: "duckduckgo_search",
            description: "Perform a DuckDuckGo web search. Pass a query string and receive the top results with titles, URLs, and snippets.",
            inputs: vec![
                InputSpec::new("query", InputKind::String, "The search query."),
                InputSpec::new("max_results", InputKind::Integer, "Max results to return.")
                    .with_default(DEFAULT_MAX_RESULTS)
                    .nullable(),
            ],
            output_type: OutputType::String,
        };
        Self { client, descriptor }
    }
}

#[async_trait]
impl<C: SearchClient> Tool for WebSearchTool<C> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let query = args.string("query")?.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArgument("query must not be empty".into()));
        }
        let max_results = args.integer("max_results")?;
        if max_results < 1 {
            return Err(ToolError::InvalidArgument(format!("max_results must be at least 1, got {max_results}")));
        }
        let hits = self.client.search(query, max_results as usize).await.map_err(|e| {
            tracing::warn!(error = %e, query, "web search failed");
            e
        })?;
        Ok(format_hits(&hits))
    }
}
