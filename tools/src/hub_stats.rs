use crate::args::ToolArgs;
use crate::descriptor::{InputKind, InputSpec, OutputType, ToolDescriptor};
use crate::error::ToolError;
use crate::Tool;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    pub model_id: String,
    pub downloads: Option<u64>,
}

#[async_trait]
pub trait HubClient: Send + Sync {
    /// The author's most downloaded model, if they have any.
    async fn top_model(&self, author: &str) -> Result<Option<ModelSummary>, ToolError>;
}

/// Model hub REST client (`GET /api/models`).
pub struct HfHubClient {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

// The API reports the name as `id`, older responses as `modelId`.
#[derive(Deserialize)]
struct ApiModel {
    id: Option<String>,
    #[serde(rename = "modelId")]
    model_id: Option<String>,
    downloads: Option<u64>,
}

impl HfHubClient {
    pub fn new(client: Client, endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self { client, endpoint: endpoint.into().trim_end_matches('/').to_string(), token }
    }
}

#[async_trait]
impl HubClient for HfHubClient {
    async fn top_model(&self, author: &str) -> Result<Option<ModelSummary>, ToolError> {
        let url = format!("{}/api/models", self.endpoint);
        let mut req = self.client.get(url).query(&[
            ("author", author),
            ("sort", "downloads"),
            ("direction", "-1"),
            ("limit", "1"),
        ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(ToolError::Upstream(format!("model hub returned HTTP {}", resp.status())));
        }
        let models: Vec<ApiModel> = resp.json().await?;
        Ok(models.into_iter().next().and_then(|m| {
            let model_id = m.id.or(m.model_id)?;
            Some(ModelSummary { model_id, downloads: m.downloads })
        }))
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub struct HubStatsTool<C> {
    client: C,
    descriptor: ToolDescriptor,
}

impl<C: HubClient> HubStatsTool<C> {
    pub fn new(client: C) -> Self {
        let descriptor = ToolDescriptor {
            name: "hub_stats",
            description: "Fetches the most downloaded model from a specific author on the Hugging Face Hub.",
            inputs: vec![InputSpec::new("author", InputKind::String, "Hugging Face username or organization.")],
            output_type: OutputType::String,
        };
        Self { client, descriptor }
    }
}

#[async_trait]
impl<C: HubClient> Tool for HubStatsTool<C> {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let author = args.string("author")?.trim();
        if author.is_empty() {
            return Err(ToolError::InvalidArgument("author must not be empty".into()));
        }
        let top = self.client.top_model(author).await.map_err(|e| {
            tracing::warn!(error = %e, author, "hub lookup failed");
            e
        })?;
        Ok(match top {
            None => format!("No models found for author {author}."),
            Some(m) => {
                let downloads = m
                    .downloads
                    .map(|d| format!(" with {} downloads", group_thousands(d)))
                    .unwrap_or_default();
                format!("Most downloaded model by {author}: {}{downloads}.", m.model_id)
            }
        })
    }
}
