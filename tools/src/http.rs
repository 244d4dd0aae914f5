use crate::error::ToolError;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "gala-tools/0.1 (+https://huggingface.co/agents-course)";
pub const DEFAULT_HF_ENDPOINT: &str = "https://huggingface.co";

/// Settings shared by the tools that call remote services.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout: Duration,
    /// Base URL of the model hub API.
    pub hf_endpoint: String,
    pub hf_token: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(12),
            hf_endpoint: DEFAULT_HF_ENDPOINT.to_string(),
            hf_token: None,
        }
    }
}

pub fn build_client(config: &HttpConfig) -> Result<Client, ToolError> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(5))
        .timeout(config.timeout)
        .build()
        .map_err(ToolError::from)
}
