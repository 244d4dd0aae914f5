use crate::args::ToolArgs;
use crate::descriptor::ToolDescriptor;
use crate::error::ToolError;
use crate::guest::{GuestDatabaseTool, GuestInfoRetrieverTool};
use crate::http::{build_client, HttpConfig};
use crate::hub_stats::{HfHubClient, HubStatsTool};
use crate::weather::{RandomChooser, WeatherTool};
use crate::web_search::{DuckDuckGoClient, WebSearchTool};
use crate::Tool;
use retrieval::SharedRetriever;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Tools addressable by unique name.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<&'static str, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.descriptor().name;
        if self.tools.contains_key(name) {
            return Err(ToolError::Duplicate(name.to_string()));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Descriptors sorted by tool name.
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.values().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize { self.tools.len() }

    pub fn is_empty(&self) -> bool { self.tools.is_empty() }

    /// Bind `args` against the tool's descriptor and run it.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = ToolArgs::bind(tool.descriptor(), args)?;
        tracing::debug!(tool = name, "invoking tool");
        let result = tool.execute(args).await;
        if let Err(e) = &result {
            tracing::info!(tool = name, kind = e.kind(), error = %e, "tool call failed");
        }
        result
    }
}

/// Every gala tool, wired to the live search and hub services.
pub fn default_registry(retriever: SharedRetriever, http: &HttpConfig) -> Result<ToolRegistry, ToolError> {
    let client = build_client(http)?;
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GuestInfoRetrieverTool::new(retriever.clone())))?;
    registry.register(Arc::new(GuestDatabaseTool::new(retriever)))?;
    registry.register(Arc::new(WebSearchTool::new(DuckDuckGoClient::new(client.clone()))))?;
    registry.register(Arc::new(WeatherTool::new(RandomChooser)))?;
    registry.register(Arc::new(HubStatsTool::new(HfHubClient::new(client, http.hf_endpoint.clone(), http.hf_token.clone()))))?;
    Ok(registry)
}
