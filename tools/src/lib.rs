//! Agent-callable tools: typed descriptors, argument binding, a runtime
//! registry, and the gala tool set (guest retrieval and lookup, web search,
//! weather, model-hub statistics).

use async_trait::async_trait;

pub mod args;
pub mod descriptor;
pub mod error;
pub mod guest;
pub mod http;
pub mod hub_stats;
pub mod registry;
pub mod weather;
pub mod web_search;

pub use args::ToolArgs;
pub use descriptor::{InputKind, InputSpec, OutputType, ToolDescriptor};
pub use error::ToolError;
pub use http::HttpConfig;
pub use registry::{default_registry, ToolRegistry};

/// A capability the agent can invoke by name.
///
/// `execute` receives arguments already bound against [`Tool::descriptor`]:
/// unknown keys are rejected, defaults are filled and types are checked.
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;
    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError>;
}
