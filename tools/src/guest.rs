//! Tools over the guest corpus. Both read the current [`SharedRetriever`]
//! snapshot; neither reloads the corpus per call.

use crate::args::ToolArgs;
use crate::descriptor::{InputKind, InputSpec, OutputType, ToolDescriptor};
use crate::error::ToolError;
use crate::Tool;
use async_trait::async_trait;
use retrieval::{SharedRetriever, DEFAULT_TOP_K};

pub struct GuestInfoRetrieverTool {
    retriever: SharedRetriever,
    descriptor: ToolDescriptor,
}

impl GuestInfoRetrieverTool {
    pub fn new(retriever: SharedRetriever) -> Self {
        let descriptor = ToolDescriptor {
            name: "guest_info_retriever",
            description: "Retrieves detailed information about gala guests based on their name or relation.",
            inputs: vec![
                InputSpec::new("query", InputKind::String, "The name or relation of the guest you want information about."),
                InputSpec::new("k", InputKind::Integer, "How many guest profiles to return at most.")
                    .with_default(DEFAULT_TOP_K as i64),
            ],
            output_type: OutputType::String,
        };
        Self { retriever, descriptor }
    }
}

#[async_trait]
impl Tool for GuestInfoRetrieverTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let query = args.string("query")?;
        let k = args.integer("k")?;
        if k < 1 {
            return Err(ToolError::InvalidArgument(format!("k must be at least 1, got {k}")));
        }
        Ok(self.retriever.snapshot().retrieve(query, k as usize)?)
    }
}

/// Exact lookup of one guest by name.
pub struct GuestDatabaseTool {
    retriever: SharedRetriever,
    descriptor: ToolDescriptor,
}

impl GuestDatabaseTool {
    pub fn new(retriever: SharedRetriever) -> Self {
        let descriptor = ToolDescriptor {
            name: "guest_information",
            description: "Retrieve details and information about a specific guest based on their name.",
            inputs: vec![InputSpec::new("guest_name", InputKind::String, "The full name of the guest.")],
            output_type: OutputType::String,
        };
        Self { retriever, descriptor }
    }
}

#[async_trait]
impl Tool for GuestDatabaseTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: ToolArgs) -> Result<String, ToolError> {
        let name = args.string("guest_name")?.trim();
        if name.is_empty() {
            return Err(ToolError::InvalidArgument("guest_name must not be empty".into()));
        }
        let snapshot = self.retriever.snapshot();
        let doc = snapshot.lookup(name)?;
        Ok(format!("Information for {name}: {}", doc.text))
    }
}
