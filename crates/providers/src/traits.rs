use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("API error: {0}")]
    Api(String),
}

/// One callable action declared to the model. Providers translate this
/// into their own tool/function-declaration wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDecl {
    pub name: String,
    pub description: String,
    /// JSON schema describing the named arguments.
    pub parameters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Outcome of a classification request: the first structured call the
/// model issued, or its free-form text. Both may be absent when the model
/// returns an empty candidate.
#[derive(Debug, Clone, Default)]
pub struct ClassifyReply {
    pub content: Option<String>,
    pub call: Option<FunctionCall>,
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Classify free text against a declared set of callable actions.
    async fn classify(
        &self,
        system_instruction: &str,
        text: &str,
        actions: &[ActionDecl],
    ) -> Result<ClassifyReply, ProviderError>;

    /// Produce a short summary for the given prompt.
    async fn summarize(&self, prompt: &str) -> Result<String, ProviderError>;

    fn name(&self) -> &str;
}
