use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

/// Provider for any endpoint speaking the OpenAI chat-completions dialect
/// (local llama.cpp/ollama gateways, hosted compatibles).
pub struct OpenAICompatibleProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    fn tool_schemas(actions: &[ActionDecl]) -> Vec<serde_json::Value> {
        actions
            .iter()
            .map(|a| {
                json!({
                    "type": "function",
                    "function": {
                        "name": a.name,
                        "description": a.description,
                        "parameters": a.parameters,
                    }
                })
            })
            .collect()
    }

    async fn chat(
        &self,
        messages: serde_json::Value,
        tools: Option<Vec<serde_json::Value>>,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if let Some(tools) = tools {
            body["tools"] = json!(tools);
        }

        let mut request = self.client.post(&url).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api(format!("{}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl LanguageModel for OpenAICompatibleProvider {
    async fn classify(
        &self,
        system_instruction: &str,
        text: &str,
        actions: &[ActionDecl],
    ) -> Result<ClassifyReply, ProviderError> {
        let messages = json!([
            { "role": "system", "content": system_instruction },
            { "role": "user", "content": text },
        ]);

        tracing::debug!("Classifying with {} ({} declared actions)", self.model, actions.len());
        let response = self
            .chat(messages, Some(Self::tool_schemas(actions)))
            .await?;

        let message = response["choices"]
            .get(0)
            .map(|choice| &choice["message"])
            .ok_or_else(|| ProviderError::Parse("No choices in response".to_string()))?;

        let content = message["content"].as_str().map(|s| s.to_string());

        // Only the first tool call matters; the action set is single-shot.
        let call = message["tool_calls"]
            .as_array()
            .and_then(|calls| calls.first())
            .and_then(|call| {
                let function = &call["function"];
                let name = function["name"].as_str()?.to_string();
                // OpenAI-style responses carry arguments as a JSON string.
                let arguments = match &function["arguments"] {
                    serde_json::Value::String(s) => serde_json::from_str(s).ok()?,
                    other => other.clone(),
                };
                Some(FunctionCall { name, arguments })
            });

        Ok(ClassifyReply { content, call })
    }

    async fn summarize(&self, prompt: &str) -> Result<String, ProviderError> {
        let messages = json!([
            { "role": "user", "content": prompt },
        ]);

        let response = self.chat(messages, None).await?;

        response["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::Parse("No content in response".to_string()))
    }

    fn name(&self) -> &str {
        "openai_compatible"
    }
}
