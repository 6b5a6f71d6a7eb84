use crate::traits::*;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Provider for the Gemini REST API (`generateContent`).
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    fn function_declarations(actions: &[ActionDecl]) -> Vec<serde_json::Value> {
        actions
            .iter()
            .map(|a| {
                json!({
                    "name": a.name,
                    "description": a.description,
                    "parameters": a.parameters,
                })
            })
            .collect()
    }

    async fn generate_content(
        &self,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
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

    /// Parts of the first candidate, or a parse error when the response
    /// carries no candidates (safety blocks return an empty list).
    fn candidate_parts(response: &serde_json::Value) -> Result<&Vec<serde_json::Value>, ProviderError> {
        response["candidates"]
            .get(0)
            .and_then(|c| c["content"]["parts"].as_array())
            .ok_or_else(|| ProviderError::Parse("No candidates in response".to_string()))
    }
}

#[async_trait]
impl LanguageModel for GeminiProvider {
    async fn classify(
        &self,
        system_instruction: &str,
        text: &str,
        actions: &[ActionDecl],
    ) -> Result<ClassifyReply, ProviderError> {
        let body = json!({
            "system_instruction": { "parts": [{ "text": system_instruction }] },
            "contents": [{ "role": "user", "parts": [{ "text": text }] }],
            "tools": [{ "functionDeclarations": Self::function_declarations(actions) }],
        });

        tracing::debug!("Classifying with {} ({} declared actions)", self.model, actions.len());
        let response = self.generate_content(body).await?;
        let parts = Self::candidate_parts(&response)?;

        let mut reply = ClassifyReply::default();
        let mut content = String::new();
        for part in parts {
            if reply.call.is_none() {
                if let Some(name) = part["functionCall"]["name"].as_str() {
                    reply.call = Some(FunctionCall {
                        name: name.to_string(),
                        arguments: part["functionCall"]["args"].clone(),
                    });
                    continue;
                }
            }
            if let Some(text) = part["text"].as_str() {
                content.push_str(text);
            }
        }
        if !content.is_empty() {
            reply.content = Some(content);
        }

        Ok(reply)
    }

    async fn summarize(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let response = self.generate_content(body).await?;
        let parts = Self::candidate_parts(&response)?;

        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();

        if text.is_empty() {
            return Err(ProviderError::Parse("No text in response".to_string()));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_function_call_part() {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "functionCall": { "name": "tabs.close", "args": { "tabId": "3" } } }
                    ]
                }
            }]
        });

        let parts = GeminiProvider::candidate_parts(&response).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["functionCall"]["name"], "tabs.close");
    }

    #[test]
    fn missing_candidates_is_parse_error() {
        let response = json!({ "candidates": [] });
        assert!(matches!(
            GeminiProvider::candidate_parts(&response),
            Err(ProviderError::Parse(_))
        ));
    }
}
