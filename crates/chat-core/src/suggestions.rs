//! Follow-up reply suggestions.

use serde::Deserialize;
use serde_json::{json, Value};
use chat_types::Result;
use crate::ports::ChatBackend;

/// Response schema: an object holding an array of strings
pub fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestions": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

pub fn suggestion_prompt(source_text: &str) -> String {
    format!(
        "Based on the following message, generate three short, relevant, and \
         natural-sounding reply suggestions. The message is: \"{}\"",
        source_text
    )
}

#[derive(Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    suggestions: Vec<String>,
}

pub struct SuggestionGenerator {
    max_suggestions: usize,
}

impl SuggestionGenerator {
    pub fn new(max_suggestions: usize) -> Self {
        Self { max_suggestions }
    }

    /// Up to `max_suggestions` short replies to `source_text`.
    /// Any failure yields an empty list.
    pub async fn suggest(&self, backend: &dyn ChatBackend, source_text: &str) -> Vec<String> {
        match self.try_suggest(backend, source_text).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                log::error!("Error generating reply suggestions: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_suggest(&self, backend: &dyn ChatBackend, source_text: &str) -> Result<Vec<String>> {
        let value = backend
            .generate_suggestions(source_text, &suggestion_schema())
            .await?;
        let payload: SuggestionPayload = serde_json::from_value(value)?;

        Ok(payload
            .suggestions
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .take(self.max_suggestions)
            .collect())
    }
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new(3)
    }
}
