//! Recipe advisor: folds retrieved chunks and the user query into a
//! constrained prompt, calls the model once, and shapes the raw reply into
//! an answer with source attributions.

use std::path::Path;

use ladle_core::config::{LlmConfig, OllamaConfig};
use ladle_index::SearchHit;
use serde_json::Value;
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message};

/// Path to the externalized advisor system prompt template.
const ADVISOR_TEMPLATE_PATH: &str = "data/prompts/recipe-advisor-system.md";

/// Exact sentence the model is instructed to reply with when the retrieved
/// context holds nothing relevant. The template must carry it verbatim.
pub const NO_MATCH_FALLBACK: &str =
    "Sorry, I don't have a matching recipe for those ingredients — try adding more details!";

/// Substituted when the model reply trims down to nothing.
pub const EMPTY_REPLY_FALLBACK: &str = "No meaningful response generated.";

/// Source lines preview the first line of a chunk, truncated to this length.
const TITLE_PREVIEW_CHARS: usize = 60;

/// At most this many source strings accompany an answer.
const MAX_SOURCES: usize = 4;

// ── Model reply shaping ─────────────────────────────────────────────

/// What the model handed back: plain prose, or the structured value some
/// backends produce when they decide to answer in JSON.
#[derive(Debug, Clone)]
pub enum ModelReply {
    PlainText(String),
    Structured(Value),
}

impl ModelReply {
    /// Classify raw model output. Only output parsing as a JSON object
    /// counts as structured; arrays and bare scalars stay prose.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
                return Self::Structured(value);
            }
        }
        Self::PlainText(raw.to_string())
    }

    /// Flatten to user-facing text. Structured replies surface the first
    /// present string field of `text`, `answer`, `output`; with none of
    /// those, the whole value is rendered compactly.
    pub fn into_text(self) -> String {
        match self {
            Self::PlainText(text) => text,
            Self::Structured(value) => {
                for field in ["text", "answer", "output"] {
                    if let Some(text) = value.get(field).and_then(Value::as_str) {
                        return text.to_string();
                    }
                }
                value.to_string()
            }
        }
    }
}

// ── Advisor ─────────────────────────────────────────────────────────

/// A composed answer with its attribution.
#[derive(Debug)]
pub struct Advice {
    pub response: String,
    pub sources: Vec<String>,
    pub retrieved_count: usize,
}

/// Answers ingredient queries from retrieved recipe chunks via an LLM.
pub struct RecipeAdvisor {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
    /// The system prompt loaded from disk at construction time.
    system_prompt: String,
}

impl RecipeAdvisor {
    pub fn new(
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Self, LlmError> {
        Self::with_template_path(
            provider,
            temperature,
            max_tokens,
            Path::new(ADVISOR_TEMPLATE_PATH),
        )
    }

    pub fn with_template_path(
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
        template_path: &Path,
    ) -> Result<Self, LlmError> {
        let system_prompt = load_template(template_path)?;
        Ok(Self {
            provider,
            temperature,
            max_tokens,
            system_prompt,
        })
    }

    /// Build from config, creating the configured provider.
    pub fn from_config(
        llm_config: &LlmConfig,
        ollama_config: &OllamaConfig,
    ) -> Result<Self, LlmError> {
        let provider = crate::providers::create_provider(llm_config, ollama_config)?;
        Self::new(provider, llm_config.temperature, llm_config.max_tokens)
    }

    /// Compose the prompt from the retrieved chunks, call the model once,
    /// and shape the reply. Sources come from the same `hits` list; no
    /// second retrieval happens here.
    pub async fn advise(&self, query: &str, hits: &[SearchHit]) -> Result<Advice, LlmError> {
        let context = hits
            .iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let user_prompt = format!("{query}\n\nRelevant recipes:\n{context}");

        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(user_prompt),
        ];

        let raw = self
            .provider
            .complete(messages, self.temperature, self.max_tokens)
            .await?;
        debug!("model reply: {raw}");

        let mut response = ModelReply::from_raw(&raw).into_text().trim().to_string();
        if response.is_empty() {
            response = EMPTY_REPLY_FALLBACK.to_string();
        }

        let sources = hits.iter().take(MAX_SOURCES).map(format_source).collect();

        Ok(Advice {
            response,
            sources,
            retrieved_count: hits.len(),
        })
    }
}

/// Format one retrieved chunk as a source line, e.g.
/// `recipes.csv (row 12) – Pasta Primavera...` (en dash, literal dots).
/// Chunks without a row index reduce to the bare source id.
fn format_source(hit: &SearchHit) -> String {
    let chunk = &hit.chunk;
    match chunk.row_index {
        Some(row) => {
            let preview: String = chunk
                .title_line()
                .chars()
                .take(TITLE_PREVIEW_CHARS)
                .collect();
            format!("{} (row {}) – {}...", chunk.source_id, row, preview)
        }
        None => chunk.source_id.clone(),
    }
}

/// Load the advisor system prompt, failing eagerly when the file is missing
/// or does not pin the exact no-match sentence.
fn load_template(path: &Path) -> Result<String, LlmError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        LlmError::Template(format!(
            "failed to read prompt template at {}: {e}",
            path.display()
        ))
    })?;

    if !content.contains(NO_MATCH_FALLBACK) {
        return Err(LlmError::Template(format!(
            "prompt template at {} must contain the exact no-match sentence",
            path.display()
        )));
    }

    Ok(content)
}
