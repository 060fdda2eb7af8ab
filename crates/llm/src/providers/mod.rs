pub mod ollama;
pub mod openai;

use ladle_core::config::{LlmConfig, OllamaConfig};

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(
    llm_config: &LlmConfig,
    ollama_config: &OllamaConfig,
) -> Result<Box<dyn LlmProvider>, LlmError> {
    match llm_config.provider.as_str() {
        "openrouter" => {
            let api_key = llm_config
                .openrouter_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENROUTER_API_KEY not set".into()))?;
            let base_url = llm_config
                .base_url
                .as_deref()
                .unwrap_or("https://openrouter.ai/api");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.model.clone(),
                base_url.to_string(),
            )))
        }
        "openai" => {
            let api_key = llm_config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = llm_config
                .base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.model.clone(),
                base_url.to_string(),
            )))
        }
        "groq" => {
            let api_key = llm_config
                .groq_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("GROQ_API_KEY not set".into()))?;
            let base_url = llm_config
                .base_url
                .as_deref()
                .unwrap_or("https://api.groq.com/openai");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                llm_config.model.clone(),
                base_url.to_string(),
            )))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            ollama_config.url.clone(),
            ollama_config.model.clone(),
        ))),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_config(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: "openrouter/free".to_string(),
            base_url: None,
            openrouter_api_key: None,
            openai_api_key: None,
            groq_api_key: None,
            temperature: 0.4,
            max_tokens: 800,
        }
    }

    fn ollama_config() -> OllamaConfig {
        OllamaConfig {
            url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
        }
    }

    #[test]
    fn openrouter_requires_its_api_key() {
        let err = create_provider(&llm_config("openrouter"), &ollama_config()).unwrap_err();
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));

        let mut config = llm_config("openrouter");
        config.openrouter_api_key = Some("sk-or-test".to_string());
        assert!(create_provider(&config, &ollama_config()).is_ok());
    }

    #[test]
    fn groq_requires_its_api_key() {
        let err = create_provider(&llm_config("groq"), &ollama_config()).unwrap_err();
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn ollama_needs_no_key() {
        assert!(create_provider(&llm_config("ollama"), &ollama_config()).is_ok());
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_provider(&llm_config("mystery"), &ollama_config()).unwrap_err();
        assert!(matches!(err, LlmError::NotConfigured(_)));
    }
}
