use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str, default: f32) -> f32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub data: DataConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub ollama: OllamaConfig,
    pub llm: LlmConfig,
    pub retrieval: RetrievalConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `LADLE_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("LADLE_PROFILE").unwrap_or_default().to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            data: DataConfig::from_env_profiled(p),
            chunking: ChunkingConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
            retrieval: RetrievalConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:     {}:{}, cors={}", self.server.host, self.server.port, self.server.cors_origins);
        tracing::info!("  data:       corpus={}, index={}", self.data.corpus_path.display(), self.data.index_dir.display());
        tracing::info!("  chunking:   size={}, overlap={}", self.chunking.chunk_size, self.chunking.overlap);
        tracing::info!("  embedding:  provider={}, model={}, dims={}, device={}", self.embedding.provider, self.embedding.model, self.embedding.dimensions, self.embedding.device);
        tracing::info!("  llm:        provider={}, model={}, configured={}", self.llm.provider, self.llm.model, self.llm.is_configured());
        tracing::info!("  retrieval:  top_k={}", self.retrieval.top_k);
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed CORS origins; "*" allows any.
    pub cors_origins: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_u16(p, "PORT", 8000),
            cors_origins: profiled_env_or(p, "CORS_ORIGINS", "*"),
        }
    }

    /// The configured origins as a cleaned-up list.
    pub fn origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// True when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.origin_list().iter().any(|o| o == "*")
    }
}

// ── Data locations ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Recipe corpus CSV consumed by the index builder.
    pub corpus_path: PathBuf,
    /// Directory holding the persisted vector index.
    pub index_dir: PathBuf,
}

impl DataConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            corpus_path: PathBuf::from(profiled_env_or(p, "CORPUS_PATH", "data/recipes.csv")),
            index_dir: PathBuf::from(profiled_env_or(p, "INDEX_DIR", "data/index")),
        }
    }
}

// ── Chunking ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent chunks of one record.
    pub overlap: usize,
    /// Preferred split boundary.
    pub separator: String,
}

impl ChunkingConfig {
    fn from_env_profiled(p: &str) -> Self {
        // Env values spell newlines as "\n" literals.
        let separator =
            profiled_env_or(p, "CHUNK_SEPARATOR", "\n\n").replace("\\n", "\n");
        Self {
            chunk_size: profiled_env_usize(p, "CHUNK_SIZE", 1000),
            overlap: profiled_env_usize(p, "CHUNK_OVERLAP", 200),
            separator,
        }
    }
}

// ── Embedding ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "tei", "openai", "ollama"
    pub provider: String,
    pub model: String,
    /// "cpu" or "gpu": where the embedding backend runs. Recorded in the
    /// index manifest for provenance; the backend itself owns the hardware.
    pub device: String,
    pub dimensions: usize,
    /// Overrides the provider's default endpoint.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub batch_size: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "tei"),
            model: profiled_env_or(
                p,
                "EMBEDDING_MODEL",
                "sentence-transformers/all-MiniLM-L6-v2",
            ),
            device: profiled_env_or(p, "EMBEDDING_DEVICE", "cpu"),
            dimensions: profiled_env_usize(p, "EMBEDDING_DIMENSIONS", 384),
            base_url: profiled_env_opt(p, "EMBEDDING_BASE_URL"),
            api_key: profiled_env_opt(p, "EMBEDDING_API_KEY"),
            batch_size: profiled_env_usize(p, "EMBEDDING_BATCH_SIZE", 64),
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── LLM (OpenRouter / OpenAI / Groq / Ollama) ─────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openrouter", "openai", "groq", "ollama"
    pub provider: String,
    pub model: String,
    /// Overrides the provider's default API base URL.
    pub base_url: Option<String>,
    pub openrouter_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "openrouter"),
            model: profiled_env_or(p, "LLM_MODEL", "openrouter/free"),
            base_url: profiled_env_opt(p, "LLM_BASE_URL"),
            openrouter_api_key: profiled_env_opt(p, "OPENROUTER_API_KEY"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            groq_api_key: profiled_env_opt(p, "GROQ_API_KEY"),
            temperature: profiled_env_f32(p, "LLM_TEMPERATURE", 0.4),
            max_tokens: profiled_env_opt(p, "LLM_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(800),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openrouter" => self.openrouter_api_key.is_some(),
            "openai" => self.openai_api_key.is_some(),
            "groq" => self.groq_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Retrieval ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest chunks fetched per query.
    pub top_k: usize,
    /// Capacity of the query-embedding LRU cache.
    pub query_cache_size: usize,
}

impl RetrievalConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            top_k: profiled_env_usize(p, "RETRIEVAL_TOP_K", 4),
            query_cache_size: profiled_env_usize(p, "QUERY_CACHE_SIZE", 256),
        }
    }
}
