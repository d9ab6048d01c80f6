use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::cache::QuestionCache;
use crate::orchestrator::RetryPolicy;
use crate::state::TranslationSettings;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// OpenAI chat completions
    Openai,
    /// One or more Ollama servers, round-robin
    Ollama,
    /// Canned questions, no external calls
    Mock,
}

// CLI argument structure; every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "quiz-gateway")]
#[command(about = "Generates deduplicated, optionally translated quiz questions")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "GENERATOR", value_enum, default_value_t = GeneratorKind::Openai)]
    pub generator: GeneratorKind,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_URL", default_value = "https://api.openai.com")]
    pub openai_url: String,

    // Model name passed to the generator backend
    #[arg(short, long, env = "MODEL", default_value = "gpt-4")]
    pub model: String,

    #[arg(long, env = "MAX_TOKENS", default_value_t = 3000)]
    pub max_tokens: u32,

    // Ollama backends (comma-separated)
    // Example: "localhost:11434,localhost:11435"
    #[arg(short, long, env = "OLLAMA_BACKENDS", default_value = "localhost:11434")]
    pub backends: String,

    // Ollama health check interval in seconds
    #[arg(long, env = "HEALTH_INTERVAL", default_value_t = 30)]
    pub health_interval: u64,

    // Seen-question cache TTL in seconds
    #[arg(short, long, env = "CACHE_TTL", default_value_t = 300)]
    pub cache_ttl: u64,

    #[arg(long, env = "CACHE_CAPACITY", default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    pub cache_capacity: u64,

    #[arg(long, env = "TARGET_COUNT", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub target_count: u64,

    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_attempts: u64,

    #[arg(
        long,
        env = "TRANSLATE_URL",
        default_value = "https://translate.googleapis.com/translate_a/single"
    )]
    pub translate_url: String,

    // Characters per translation call
    #[arg(long, env = "TRANSLATION_CHUNK_SIZE", default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    pub translation_chunk_size: u64,

    #[arg(long, env = "TRANSLATION_CONCURRENCY", default_value_t = 8, value_parser = clap::value_parser!(u64).range(1..))]
    pub translation_concurrency: u64,

    // Timeout for every outbound call, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 120)]
    pub request_timeout: u64,
}

impl Args {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            target_count: self.target_count as usize,
            max_attempts: self.max_attempts as usize,
        }
    }

    pub fn translation_settings(&self) -> TranslationSettings {
        TranslationSettings {
            chunk_size: self.translation_chunk_size as usize,
            concurrency: self.translation_concurrency as usize,
        }
    }

    pub fn question_cache(&self) -> QuestionCache {
        QuestionCache::new(
            self.cache_capacity as usize,
            Duration::from_secs(self.cache_ttl),
        )
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
