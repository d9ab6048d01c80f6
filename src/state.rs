use std::sync::Arc;

use crate::cache::{FingerprintLocks, QuestionCache};
use crate::generator::Generator;
use crate::orchestrator::RetryPolicy;
use crate::translator::{DEFAULT_CHUNK_SIZE, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationSettings {
    pub chunk_size: usize,
    // records translated at once within one request
    pub concurrency: usize,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: 8,
        }
    }
}

// app's shared state
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub translator: Arc<dyn Translator>,
    pub cache: QuestionCache,
    pub locks: FingerprintLocks,
    pub retry: RetryPolicy,
    pub translation: TranslationSettings,
}

impl AppState {
    /// State with default cache, retry and translation settings.
    pub fn new(generator: Arc<dyn Generator>, translator: Arc<dyn Translator>) -> Self {
        Self {
            generator,
            translator,
            cache: QuestionCache::default(),
            locks: FingerprintLocks::new(),
            retry: RetryPolicy::default(),
            translation: TranslationSettings::default(),
        }
    }

    pub fn with_cache(mut self, cache: QuestionCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_translation(mut self, translation: TranslationSettings) -> Self {
        self.translation = translation;
        self
    }
}
