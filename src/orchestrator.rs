use chrono::Utc;

use crate::cache::{Fingerprint, QuestionCache};
use crate::error::{AppError, Result};
use crate::generator::Generator;
use crate::metrics::{
    CACHE_SIZE, DUPLICATES_DROPPED, GENERATION_ATTEMPTS, GENERATOR_FAILURES, UNIQUE_QUESTIONS,
};
use crate::models::QuestionRecord;
use crate::prompt::Prompt;

pub const DEFAULT_TARGET_COUNT: usize = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub target_count: usize,
    pub max_attempts: usize,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            target_count: DEFAULT_TARGET_COUNT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Call the generator until `target_count` questions never served for
/// `fingerprint` have been collected, or `max_attempts` calls were made.
///
/// A generator failure aborts the run. When nothing new was found the run
/// ends with [`AppError::NoUniqueQuestions`] and the cache is left untouched.
pub async fn run(
    generator: &dyn Generator,
    cache: &QuestionCache,
    fingerprint: &Fingerprint,
    prompt: &Prompt,
    policy: RetryPolicy,
) -> Result<Vec<QuestionRecord>> {
    cache.sweep(Utc::now());
    let mut served = cache.get(fingerprint);
    let mut unique: Vec<QuestionRecord> = Vec::with_capacity(policy.target_count);

    for attempt in 1..=policy.max_attempts {
        if unique.len() >= policy.target_count {
            break;
        }

        GENERATION_ATTEMPTS.inc();
        let raw = match generator.generate(prompt.system, &prompt.text).await {
            Ok(raw) => raw,
            Err(e) => {
                GENERATOR_FAILURES.inc();
                tracing::error!(generator = generator.name(), attempt, error = %e, "generation failed");
                return Err(e);
            }
        };

        let mut duplicates = 0usize;
        for record in prompt.grammar.parse(&raw) {
            if unique.len() >= policy.target_count {
                break;
            }
            if served.insert(record.description.clone()) {
                unique.push(record);
            } else {
                duplicates += 1;
            }
        }
        DUPLICATES_DROPPED.inc_by(duplicates as f64);

        tracing::debug!(
            attempt,
            unique = unique.len(),
            duplicates,
            target = policy.target_count,
            "generation attempt finished"
        );
    }

    if unique.is_empty() {
        tracing::warn!(
            max_attempts = policy.max_attempts,
            "no unique questions after exhausting attempts"
        );
        return Err(AppError::NoUniqueQuestions);
    }

    cache.put(fingerprint, served, Utc::now());
    CACHE_SIZE.set(cache.len() as f64);
    UNIQUE_QUESTIONS.inc_by(unique.len() as f64);
    Ok(unique)
}
