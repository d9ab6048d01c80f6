// Generator and translator doubles, also served by `--generator mock`

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AppError, Result};
use crate::generator::Generator;
use crate::translator::{TranslateError, Translator};

/// One scripted generator reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

/// Replays its script in order, repeating the last reply once exhausted.
#[derive(Debug)]
pub struct ScriptedGenerator {
    script: Vec<Reply>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// Same output on every call.
    pub fn repeating(text: impl Into<String>) -> Self {
        Self::new(vec![Reply::Text(text.into())])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![Reply::Fail(message.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, _system_instruction: &str, _prompt: &str) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .script
            .get(call)
            .or_else(|| self.script.last())
            .cloned()
            .unwrap_or_else(|| Reply::Text(String::new()));

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(message) => Err(AppError::Generation(message)),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Offline generator: every call returns a fresh batch of each question
/// shape, numbered past the previous batch.
#[derive(Debug, Default)]
pub struct CannedGenerator {
    calls: AtomicUsize,
}

impl CannedGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Generator for CannedGenerator {
    async fn generate(&self, _system_instruction: &str, _prompt: &str) -> Result<String> {
        let start = self.calls.fetch_add(1, Ordering::SeqCst) * 25;
        Ok(format!(
            "{}\n{}\n{}",
            mcq_output(start, 25),
            true_false_output(start, 25),
            essay_output(start, 25)
        ))
    }

    fn name(&self) -> &str {
        "canned"
    }
}

/// `count` mcq blocks numbered from `start`, wrapped in chatty prose.
pub fn mcq_output(start: usize, count: usize) -> String {
    let blocks: Vec<String> = (start..start + count)
        .map(|i| {
            format!(
                r#"{{"question": "Sample question {i}?", "option1": "A{i}", "option2": "B{i}", "option3": "C{i}", "option4": "D{i}", "answer": "B{i}"}}"#
            )
        })
        .collect();
    format!(
        "Here are the questions you asked for:\n{{\"questions\": [{}]}}\nGood luck!",
        blocks.join(",\n")
    )
}

pub fn true_false_output(start: usize, count: usize) -> String {
    let blocks: Vec<String> = (start..start + count)
        .map(|i| {
            let answer = if i % 2 == 0 { "true" } else { "false" };
            format!(r#"{{"question": "Statement {i} holds.", "answer": "{answer}"}}"#)
        })
        .collect();
    format!("{{\"questions\": [{}]}}", blocks.join(", "))
}

pub fn essay_output(start: usize, count: usize) -> String {
    let blocks: Vec<String> = (start..start + count)
        .map(|i| format!(r#"{{"question": "Discuss topic {i} in depth."}}"#))
        .collect();
    format!("{{\"question\": [{}]}}", blocks.join(", "))
}

#[derive(Debug, Clone)]
pub enum MockMode {
    /// "hello" → "hello_fr"
    Suffix,
    /// Every call fails with a 503 carrying this body
    Error(String),
    /// Input returned unchanged
    NoOp,
}

#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    calls: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every text received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_code: &str,
        target_code: &str,
    ) -> std::result::Result<String, TranslateError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }

        match &self.mode {
            MockMode::Suffix => Ok(format!("{text}_{target_code}")),
            MockMode::Error(body) => Err(TranslateError::Api {
                status: 503,
                body: body.clone(),
            }),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
