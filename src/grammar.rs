// Regex grammars that pick question blocks out of free-form generator output

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::{QuestionRecord, QuestionType};

// JSON string body, allowing escaped quotes
const TEXT: &str = r#""((?:[^"\\]|\\.)*)""#;

lazy_static! {
    static ref MCQ_BLOCK: Regex = Regex::new(&format!(
        r#"\{{\s*"question"\s*:\s*{t}\s*,\s*"option1"\s*:\s*{t}\s*,\s*"option2"\s*:\s*{t}\s*,\s*"option3"\s*:\s*{t}\s*,\s*"option4"\s*:\s*{t}\s*,\s*"answer"\s*:\s*{t}\s*\}}"#,
        t = TEXT
    ))
    .expect("mcq grammar is a valid regex");
    static ref TRUE_FALSE_BLOCK: Regex = Regex::new(&format!(
        r#"\{{\s*"question"\s*:\s*{t}\s*,\s*"answer"\s*:\s*(?:{t}|((?i:true|false)))\s*\}}"#,
        t = TEXT
    ))
    .expect("true/false grammar is a valid regex");
    static ref ESSAY_FIELD: Regex = Regex::new(r#""question"\s*:\s*"((?:[^"\\]|\\.)+)""#)
        .expect("essay grammar is a valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `{"question": .., "answer": "true" | "false"}` pairs
    TrueFalse,
    /// bare `"question": ..` fields, surrounding structure ignored
    Essay,
    /// `{"question", "option1".."option4", "answer"}` six-tuples
    Mcq,
}

/// Outcome of matching one candidate block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockMatch {
    Parsed(QuestionRecord),
    NoMatch,
}

impl Grammar {
    pub fn for_type(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::TrueFalse => Grammar::TrueFalse,
            QuestionType::Essay => Grammar::Essay,
            QuestionType::Mcq => Grammar::Mcq,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Grammar::TrueFalse => &*TRUE_FALSE_BLOCK,
            Grammar::Essay => &*ESSAY_FIELD,
            Grammar::Mcq => &*MCQ_BLOCK,
        }
    }

    /// Every candidate block found in `raw`, matched or not.
    pub fn match_blocks<'a>(&self, raw: &'a str) -> impl Iterator<Item = BlockMatch> + 'a {
        let grammar = *self;
        grammar
            .pattern()
            .captures_iter(raw)
            .map(move |caps| grammar.match_block(&caps))
    }

    pub fn parse(&self, raw: &str) -> Vec<QuestionRecord> {
        let mut dropped = 0usize;
        let records: Vec<QuestionRecord> = self
            .match_blocks(raw)
            .filter_map(|block| match block {
                BlockMatch::Parsed(record) => Some(record),
                BlockMatch::NoMatch => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        tracing::debug!(grammar = ?self, parsed = records.len(), dropped, "parsed generator output");
        records
    }

    fn match_block(&self, caps: &Captures<'_>) -> BlockMatch {
        let field = |i: usize| caps.get(i).map(|m| unescape(m.as_str()));

        let Some(description) = field(1).filter(|d| !d.trim().is_empty()) else {
            return BlockMatch::NoMatch;
        };

        match self {
            Grammar::Essay => BlockMatch::Parsed(QuestionRecord::essay(description)),
            Grammar::TrueFalse => {
                let answer = field(2).or_else(|| field(3)).unwrap_or_default();
                match answer.trim().to_lowercase().as_str() {
                    verdict @ ("true" | "false") => {
                        BlockMatch::Parsed(QuestionRecord::true_false(description, verdict))
                    }
                    _ => BlockMatch::NoMatch,
                }
            }
            Grammar::Mcq => {
                let options: Vec<String> = (2..=5).filter_map(field).collect();
                let answer = field(6).unwrap_or_default();
                if options.len() != 4 || answer.trim().is_empty() {
                    return BlockMatch::NoMatch;
                }
                BlockMatch::Parsed(QuestionRecord::mcq(description, options, answer))
            }
        }
    }
}

// Decode JSON escapes
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| unescape_common(raw))
}

// Not a valid JSON string body (raw control characters, bad \u escapes):
// decode the simple escapes and keep anything else as written
fn unescape_common(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
