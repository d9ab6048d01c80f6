use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TrueFalse,
    Essay,
    Mcq,
}

impl QuestionType {
    // "short" answers are generated and shaped exactly like essays
    pub fn from_request(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "mcq" => Ok(QuestionType::Mcq),
            "true_false" | "truefalse" | "tf" => Ok(QuestionType::TrueFalse),
            "essay" | "short" => Ok(QuestionType::Essay),
            _ => Err(AppError::UnknownQuestionType(raw.trim().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::TrueFalse => "true_false",
            QuestionType::Essay => "essay",
            QuestionType::Mcq => "mcq",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Inbound request body of POST /generateQuestionsUsingAi
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sub_section_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub language_name1: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub question_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub difficulty_name: Option<String>,
}

// Scalars of any JSON type are taken as their text, e.g. `"className": 10`
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<JsonValue>::deserialize(deserializer)? {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A request whose required fields are all present and whose type is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub class_name: String,
    pub course_name: String,
    pub section: String,
    pub subsection: String,
    pub language: String,
    pub second_language: Option<String>,
    pub question_type: QuestionType,
    pub difficulty: String,
}

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl QuizRequest {
    pub fn validate(&self) -> Result<ValidRequest> {
        let required = (
            present(&self.class_name),
            present(&self.course_name),
            present(&self.section_name),
            present(&self.sub_section_name),
            present(&self.language_name),
            present(&self.question_type),
            present(&self.difficulty_name),
        );

        let (
            Some(class_name),
            Some(course_name),
            Some(section),
            Some(subsection),
            Some(language),
            Some(question_type),
            Some(difficulty),
        ) = required
        else {
            return Err(AppError::MissingData);
        };

        Ok(ValidRequest {
            class_name,
            course_name,
            section,
            subsection,
            language,
            second_language: present(&self.language_name1),
            question_type: QuestionType::from_request(&question_type)?,
            difficulty,
        })
    }
}

/// One question parsed out of generator output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl QuestionRecord {
    pub fn essay(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            answer: None,
            options: None,
        }
    }

    pub fn true_false(description: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            answer: Some(answer.into()),
            options: None,
        }
    }

    pub fn mcq(
        description: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            answer: Some(answer.into()),
            options: Some(options),
        }
    }
}

// Item of the response "result" array; the *1 fields carry the second language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options1: Option<Vec<String>>,
}

impl From<QuestionRecord> for QuizItem {
    fn from(record: QuestionRecord) -> Self {
        Self {
            description: record.description,
            description1: None,
            answer: record.answer,
            answer1: None,
            options: record.options,
            options1: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub result: Vec<QuizItem>,
    pub message: String,
    pub success: bool,
}

impl QuizResponse {
    pub fn all_questions(result: Vec<QuizItem>) -> Self {
        Self {
            result,
            message: "all questions".to_string(),
            success: true,
        }
    }
}
