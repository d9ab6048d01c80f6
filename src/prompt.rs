use crate::grammar::Grammar;
use crate::models::{QuestionType, ValidRequest};

pub const SYSTEM_INSTRUCTION: &str = "You are an expert question generator.";

/// Number of items every prompt asks the generator for.
pub const ITEMS_PER_PROMPT: usize = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub text: String,
    pub grammar: Grammar,
}

// Subject metadata embedded into every prompt
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub class_name: &'a str,
    pub course_name: &'a str,
    pub section: &'a str,
    pub subsection: &'a str,
    pub language: &'a str,
    pub difficulty: &'a str,
}

impl<'a> From<&'a ValidRequest> for Subject<'a> {
    fn from(req: &'a ValidRequest) -> Self {
        Self {
            class_name: &req.class_name,
            course_name: &req.course_name,
            section: &req.section,
            subsection: &req.subsection,
            language: &req.language,
            difficulty: &req.difficulty,
        }
    }
}

pub fn build(question_type: QuestionType, subject: Subject<'_>) -> Prompt {
    let text = match question_type {
        QuestionType::TrueFalse => true_false_prompt(subject),
        QuestionType::Essay => essay_prompt(subject),
        QuestionType::Mcq => mcq_prompt(subject),
    };

    Prompt {
        system: SYSTEM_INSTRUCTION,
        text,
        grammar: Grammar::for_type(question_type),
    }
}

fn true_false_prompt(s: Subject<'_>) -> String {
    format!(
        r#"Design a true/false quiz for {course} {class} students studying {subsection}. The quiz must focus on {section}. Questions must be at a {difficulty} level and written in {language}.

Return JSON with a key named "questions" holding an array of objects. Each object has a "question" key with the statement and an "answer" key that is exactly "true" or "false".

Expected output format:
{{
  "questions": [
    {{
      "question": "The derivative of ln(x + 1) is 1/(x + 1).",
      "answer": "true"
    }},
    {{
      "question": "The derivative of e^x is xe^x.",
      "answer": "false"
    }}
  ]
}}

Provide a total of {count} questions."#,
        course = s.course_name,
        class = s.class_name,
        subsection = s.subsection,
        section = s.section,
        difficulty = s.difficulty,
        language = s.language,
        count = ITEMS_PER_PROMPT,
    )
}

fn essay_prompt(s: Subject<'_>) -> String {
    format!(
        r#"Design {count} essay-type questions for {course} {class} students studying {subsection}. Every question must focus on {section} at a {difficulty} level and be written in {language}. Return JSON with an array under the key "question", where each object has a single "question" key.

Expected output format:
{{
  "question": [
    {{
      "question": "Prove the identity: (sin A + cos A)^2 + (sin A - cos A)^2 = 2."
    }},
    {{
      "question": "Solve the equation: 2 cos^2 A - 3 sin A cos A + 1 = 0."
    }}
  ]
}}"#,
        count = ITEMS_PER_PROMPT,
        course = s.course_name,
        class = s.class_name,
        subsection = s.subsection,
        section = s.section,
        difficulty = s.difficulty,
        language = s.language,
    )
}

fn mcq_prompt(s: Subject<'_>) -> String {
    format!(
        r#"Design {count} multiple-choice questions for {course} {class} students studying {subsection}. Every question must focus on {section} at a {difficulty} level and be written in {language}. Return JSON where each question has the keys "question", "option1", "option2", "option3", "option4" and "answer". The "answer" value is the full text of the correct option, never an option label.

Expected output format:
{{
  "questions": [
    {{
      "question": "Integrate (x^2 + 2x - 3) dx with respect to x.",
      "option1": "x^3/3 + x^2 - 3x + C",
      "option2": "x^3/3 + 2x^2 - 3x + C",
      "option3": "2x^3/3 + x^2 - 3x + C",
      "option4": "x^3/3 + 4x^2 - 3x + C",
      "answer": "x^3/3 + x^2 - 3x + C"
    }}
  ]
}}"#,
        count = ITEMS_PER_PROMPT,
        course = s.course_name,
        class = s.class_name,
        subsection = s.subsection,
        section = s.section,
        difficulty = s.difficulty,
        language = s.language,
    )
}
