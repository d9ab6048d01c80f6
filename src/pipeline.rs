use futures::StreamExt;
use futures::future::join_all;

use crate::cache::Fingerprint;
use crate::error::Result;
use crate::models::{QuestionRecord, QuizItem, QuizRequest, QuizResponse};
use crate::orchestrator;
use crate::prompt::{self, Subject};
use crate::state::AppState;
use crate::translator::translate_text;

/// Validate, generate unique questions, then translate them when a second
/// language was asked for.
pub async fn process(state: &AppState, request: &QuizRequest) -> Result<QuizResponse> {
    let request = request.validate()?;
    let fingerprint = Fingerprint::from_request(&request);
    let prompt = prompt::build(request.question_type, Subject::from(&request));

    tracing::info!(
        question_type = %request.question_type,
        course = %request.course_name,
        section = %request.section,
        second_language = request.second_language.as_deref().unwrap_or("-"),
        "processing quiz request"
    );

    let records = {
        let _guard = state.locks.acquire(&fingerprint).await;
        orchestrator::run(
            state.generator.as_ref(),
            &state.cache,
            &fingerprint,
            &prompt,
            state.retry,
        )
        .await?
    };

    let items = match request.second_language.as_deref() {
        Some(language) => translate_all(state, records, language).await,
        None => records.into_iter().map(QuizItem::from).collect(),
    };

    tracing::info!(count = items.len(), "quiz request complete");
    Ok(QuizResponse::all_questions(items))
}

async fn translate_all(state: &AppState, records: Vec<QuestionRecord>, language: &str) -> Vec<QuizItem> {
    futures::stream::iter(records)
        .map(|record| translate_record(state, record, language))
        .buffered(state.translation.concurrency.max(1))
        .collect()
        .await
}

async fn translate_record(state: &AppState, record: QuestionRecord, language: &str) -> QuizItem {
    let translate = |text: &str| {
        let text = text.to_string();
        async move {
            translate_text(
                state.translator.as_ref(),
                &text,
                language,
                state.translation.chunk_size,
            )
            .await
        }
    };

    let description1 = translate(record.description.as_str());
    let answer1 = async {
        match &record.answer {
            Some(answer) => Some(translate(answer.as_str()).await),
            None => None,
        }
    };
    let options1 = async {
        match &record.options {
            Some(options) => Some(join_all(options.iter().map(|o| translate(o.as_str()))).await),
            None => None,
        }
    };
    let (description1, answer1, options1) = futures::join!(description1, answer1, options1);

    QuizItem {
        description1: Some(description1),
        answer1,
        options1,
        ..QuizItem::from(record)
    }
}
