use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use quiz_gateway::cache::{Fingerprint, QuestionCache};
use quiz_gateway::mock::{
    MockMode, MockTranslator, Reply, ScriptedGenerator, essay_output, mcq_output,
};
use quiz_gateway::models::{QuestionType, QuizRequest};
use quiz_gateway::orchestrator::RetryPolicy;
use quiz_gateway::{AppError, AppState, pipeline};

fn request(question_type: &str) -> QuizRequest {
    QuizRequest {
        class_name: Some("Class 10".into()),
        course_name: Some("Chemistry".into()),
        section_name: Some("Acids and Bases".into()),
        sub_section_name: Some("pH scale".into()),
        language_name: Some("English".into()),
        language_name1: None,
        question_type: Some(question_type.into()),
        difficulty_name: Some("Medium".into()),
    }
}

fn state_with(generator: Arc<ScriptedGenerator>, translator: Arc<MockTranslator>) -> AppState {
    AppState::new(generator, translator)
}

#[tokio::test]
async fn repeated_output_is_exhausted_on_second_request() {
    let generator = Arc::new(ScriptedGenerator::repeating(mcq_output(0, 25)));
    let state = state_with(generator.clone(), Arc::new(MockTranslator::new(MockMode::Suffix)))
        .with_retry(RetryPolicy {
            target_count: 25,
            max_attempts: 20,
        });

    let first = pipeline::process(&state, &request("mcq")).await.unwrap();
    assert_eq!(first.result.len(), 25);

    let fingerprint = Fingerprint::from_request(&request("mcq").validate().unwrap());
    let cached = state.cache.get(&fingerprint);
    let served: HashSet<String> = first.result.iter().map(|i| i.description.clone()).collect();
    assert_eq!(cached, served);

    let second = pipeline::process(&state, &request("mcq")).await;
    assert!(matches!(second, Err(AppError::NoUniqueQuestions)));
    assert_eq!(generator.calls(), 1 + 20);
}

#[tokio::test]
async fn second_request_only_gets_fresh_questions() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Reply::Text(mcq_output(0, 25)),
        Reply::Text(mcq_output(5, 25)),
    ]));
    let state = state_with(generator, Arc::new(MockTranslator::new(MockMode::Suffix)));

    let first = pipeline::process(&state, &request("mcq")).await.unwrap();
    let second = pipeline::process(&state, &request("mcq")).await.unwrap();

    let first_texts: HashSet<_> = first.result.iter().map(|i| i.description.as_str()).collect();
    assert_eq!(second.result.len(), 10);
    assert!(second.result.iter().all(|i| !first_texts.contains(i.description.as_str())));
    assert_eq!(second.result[0].description, "Sample question 10?");
}

#[tokio::test]
async fn expired_cache_window_serves_questions_again() {
    let generator = Arc::new(ScriptedGenerator::repeating(mcq_output(0, 10)));
    let state = state_with(generator, Arc::new(MockTranslator::new(MockMode::Suffix)))
        .with_cache(QuestionCache::new(100, Duration::from_millis(50)));

    pipeline::process(&state, &request("mcq")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(120)).await;

    let again = pipeline::process(&state, &request("mcq")).await.unwrap();
    assert_eq!(again.result.len(), 10);
}

#[tokio::test]
async fn short_behaves_like_essay() {
    let short_state = state_with(
        Arc::new(ScriptedGenerator::repeating(essay_output(0, 12))),
        Arc::new(MockTranslator::new(MockMode::Suffix)),
    );
    let essay_state = state_with(
        Arc::new(ScriptedGenerator::repeating(essay_output(0, 12))),
        Arc::new(MockTranslator::new(MockMode::Suffix)),
    );

    let short = pipeline::process(&short_state, &request("short")).await.unwrap();
    let essay = pipeline::process(&essay_state, &request("essay")).await.unwrap();

    assert_eq!(short.result, essay.result);
    assert!(short.result.iter().all(|i| i.answer.is_none() && i.options.is_none()));

    // both land in the same question pool
    let short_fp = Fingerprint::from_request(&request("short").validate().unwrap());
    assert_eq!(short_fp.question_type, QuestionType::Essay);
    assert_eq!(
        short_fp,
        Fingerprint::from_request(&request("essay").validate().unwrap())
    );
}

#[tokio::test]
async fn unsupported_second_language_degrades_inline() {
    let translator = Arc::new(MockTranslator::new(MockMode::Suffix));
    let state = state_with(
        Arc::new(ScriptedGenerator::repeating(mcq_output(0, 10))),
        translator.clone(),
    );
    let mut req = request("mcq");
    req.language_name1 = Some("Elvish Quenya".into());

    let response = pipeline::process(&state, &req).await.unwrap();
    let message = "Language 'Elvish Quenya' is not supported.";
    for (i, item) in response.result.iter().enumerate() {
        assert_eq!(item.description, format!("Sample question {i}?"));
        assert_eq!(item.answer.as_deref(), Some(format!("B{i}").as_str()));
        assert_eq!(item.description1.as_deref(), Some(message));
        assert_eq!(item.answer1.as_deref(), Some(message));
        assert_eq!(item.options1.as_ref().map(|o| o.len()), Some(4));
        assert!(item.options1.iter().flatten().all(|o| o == message));
    }
    assert!(translator.calls().is_empty());
}

#[tokio::test]
async fn translation_outage_does_not_abort_request() {
    let state = state_with(
        Arc::new(ScriptedGenerator::repeating(essay_output(0, 10))),
        Arc::new(MockTranslator::new(MockMode::Error("unavailable".into()))),
    );
    let mut req = request("essay");
    req.language_name1 = Some("Punjabi".into());

    let response = pipeline::process(&state, &req).await.unwrap();
    assert_eq!(response.result.len(), 10);
    assert!(response.result.iter().all(|i| {
        i.description1.as_deref()
            == Some("An error occurred: translation service returned 503: unavailable")
    }));
}

#[tokio::test]
async fn missing_section_never_calls_generator() {
    let generator = Arc::new(ScriptedGenerator::repeating(mcq_output(0, 10)));
    let state = state_with(generator.clone(), Arc::new(MockTranslator::new(MockMode::Suffix)));
    let mut req = request("mcq");
    req.section_name = None;

    let err = pipeline::process(&state, &req).await.unwrap_err();
    assert!(matches!(err, AppError::MissingData));
    assert_eq!(err.status().as_u16(), 400);
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn generator_failure_is_server_error() {
    let state = state_with(
        Arc::new(ScriptedGenerator::failing("upstream timeout")),
        Arc::new(MockTranslator::new(MockMode::Suffix)),
    );

    let err = pipeline::process(&state, &request("true_false")).await.unwrap_err();
    assert_eq!(err.status().as_u16(), 500);
    assert_eq!(
        err.to_string(),
        "An error occurred while generating content: upstream timeout"
    );
}

#[tokio::test]
async fn concurrent_requests_for_one_pool_never_share_questions() {
    let generator = Arc::new(ScriptedGenerator::new(
        (0..10).map(|batch| Reply::Text(mcq_output(batch * 5, 10))).collect(),
    ));
    let state = Arc::new(state_with(
        generator,
        Arc::new(MockTranslator::new(MockMode::Suffix)),
    ));

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let state = Arc::clone(&state);
            tokio::spawn(async move { pipeline::process(&state, &request("mcq")).await })
        })
        .collect();

    let mut all = Vec::new();
    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        all.extend(response.result.into_iter().map(|i| i.description));
    }
    let distinct: HashSet<_> = all.iter().collect();
    assert_eq!(distinct.len(), all.len());
    assert_eq!(all.len(), 30);
}
