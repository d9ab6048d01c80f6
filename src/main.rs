use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use quiz_gateway::AppState;
use quiz_gateway::config::{Args, GeneratorKind};
use quiz_gateway::error::AppError;
use quiz_gateway::generator::{Generator, OllamaGenerator, OpenAiGenerator};
use quiz_gateway::load_balancer::{LoadBalancer, health_checker};
use quiz_gateway::mock::CannedGenerator;
use quiz_gateway::translator::GoogleTranslator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.request_timeout))
        .build()?;

    let generator: Arc<dyn Generator> = match args.generator {
        GeneratorKind::Openai => {
            let api_key = args.openai_api_key.clone().ok_or_else(|| {
                AppError::Config("OPENAI_API_KEY is required for the openai generator".to_string())
            })?;
            Arc::new(OpenAiGenerator::new(
                client.clone(),
                api_key,
                &args.openai_url,
                args.model.clone(),
                args.max_tokens,
            )?)
        }
        GeneratorKind::Ollama => {
            let load_balancer = Arc::new(LoadBalancer::new(&args.backends)?);
            tokio::spawn(health_checker(
                Arc::clone(&load_balancer),
                client.clone(),
                Duration::from_secs(args.health_interval),
            ));
            Arc::new(OllamaGenerator::new(
                client.clone(),
                load_balancer,
                args.model.clone(),
            ))
        }
        GeneratorKind::Mock => Arc::new(CannedGenerator::new()),
    };
    let translator = Arc::new(GoogleTranslator::new(client, args.translate_url.clone()));

    let state = Arc::new(
        AppState::new(generator, translator)
            .with_cache(args.question_cache())
            .with_retry(args.retry_policy())
            .with_translation(args.translation_settings()),
    );

    let addr = args.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, generator = ?args.generator, "quiz gateway running");
    info!(
        ttl_secs = args.cache_ttl,
        capacity = args.cache_capacity,
        target = args.target_count,
        max_attempts = args.max_attempts,
        "question cache and retry policy"
    );

    axum::serve(listener, quiz_gateway::app(state)).await?;
    Ok(())
}
