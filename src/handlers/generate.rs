use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::Result;
use crate::metrics::{REQUEST_LATENCY, REQUEST_TOTAL};
use crate::models::{QuizRequest, QuizResponse};
use crate::pipeline;
use crate::state::AppState;

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let result = match payload {
        Ok(Json(payload)) => pipeline::process(&state, &payload).await,
        Err(rejection) => Err(rejection.into()),
    };

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    if let Err(e) = &result {
        tracing::warn!(status = %e.status(), error = %e, "quiz request failed");
    }

    result.map(Json)
}
