use crate::error::{AppError, Result};

pub async fn metrics_handler() -> Result<String> {
    crate::metrics::render().map_err(|e| {
        tracing::error!(error = %e, "failed to encode metrics");
        AppError::Internal(e)
    })
}
