use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::service_state::ReadinessError;
use crate::ServiceState;

#[tracing::instrument(skip(state))]
pub async fn handler(State(state): State<ServiceState>) -> Response {
    match state.is_ready() {
        Ok(()) => {
            let msg = serde_json::json!({"status": "ok"});
            (StatusCode::OK, Json(msg)).into_response()
        }
        Err(e) => handle_error(e),
    }
}

fn handle_error(err: ReadinessError) -> Response {
    match err {
        ReadinessError::ShuttingDown => {
            let msg =
                serde_json::json!({"status": "failure", "message": "service is shutting down"});
            (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceConfig;

    #[tokio::test]
    async fn test_handler_direct() {
        let (state, _releases) = ServiceState::from_config(&ServiceConfig::default());

        let response = handler(State(state.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);

        state.begin_shutdown();
        let response = handler(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
