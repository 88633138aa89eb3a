use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    clients::{health::HealthChecker, kafka::Publisher},
    config::Config,
    models::{
        health::HealthStatus,
        request::DispatchRequest,
        response::{ErrorResponse, MessageResponse},
        user::Directory,
    },
    utils::dispatch_notification,
};

pub struct AppState {
    directory: Directory,
    publisher: Arc<dyn Publisher>,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(directory: Directory, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            directory,
            health_checker: HealthChecker::new(Arc::clone(&publisher)),
            publisher,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/send", post(send_message))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_api_server<F>(
    config: &Config,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr).await?;

    info!(address = %addr, "Notification producer started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    request: DispatchRequest,
) -> Response {
    let request_id = Uuid::new_v4();

    // Detached so an accepted publish finishes even if the client goes away.
    let task_state = Arc::clone(&state);
    let outcome = tokio::spawn(async move {
        dispatch_notification(
            &task_state.directory,
            task_state.publisher.as_ref(),
            request,
        )
        .await
    })
    .await;

    match outcome {
        Ok(Ok(receipt)) => {
            info!(
                request_id = %request_id,
                partition = receipt.partition,
                offset = receipt.offset,
                "Dispatch succeeded"
            );
            (StatusCode::OK, Json(MessageResponse::sent())).into_response()
        }
        Ok(Err(e)) => {
            if e.is_client_error() {
                warn!(request_id = %request_id, error = %e, "Dispatch rejected");
            } else {
                error!(request_id = %request_id, error = %e, "Dispatch failed");
            }
            e.into_response()
        }
        Err(join_err) => {
            error!(request_id = %request_id, error = %join_err, "Dispatch task aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("notification dispatch aborted".to_string())),
            )
                .into_response()
        }
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_checker.check_all().await;

    let status_code = match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}
