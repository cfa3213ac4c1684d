use crate::models::chat::{ ChatRequest, ChatResponse, ErrorResponse };
use crate::relay::{ Relay, RelayOutcome };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::State,
    response::{ Html, IntoResponse },
    http::StatusCode,
};
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, error };

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
}

pub fn create_router(relay: Relay) -> Router {
    let app_state = AppState {
        relay: Arc::new(relay),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(cors)
        .with_state(app_state)
}

pub async fn start_http_server(
    addr: SocketAddr,
    relay: Relay,
    tls_paths: Option<(String, String)>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let app = create_router(relay);

    if let Some((cert_path, key_path)) = tls_paths {
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            &cert_path,
            &key_path
        ).await
            .map_err(|e| format!("Failed to load TLS material '{}' / '{}': {}", cert_path, key_path, e))?;

        info!("HTTPS server listening on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| {
                error!("HTTPS server error: {}", e);
                e
            })?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await
            .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e))?;

        info!("HTTP server listening on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await
            .map_err(|e| {
                error!("HTTP server error: {}", e);
                e
            })?;
    }

    Ok(())
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.relay.respond(&req.messages).await {
        RelayOutcome::Reply(response) => {
            (StatusCode::OK, Json(ChatResponse { response })).into_response()
        }
        RelayOutcome::Rejected(reason) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: reason.to_string() })).into_response()
        }
    }
}
